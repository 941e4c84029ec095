//! In-process stand-in for the forum API, shared by unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::error::{AppError, Result};
use crate::models::{
    Comment, CreateCommentRequest, CreateThreadRequest, LeaderboardEntry, LoginRequest, Owner,
    RegisterRequest, Thread, ThreadDetail, User, VoteSets, VoteType,
};
use crate::services::ForumGateway;

pub const MOCK_EMAIL: &str = "testuser@example.com";
pub const MOCK_PASSWORD: &str = "password123";
pub const MOCK_TOKEN: &str = "mock-token-12345";

#[derive(Default)]
pub struct MockGateway {
    pub threads: Mutex<Vec<Thread>>,
    pub detail: Mutex<Option<ThreadDetail>>,
    pub users: Mutex<Vec<User>>,
    pub leaderboard: Mutex<Vec<LeaderboardEntry>>,
    pub token: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    vote_permits: Option<Arc<Semaphore>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vote submissions wait for a permit from `permits` before resolving.
    pub fn with_vote_permits(permits: Arc<Semaphore>) -> Self {
        Self {
            vote_permits: Some(permits),
            ..Self::default()
        }
    }

    /// Makes the named operation fail with a message-less remote error.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let operation = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(operation.as_str()) {
            return Err(AppError::Remote {
                status: 500,
                message: None,
            });
        }
        Ok(())
    }

    fn authorized(&self) -> Result<()> {
        match self.token.lock().unwrap().as_deref() {
            Some(MOCK_TOKEN) => Ok(()),
            _ => Err(AppError::Remote {
                status: 401,
                message: Some("Unauthorized".to_string()),
            }),
        }
    }

    async fn vote(&self, call: String) -> Result<()> {
        if let Some(permits) = &self.vote_permits {
            permits.acquire().await.unwrap().forget();
        }
        self.record(call)
    }
}

#[async_trait]
impl ForumGateway for MockGateway {
    fn set_token(&self, token: Option<&str>) {
        *self.token.lock().unwrap() = token.map(str::to_string);
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.record(format!("register {}", request.email))?;
        if request.email == "existing@example.com" {
            return Err(AppError::Remote {
                status: 400,
                message: Some("email is already taken".to_string()),
            });
        }
        Ok(User {
            id: "user-new".to_string(),
            name: request.name.clone(),
            email: Some(request.email.clone()),
            avatar: None,
        })
    }

    async fn login(&self, request: &LoginRequest) -> Result<String> {
        self.record(format!("login {}", request.email))?;
        if request.email == MOCK_EMAIL && request.password == MOCK_PASSWORD {
            Ok(MOCK_TOKEN.to_string())
        } else {
            Err(AppError::Remote {
                status: 401,
                message: Some("email or password is wrong".to_string()),
            })
        }
    }

    async fn get_own_profile(&self) -> Result<User> {
        self.record("profile".to_string())?;
        self.authorized()?;
        Ok(user("user-1", "Test User"))
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        self.record("users".to_string())?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_all_threads(&self) -> Result<Vec<Thread>> {
        self.record("threads".to_string())?;
        Ok(self.threads.lock().unwrap().clone())
    }

    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread> {
        self.record(format!("create_thread {}", request.title))?;
        self.authorized()?;
        let mut created = thread("thread-new", request.category.as_deref(), VoteSets::default());
        created.title = request.title.clone();
        created.body = request.body.clone();
        Ok(created)
    }

    async fn get_thread_detail(&self, thread_id: &str) -> Result<ThreadDetail> {
        self.record(format!("detail {}", thread_id))?;
        self.detail
            .lock()
            .unwrap()
            .clone()
            .filter(|d| d.id == thread_id)
            .ok_or_else(|| AppError::Remote {
                status: 404,
                message: Some("thread tidak ditemukan".to_string()),
            })
    }

    async fn create_comment(
        &self,
        thread_id: &str,
        request: &CreateCommentRequest,
    ) -> Result<Comment> {
        self.record(format!("create_comment {}", thread_id))?;
        self.authorized()?;
        let mut created = comment("comment-new", VoteSets::default());
        created.content = request.content.clone();
        Ok(created)
    }

    async fn submit_thread_vote(&self, thread_id: &str, vote_type: VoteType) -> Result<()> {
        self.vote(format!("vote_thread {}/{}", thread_id, vote_type))
            .await
    }

    async fn submit_comment_vote(
        &self,
        thread_id: &str,
        comment_id: &str,
        vote_type: VoteType,
    ) -> Result<()> {
        self.vote(format!(
            "vote_comment {}/{}/{}",
            thread_id, comment_id, vote_type
        ))
        .await
    }

    async fn get_leaderboards(&self) -> Result<Vec<LeaderboardEntry>> {
        self.record("leaderboard".to_string())?;
        Ok(self.leaderboard.lock().unwrap().clone())
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        avatar: None,
    }
}

pub fn owner() -> Owner {
    Owner {
        id: "owner-1".to_string(),
        name: "Owner".to_string(),
        avatar: None,
    }
}

pub fn thread(id: &str, category: Option<&str>, votes: VoteSets) -> Thread {
    Thread {
        id: id.to_string(),
        title: format!("Thread {}", id),
        body: "Body".to_string(),
        category: category.map(str::to_string),
        owner_id: "owner-1".to_string(),
        created_at: Utc::now(),
        total_comments: 0,
        votes,
    }
}

pub fn comment(id: &str, votes: VoteSets) -> Comment {
    Comment {
        id: id.to_string(),
        content: "Comment".to_string(),
        created_at: Utc::now(),
        owner: owner(),
        votes,
    }
}

pub fn detail(id: &str, votes: VoteSets, comments: Vec<Comment>) -> ThreadDetail {
    ThreadDetail {
        id: id.to_string(),
        title: format!("Thread {}", id),
        body: "Body".to_string(),
        category: Some("General".to_string()),
        created_at: Utc::now(),
        owner: owner(),
        votes,
        comments,
    }
}

pub fn no_voters() -> Vec<String> {
    Vec::new()
}
