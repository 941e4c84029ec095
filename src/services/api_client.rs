use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    config::Config,
    error::{AppError, Result},
    models::{
        Comment, CreateCommentRequest, CreateThreadRequest, LeaderboardEntry, LoginRequest,
        LoginResponse, RegisterRequest, Thread, ThreadDetail, User, VoteType,
    },
    services::gateway::ForumGateway,
};

// Every response body is wrapped as { status, message, data }
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: User,
}

#[derive(Debug, Deserialize)]
struct UsersData {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct ThreadData {
    thread: Thread,
}

#[derive(Debug, Deserialize)]
struct ThreadsData {
    threads: Vec<Thread>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailThreadData {
    detail_thread: ThreadDetail,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    comment: Comment,
}

#[derive(Debug, Deserialize)]
struct LeaderboardsData {
    leaderboards: Vec<LeaderboardEntry>,
}

pub fn thread_vote_path(thread_id: &str, vote_type: VoteType) -> String {
    format!("/threads/{}/{}", thread_id, vote_type.endpoint_suffix())
}

pub fn comment_vote_path(thread_id: &str, comment_id: &str, vote_type: VoteType) -> String {
    format!(
        "/threads/{}/comments/{}/{}",
        thread_id,
        comment_id,
        vote_type.endpoint_suffix()
    )
}

/// Builds the error for a non-success response, keeping the body's `message`.
pub fn remote_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|m| !m.trim().is_empty());

    AppError::Remote { status, message }
}

/// HTTP implementation of [`ForumGateway`] against the forum REST API.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!(status = status.as_u16(), "forum API rejected request");
            Err(remote_error(status.as_u16(), &body))
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send_raw(request).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;

        envelope.data.ok_or_else(|| AppError::Remote {
            status: 200,
            message: envelope
                .message
                .or_else(|| Some("Response is missing data".to_string())),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!("GET {}", path);
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!("POST {}", path);
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        tracing::debug!("POST {}", path);
        self.send_raw(self.request(Method::POST, path)).await?;
        Ok(())
    }
}

#[async_trait]
impl ForumGateway for ApiClient {
    fn set_token(&self, token: Option<&str>) {
        if let Ok(mut current) = self.token.write() {
            *current = token.map(str::to_string);
        }
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let data: UserData = self.post("/register", request).await?;
        Ok(data.user)
    }

    async fn login(&self, request: &LoginRequest) -> Result<String> {
        let data: LoginResponse = self.post("/login", request).await?;
        Ok(data.token)
    }

    async fn get_own_profile(&self) -> Result<User> {
        let data: UserData = self.get("/users/me").await?;
        Ok(data.user)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let data: UsersData = self.get("/users").await?;
        Ok(data.users)
    }

    async fn get_all_threads(&self) -> Result<Vec<Thread>> {
        let data: ThreadsData = self.get("/threads").await?;
        Ok(data.threads)
    }

    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread> {
        let data: ThreadData = self.post("/threads", request).await?;
        Ok(data.thread)
    }

    async fn get_thread_detail(&self, thread_id: &str) -> Result<ThreadDetail> {
        let data: DetailThreadData = self.get(&format!("/threads/{}", thread_id)).await?;
        Ok(data.detail_thread)
    }

    async fn create_comment(
        &self,
        thread_id: &str,
        request: &CreateCommentRequest,
    ) -> Result<Comment> {
        let data: CommentData = self
            .post(&format!("/threads/{}/comments", thread_id), request)
            .await?;
        Ok(data.comment)
    }

    async fn submit_thread_vote(&self, thread_id: &str, vote_type: VoteType) -> Result<()> {
        self.post_empty(&thread_vote_path(thread_id, vote_type)).await
    }

    async fn submit_comment_vote(
        &self,
        thread_id: &str,
        comment_id: &str,
        vote_type: VoteType,
    ) -> Result<()> {
        self.post_empty(&comment_vote_path(thread_id, comment_id, vote_type))
            .await
    }

    async fn get_leaderboards(&self) -> Result<Vec<LeaderboardEntry>> {
        let data: LeaderboardsData = self.get("/leaderboards").await?;
        Ok(data.leaderboards)
    }
}
