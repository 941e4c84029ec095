use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Comment, CreateCommentRequest, CreateThreadRequest, LeaderboardEntry, LoginRequest,
    RegisterRequest, Thread, ThreadDetail, User, VoteType,
};

/// Remote side of the forum: every call the client state makes over the
/// network goes through this trait.
///
/// Implementations attach the session token set through [`set_token`] to
/// authenticated calls. Remote rejections come back as
/// [`AppError::Remote`](crate::error::AppError::Remote) carrying the
/// response's message when there was one.
///
/// [`set_token`]: ForumGateway::set_token
#[async_trait]
pub trait ForumGateway: Send + Sync {
    fn set_token(&self, token: Option<&str>);

    async fn register(&self, request: &RegisterRequest) -> Result<User>;

    /// Returns the session token.
    async fn login(&self, request: &LoginRequest) -> Result<String>;

    async fn get_own_profile(&self) -> Result<User>;

    async fn get_all_users(&self) -> Result<Vec<User>>;

    async fn get_all_threads(&self) -> Result<Vec<Thread>>;

    async fn create_thread(&self, request: &CreateThreadRequest) -> Result<Thread>;

    async fn get_thread_detail(&self, thread_id: &str) -> Result<ThreadDetail>;

    async fn create_comment(
        &self,
        thread_id: &str,
        request: &CreateCommentRequest,
    ) -> Result<Comment>;

    async fn submit_thread_vote(&self, thread_id: &str, vote_type: VoteType) -> Result<()>;

    async fn submit_comment_vote(
        &self,
        thread_id: &str,
        comment_id: &str,
        vote_type: VoteType,
    ) -> Result<()>;

    async fn get_leaderboards(&self) -> Result<Vec<LeaderboardEntry>>;
}
