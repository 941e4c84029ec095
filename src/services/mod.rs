pub mod api_client;
pub mod gateway;
pub mod vote_controller;

pub use api_client::ApiClient;
pub use gateway::ForumGateway;
pub use vote_controller::{VoteController, VoteOutcome, VoteRejection};
