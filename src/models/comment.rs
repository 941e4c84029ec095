use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Owner, VoteSets};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner: Owner,
    #[serde(flatten)]
    pub votes: VoteSets,
}

// Create comment request
#[derive(Debug, Clone, Validate, Serialize)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 10000, message = "Comment cannot be empty"))]
    pub content: String,
}
