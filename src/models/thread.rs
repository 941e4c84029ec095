use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Comment, Owner, VoteSets};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_comments: u32,
    #[serde(flatten)]
    pub votes: VoteSets,
}

/// A thread as returned by the detail endpoint, with its comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDetail {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub owner: Owner,
    #[serde(flatten)]
    pub votes: VoteSets,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl ThreadDetail {
    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn comment_mut(&mut self, comment_id: &str) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }
}

// Create thread request
#[derive(Debug, Clone, Validate, Serialize)]
pub struct CreateThreadRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateThreadRequest {
    pub fn new(title: &str, body: &str, category: Option<&str>) -> Self {
        Self {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
            // blank category is sent as absent
            category: category
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}
