use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
    Neutral,
}

impl VoteType {
    // Last path segment of the vote endpoints
    pub fn endpoint_suffix(self) -> &'static str {
        match self {
            VoteType::Up => "up-vote",
            VoteType::Down => "down-vote",
            VoteType::Neutral => "neutral-vote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
            VoteType::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// The control a user pressed, before toggle resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteButton {
    Upvote,
    Downvote,
}

/// Up/down voter sets of a votable entity.
///
/// A user id is in at most one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSets {
    #[serde(default)]
    pub up_votes_by: BTreeSet<String>,
    #[serde(default)]
    pub down_votes_by: BTreeSet<String>,
}

impl VoteSets {
    pub fn new<U, D>(up: U, down: D) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            up_votes_by: up.into_iter().map(Into::into).collect(),
            down_votes_by: down.into_iter().map(Into::into).collect(),
        }
    }

    pub fn apply(&mut self, vote_type: VoteType, user_id: &str) {
        match vote_type {
            VoteType::Up => {
                self.down_votes_by.remove(user_id);
                self.up_votes_by.insert(user_id.to_string());
            }
            VoteType::Down => {
                self.up_votes_by.remove(user_id);
                self.down_votes_by.insert(user_id.to_string());
            }
            VoteType::Neutral => {
                self.up_votes_by.remove(user_id);
                self.down_votes_by.remove(user_id);
            }
        }
    }

    pub fn is_upvoted_by(&self, user_id: &str) -> bool {
        self.up_votes_by.contains(user_id)
    }

    pub fn is_downvoted_by(&self, user_id: &str) -> bool {
        self.down_votes_by.contains(user_id)
    }

    /// Vote type a press of `button` should issue given current membership.
    pub fn toggle(&self, button: VoteButton, user_id: &str) -> VoteType {
        match button {
            VoteButton::Upvote if self.is_upvoted_by(user_id) => VoteType::Neutral,
            VoteButton::Upvote => VoteType::Up,
            VoteButton::Downvote if self.is_downvoted_by(user_id) => VoteType::Neutral,
            VoteButton::Downvote => VoteType::Down,
        }
    }

    pub fn score(&self) -> i64 {
        self.up_votes_by.len() as i64 - self.down_votes_by.len() as i64
    }
}

/// Selects the entity a vote operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Thread(String),
    Comment {
        thread_id: String,
        comment_id: String,
    },
}

impl EntityKey {
    pub fn thread(thread_id: impl Into<String>) -> Self {
        EntityKey::Thread(thread_id.into())
    }

    pub fn comment(thread_id: impl Into<String>, comment_id: impl Into<String>) -> Self {
        EntityKey::Comment {
            thread_id: thread_id.into(),
            comment_id: comment_id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Thread(thread_id) => write!(f, "thread:{}", thread_id),
            EntityKey::Comment {
                thread_id,
                comment_id,
            } => write!(f, "comment:{}/{}", thread_id, comment_id),
        }
    }
}
