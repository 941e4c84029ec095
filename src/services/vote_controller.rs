use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::VoteLockPolicy;
use crate::models::{EntityKey, VoteButton, VoteType};
use crate::services::gateway::ForumGateway;
use crate::store::{EntityStore, LoadingGate};

const THREAD_VOTE_FAILED: &str = "Failed to vote thread";
const COMMENT_VOTE_FAILED: &str = "Failed to vote comment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    Unauthenticated,
    Busy,
    EntityNotFound,
}

/// What became of a vote request.
///
/// A failed remote call is not an error for the caller: the optimistic
/// change is rolled back and the message is only reported here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Committed(VoteType),
    RolledBack { vote_type: VoteType, message: String },
    Rejected(VoteRejection),
}

impl VoteOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, VoteOutcome::Committed(_))
    }
}

/// Runs the apply → submit → commit/revert cycle for votes.
#[derive(Clone)]
pub struct VoteController {
    store: Arc<RwLock<EntityStore>>,
    loading: LoadingGate,
    gateway: Arc<dyn ForumGateway>,
    policy: VoteLockPolicy,
}

impl VoteController {
    pub fn new(
        store: Arc<RwLock<EntityStore>>,
        loading: LoadingGate,
        gateway: Arc<dyn ForumGateway>,
        policy: VoteLockPolicy,
    ) -> Self {
        Self {
            store,
            loading,
            gateway,
            policy,
        }
    }

    /// Resolves a button press against the user's current membership and
    /// casts the resulting vote. Pressing the same button twice toggles the
    /// vote off again.
    pub async fn press(
        &self,
        key: EntityKey,
        button: VoteButton,
        user_id: Option<&str>,
    ) -> VoteOutcome {
        let Some(user_id) = user_id else {
            return VoteOutcome::Rejected(VoteRejection::Unauthenticated);
        };

        let vote_type = {
            let store = self.store.read().await;
            match store.votes(&key) {
                Some(votes) => votes.toggle(button, user_id),
                None => return VoteOutcome::Rejected(VoteRejection::EntityNotFound),
            }
        };

        self.cast_vote(key, vote_type, Some(user_id)).await
    }

    pub async fn cast_vote(
        &self,
        key: EntityKey,
        vote_type: VoteType,
        user_id: Option<&str>,
    ) -> VoteOutcome {
        let Some(user_id) = user_id else {
            tracing::debug!(%key, "vote ignored, no signed-in user");
            return VoteOutcome::Rejected(VoteRejection::Unauthenticated);
        };

        // Busy check, apply and gate entry happen under one write lock so two
        // votes cannot both pass the check.
        let _guard = {
            let mut store = self.store.write().await;
            let busy = match self.policy {
                VoteLockPolicy::Global => self.loading.is_busy(),
                VoteLockPolicy::PerKey => store.has_pending_vote(&key),
            };
            if busy {
                tracing::debug!(%key, policy = ?self.policy, "vote ignored, request in flight");
                return VoteOutcome::Rejected(VoteRejection::Busy);
            }
            if !store.apply_vote(&key, vote_type, user_id) {
                return VoteOutcome::Rejected(VoteRejection::EntityNotFound);
            }
            self.loading.enter()
        };
        let (result, fallback) = match &key {
            EntityKey::Thread(thread_id) => (
                self.gateway.submit_thread_vote(thread_id, vote_type).await,
                THREAD_VOTE_FAILED,
            ),
            EntityKey::Comment {
                thread_id,
                comment_id,
            } => (
                self.gateway
                    .submit_comment_vote(thread_id, comment_id, vote_type)
                    .await,
                COMMENT_VOTE_FAILED,
            ),
        };

        let mut store = self.store.write().await;
        match result {
            Ok(()) => {
                store.commit_vote(&key);
                tracing::info!(%key, %vote_type, "vote committed");
                VoteOutcome::Committed(vote_type)
            }
            Err(e) => {
                store.revert_vote(&key);
                let message = e.user_message(fallback);
                tracing::warn!(%key, %vote_type, error = %e, "vote rolled back");
                VoteOutcome::RolledBack { vote_type, message }
            }
        }
    }
}
