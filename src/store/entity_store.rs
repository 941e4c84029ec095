use std::collections::HashMap;

use crate::models::{Comment, EntityKey, Thread, ThreadDetail, VoteSets, VoteType};
use crate::store::categories::{self, CategoryFilter};

/// Pre-mutation vote sets of one entity, captured by an optimistic vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSnapshot {
    pub key: EntityKey,
    pub votes: VoteSets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteState {
    Clean,
    PendingVote(VoteSnapshot),
}

/// Client-side entity store: thread list, active thread detail and the vote
/// ledger.
///
/// A `Thread` key addresses every loaded copy of the thread (list entry and
/// detail). The copies are kept in sync whenever either side is reloaded, so
/// a single snapshot restores both.
#[derive(Debug, Default)]
pub struct EntityStore {
    threads: Vec<Thread>,
    categories: Vec<String>,
    active_category: CategoryFilter,
    threads_error: Option<String>,
    detail: Option<ThreadDetail>,
    detail_error: Option<String>,
    pending: HashMap<EntityKey, VoteSnapshot>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn thread(&self, thread_id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == thread_id)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn active_category(&self) -> &CategoryFilter {
        &self.active_category
    }

    pub fn set_active_category(&mut self, filter: CategoryFilter) {
        self.active_category = filter;
    }

    pub fn filtered_threads(&self) -> Vec<&Thread> {
        self.threads
            .iter()
            .filter(|t| self.active_category.matches(t))
            .collect()
    }

    pub fn threads_error(&self) -> Option<&str> {
        self.threads_error.as_deref()
    }

    pub fn set_threads_error(&mut self, message: impl Into<String>) {
        self.threads_error = Some(message.into());
    }

    pub fn detail(&self) -> Option<&ThreadDetail> {
        self.detail.as_ref()
    }

    pub fn detail_error(&self) -> Option<&str> {
        self.detail_error.as_deref()
    }

    pub fn set_detail_error(&mut self, message: impl Into<String>) {
        self.detail_error = Some(message.into());
    }

    /// Replaces the thread list with freshly fetched data.
    pub fn replace_threads(&mut self, threads: Vec<Thread>) {
        self.categories = categories::collect_categories(&threads);
        self.threads = threads;
        self.threads_error = None;
        self.pending
            .retain(|key, _| !matches!(key, EntityKey::Thread(_)));

        if let Some(detail) = self.detail.as_mut() {
            if let Some(thread) = self.threads.iter().find(|t| t.id == detail.id) {
                detail.votes = thread.votes.clone();
            }
        }
    }

    pub fn prepend_thread(&mut self, thread: Thread) {
        if let Some(category) = categories::normalized_category(&thread) {
            categories::merge_category(&mut self.categories, &category);
        }
        self.threads.insert(0, thread);
    }

    /// Replaces the active detail wholesale. Pending snapshots for the thread
    /// and all comments are dropped.
    pub fn replace_detail(&mut self, detail: ThreadDetail) {
        self.pending.retain(|key, _| match key {
            EntityKey::Thread(thread_id) => *thread_id != detail.id,
            EntityKey::Comment { .. } => false,
        });

        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == detail.id) {
            thread.votes = detail.votes.clone();
            thread.total_comments = detail.comments.len() as u32;
        }
        self.detail = Some(detail);
        self.detail_error = None;
    }

    /// Inserts a newly created comment at the top. Returns `false` when no
    /// detail for `thread_id` is loaded.
    pub fn prepend_comment(&mut self, thread_id: &str, comment: Comment) -> bool {
        let Some(detail) = self.detail.as_mut().filter(|d| d.id == thread_id) else {
            return false;
        };
        detail.comments.insert(0, comment);

        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            thread.total_comments += 1;
        }
        true
    }

    pub fn clear_detail(&mut self) {
        self.detail = None;
        self.detail_error = None;
        self.pending
            .retain(|key, _| !matches!(key, EntityKey::Comment { .. }));
    }

    /// Current vote sets of the entity behind `key`.
    pub fn votes(&self, key: &EntityKey) -> Option<&VoteSets> {
        match key {
            EntityKey::Thread(thread_id) => self
                .detail
                .as_ref()
                .filter(|d| d.id == *thread_id)
                .map(|d| &d.votes)
                .or_else(|| self.thread(thread_id).map(|t| &t.votes)),
            EntityKey::Comment {
                thread_id,
                comment_id,
            } => self
                .detail
                .as_ref()
                .filter(|d| d.id == *thread_id)
                .and_then(|d| d.comment(comment_id))
                .map(|c| &c.votes),
        }
    }

    fn copies_mut(&mut self, key: &EntityKey) -> Vec<&mut VoteSets> {
        let mut copies = Vec::new();
        match key {
            EntityKey::Thread(thread_id) => {
                if let Some(thread) = self.threads.iter_mut().find(|t| t.id == *thread_id) {
                    copies.push(&mut thread.votes);
                }
                if let Some(detail) = self.detail.as_mut().filter(|d| d.id == *thread_id) {
                    copies.push(&mut detail.votes);
                }
            }
            EntityKey::Comment {
                thread_id,
                comment_id,
            } => {
                if let Some(comment) = self
                    .detail
                    .as_mut()
                    .filter(|d| d.id == *thread_id)
                    .and_then(|d| d.comment_mut(comment_id))
                {
                    copies.push(&mut comment.votes);
                }
            }
        }
        copies
    }

    /// Optimistically applies a vote, snapshotting the prior sets under `key`.
    ///
    /// Overwrites any unresolved snapshot for the same key. Returns `false`
    /// and changes nothing when the entity is not loaded.
    pub fn apply_vote(&mut self, key: &EntityKey, vote_type: VoteType, user_id: &str) -> bool {
        let Some(before) = self.votes(key).cloned() else {
            return false;
        };

        if self.pending.contains_key(key) {
            tracing::debug!(%key, "overwriting unresolved vote snapshot");
        }
        self.pending.insert(
            key.clone(),
            VoteSnapshot {
                key: key.clone(),
                votes: before,
            },
        );

        for votes in self.copies_mut(key) {
            votes.apply(vote_type, user_id);
        }
        true
    }

    /// Drops the snapshot for `key`, keeping the applied sets.
    pub fn commit_vote(&mut self, key: &EntityKey) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Restores the snapshot for `key` and drops it. A no-op without a
    /// snapshot; a snapshot whose entity has gone is dropped unused.
    pub fn revert_vote(&mut self, key: &EntityKey) -> bool {
        let Some(snapshot) = self.pending.remove(key) else {
            return false;
        };

        let copies = self.copies_mut(key);
        if copies.is_empty() {
            return false;
        }
        for votes in copies {
            *votes = snapshot.votes.clone();
        }
        true
    }

    pub fn vote_state(&self, key: &EntityKey) -> VoteState {
        match self.pending.get(key) {
            Some(snapshot) => VoteState::PendingVote(snapshot.clone()),
            None => VoteState::Clean,
        }
    }

    pub fn has_pending_vote(&self, key: &EntityKey) -> bool {
        self.pending.contains_key(key)
    }

    pub fn pending_votes(&self) -> usize {
        self.pending.len()
    }

    pub fn clear_pending_votes(&mut self) {
        self.pending.clear();
    }
}
