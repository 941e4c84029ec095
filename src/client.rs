use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use validator::Validate;

use crate::{
    config::Config,
    error::Result,
    models::{
        Comment, CreateCommentRequest, CreateThreadRequest, EntityKey, LeaderboardEntry,
        LoginRequest, RegisterRequest, Thread, ThreadDetail, User, VoteButton, VoteType,
    },
    services::{ForumGateway, VoteController, VoteOutcome},
    storage::{FILTER_KEY, KeyValueStore, TOKEN_KEY},
    store::{
        CategoryFilter, EntityStore, LeaderboardState, LoadingGate, SessionState, UsersState,
    },
};

/// Application context: every piece of client state and the collaborators
/// that feed it.
///
/// Created once at startup; all mutations go through its methods. Cloning is
/// cheap and clones share state.
#[derive(Clone)]
pub struct ForumClient {
    pub config: Arc<Config>,
    gateway: Arc<dyn ForumGateway>,
    storage: Arc<dyn KeyValueStore>,
    store: Arc<RwLock<EntityStore>>,
    session: Arc<RwLock<SessionState>>,
    users: Arc<RwLock<UsersState>>,
    leaderboard: Arc<RwLock<LeaderboardState>>,
    loading: LoadingGate,
    votes: VoteController,
}

impl ForumClient {
    pub fn new(
        config: Config,
        gateway: Arc<dyn ForumGateway>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let store = Arc::new(RwLock::new(EntityStore::new()));
        let loading = LoadingGate::new();
        let votes = VoteController::new(
            store.clone(),
            loading.clone(),
            gateway.clone(),
            config.vote_lock,
        );

        Self {
            config: Arc::new(config),
            gateway,
            storage,
            store,
            session: Arc::new(RwLock::new(SessionState::default())),
            users: Arc::new(RwLock::new(UsersState::default())),
            leaderboard: Arc::new(RwLock::new(LeaderboardState::default())),
            loading,
            votes,
        }
    }

    pub fn loading(&self) -> &LoadingGate {
        &self.loading
    }

    pub async fn store(&self) -> RwLockReadGuard<'_, EntityStore> {
        self.store.read().await
    }

    pub async fn session(&self) -> SessionState {
        self.session.read().await.clone()
    }

    pub async fn users(&self) -> UsersState {
        self.users.read().await.clone()
    }

    pub async fn leaderboard(&self) -> LeaderboardState {
        self.leaderboard.read().await.clone()
    }

    pub async fn owner_name(&self, owner_id: &str) -> String {
        self.users.read().await.owner_name(owner_id).to_string()
    }

    // Session

    /// Restores a persisted session and loads the initial collections.
    ///
    /// Each load records its own failure in its state slot; one failing load
    /// does not stop the others.
    pub async fn bootstrap_session(&self) {
        match self.storage.get(TOKEN_KEY).await {
            Ok(Some(token)) => {
                self.gateway.set_token(Some(&token));
                self.session.write().await.token = Some(token);
                if let Err(e) = self.get_me().await {
                    tracing::warn!("Stored session is no longer valid: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read stored session: {}", e),
        }

        let (users, threads, leaderboard) = tokio::join!(
            self.fetch_users(),
            self.fetch_threads(),
            self.fetch_leaderboard()
        );
        for e in [users.err(), threads.err(), leaderboard.err()]
            .into_iter()
            .flatten()
        {
            tracing::warn!("Bootstrap load failed: {}", e);
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let _guard = self.loading.enter();

        let result = match request.validate() {
            Ok(()) => self.gateway.register(&request).await,
            Err(e) => Err(e.into()),
        };
        match result {
            Ok(user) => {
                tracing::info!("Registered user {}", user.id);
                self.session.write().await.error = None;
                Ok(user)
            }
            Err(e) => {
                self.session.write().await.error = Some(e.user_message("Registration failed"));
                Err(e)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let _guard = self.loading.enter();

        let result = match request.validate() {
            Ok(()) => self.gateway.login(&request).await,
            Err(e) => Err(e.into()),
        };
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                self.session.write().await.error = Some(e.user_message("Login failed"));
                return Err(e);
            }
        };

        self.storage.set(TOKEN_KEY, &token).await?;
        self.gateway.set_token(Some(&token));
        let mut session = self.session.write().await;
        session.token = Some(token);
        session.error = None;
        tracing::info!("Logged in");
        Ok(())
    }

    /// Loads the signed-in user's profile. A rejected token is forgotten.
    pub async fn get_me(&self) -> Result<User> {
        let _guard = self.loading.enter();
        match self.gateway.get_own_profile().await {
            Ok(user) => {
                let mut session = self.session.write().await;
                session.user = Some(user.clone());
                session.error = None;
                Ok(user)
            }
            Err(e) => {
                if let Err(storage_err) = self.storage.remove(TOKEN_KEY).await {
                    tracing::warn!("Failed to forget session token: {}", storage_err);
                }
                self.gateway.set_token(None);
                let mut session = self.session.write().await;
                session.token = None;
                session.error = Some(e.user_message("Failed to get user info"));
                Err(e)
            }
        }
    }

    /// Ends the session and tears down per-user state.
    pub async fn logout(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.gateway.set_token(None);
        self.session.write().await.clear();

        let mut store = self.store.write().await;
        store.clear_detail();
        store.clear_pending_votes();
        tracing::info!("Logged out");
        Ok(())
    }

    // Users and leaderboard

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let _guard = self.loading.enter();
        match self.gateway.get_all_users().await {
            Ok(list) => {
                let mut users = self.users.write().await;
                users.list = list.clone();
                users.error = None;
                Ok(list)
            }
            Err(e) => {
                self.users.write().await.error = Some(e.user_message("Failed to fetch users"));
                Err(e)
            }
        }
    }

    pub async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let _guard = self.loading.enter();
        match self.gateway.get_leaderboards().await {
            Ok(list) => {
                let mut leaderboard = self.leaderboard.write().await;
                leaderboard.list = list.clone();
                leaderboard.error = None;
                Ok(list)
            }
            Err(e) => {
                self.leaderboard.write().await.error =
                    Some(e.user_message("Failed to fetch leaderboard"));
                Err(e)
            }
        }
    }

    // Threads

    async fn stored_filter(&self) -> CategoryFilter {
        match self.storage.get(FILTER_KEY).await {
            Ok(Some(value)) => CategoryFilter::from_stored(&value),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                tracing::warn!("Failed to read category filter: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Reloads the thread list and restores the persisted category filter.
    pub async fn fetch_threads(&self) -> Result<()> {
        let _guard = self.loading.enter();
        match self.gateway.get_all_threads().await {
            Ok(threads) => {
                let filter = self.stored_filter().await;
                let mut store = self.store.write().await;
                tracing::debug!("Loaded {} threads", threads.len());
                store.replace_threads(threads);
                store.set_active_category(filter);
                Ok(())
            }
            Err(e) => {
                self.store
                    .write()
                    .await
                    .set_threads_error(e.user_message("Failed to fetch threads"));
                Err(e)
            }
        }
    }

    pub async fn create_thread(
        &self,
        title: &str,
        body: &str,
        category: Option<&str>,
    ) -> Result<Thread> {
        let request = CreateThreadRequest::new(title, body, category);
        let _guard = self.loading.enter();

        let result = match request.validate() {
            Ok(()) => self.gateway.create_thread(&request).await,
            Err(e) => Err(e.into()),
        };
        let mut store = self.store.write().await;
        match result {
            Ok(thread) => {
                tracing::info!("Created thread {}", thread.id);
                store.prepend_thread(thread.clone());
                Ok(thread)
            }
            Err(e) => {
                store.set_threads_error(e.user_message("Failed to create thread"));
                Err(e)
            }
        }
    }

    /// Selects the category filter and persists it. `"ALL"` clears it.
    pub async fn set_active_category(&self, category: &str) -> Result<()> {
        let filter = CategoryFilter::from_stored(category);
        self.store.write().await.set_active_category(filter.clone());
        self.storage.set(FILTER_KEY, filter.as_stored()).await
    }

    pub async fn filtered_threads(&self) -> Vec<Thread> {
        self.store
            .read()
            .await
            .filtered_threads()
            .into_iter()
            .cloned()
            .collect()
    }

    // Thread detail

    pub async fn fetch_thread_detail(&self, thread_id: &str) -> Result<ThreadDetail> {
        let _guard = self.loading.enter();
        match self.gateway.get_thread_detail(thread_id).await {
            Ok(detail) => {
                self.store.write().await.replace_detail(detail.clone());
                Ok(detail)
            }
            Err(e) => {
                self.store
                    .write()
                    .await
                    .set_detail_error(e.user_message("Failed to fetch thread detail"));
                Err(e)
            }
        }
    }

    pub async fn clear_thread(&self) {
        self.store.write().await.clear_detail();
    }

    pub async fn create_comment(&self, thread_id: &str, content: &str) -> Result<Comment> {
        let request = CreateCommentRequest {
            content: content.trim().to_string(),
        };
        let _guard = self.loading.enter();

        let result = match request.validate() {
            Ok(()) => self.gateway.create_comment(thread_id, &request).await,
            Err(e) => Err(e.into()),
        };
        let mut store = self.store.write().await;
        match result {
            Ok(comment) => {
                store.prepend_comment(thread_id, comment.clone());
                Ok(comment)
            }
            Err(e) => {
                store.set_detail_error(e.user_message("Failed to create comment"));
                Err(e)
            }
        }
    }

    // Votes

    async fn current_user_id(&self) -> Option<String> {
        self.session.read().await.user_id().map(str::to_string)
    }

    /// Handles a vote button press with toggle semantics.
    pub async fn press_vote(&self, key: EntityKey, button: VoteButton) -> VoteOutcome {
        let user_id = self.current_user_id().await;
        self.votes.press(key, button, user_id.as_deref()).await
    }

    pub async fn cast_vote(&self, key: EntityKey, vote_type: VoteType) -> VoteOutcome {
        let user_id = self.current_user_id().await;
        self.votes.cast_vote(key, vote_type, user_id.as_deref()).await
    }
}

impl std::fmt::Debug for ForumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForumClient")
            .field("config", &self.config)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::VoteSets;
    use crate::services::VoteRejection;
    use crate::storage::MemoryStore;
    use crate::testing::{
        MOCK_EMAIL, MOCK_PASSWORD, MOCK_TOKEN, MockGateway, comment, detail, no_voters, thread,
        user,
    };

    fn client_with(gateway: MockGateway) -> (ForumClient, Arc<MockGateway>, Arc<MemoryStore>) {
        let gateway = Arc::new(gateway);
        let storage = Arc::new(MemoryStore::new());
        let client = ForumClient::new(Config::default(), gateway.clone(), storage.clone());
        (client, gateway, storage)
    }

    async fn signed_in(gateway: MockGateway) -> (ForumClient, Arc<MockGateway>, Arc<MemoryStore>) {
        let (client, gateway, storage) = client_with(gateway);
        client.login(MOCK_EMAIL, MOCK_PASSWORD).await.unwrap();
        client.get_me().await.unwrap();
        (client, gateway, storage)
    }

    #[tokio::test]
    async fn login_persists_token() {
        let (client, gateway, storage) = client_with(MockGateway::new());

        client.login(MOCK_EMAIL, MOCK_PASSWORD).await.unwrap();

        assert_eq!(
            storage.get(TOKEN_KEY).await.unwrap().as_deref(),
            Some(MOCK_TOKEN)
        );
        assert_eq!(gateway.token.lock().unwrap().as_deref(), Some(MOCK_TOKEN));
        assert_eq!(client.session().await.token.as_deref(), Some(MOCK_TOKEN));
        assert_eq!(client.loading().count(), 0);
    }

    #[tokio::test]
    async fn wrong_credentials_surface_remote_message() {
        let (client, _gateway, storage) = client_with(MockGateway::new());

        assert!(client.login(MOCK_EMAIL, "wrong-password").await.is_err());

        let session = client.session().await;
        assert_eq!(session.error.as_deref(), Some("email or password is wrong"));
        assert!(session.token.is_none());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_login_input_never_reaches_network() {
        let (client, gateway, _storage) = client_with(MockGateway::new());

        let err = client.login("not-an-email", "x").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(gateway.calls().is_empty());
        assert!(client.session().await.error.is_some());
    }

    #[tokio::test]
    async fn register_reports_taken_email() {
        let (client, _gateway, _storage) = client_with(MockGateway::new());

        let created = client
            .register("Test User", "new@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(created.name, "Test User");

        assert!(
            client
                .register("Test User", "existing@example.com", "password123")
                .await
                .is_err()
        );
        assert_eq!(
            client.session().await.error.as_deref(),
            Some("email is already taken")
        );
    }

    #[tokio::test]
    async fn rejected_profile_forgets_token() {
        let (client, gateway, storage) = client_with(MockGateway::new());
        storage.set(TOKEN_KEY, "expired-token").await.unwrap();

        client.bootstrap_session().await;

        let session = client.session().await;
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert_eq!(session.error.as_deref(), Some("Unauthorized"));
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(gateway.token.lock().unwrap().as_deref(), None);
    }

    #[tokio::test]
    async fn bootstrap_restores_session_and_survives_failures() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", Some("react"), VoteSets::default())];
        *gateway.users.lock().unwrap() = vec![user("owner-1", "Dimas")];
        gateway.fail("leaderboard");
        let (client, _gateway, storage) = client_with(gateway);
        storage.set(TOKEN_KEY, MOCK_TOKEN).await.unwrap();

        client.bootstrap_session().await;

        let session = client.session().await;
        assert_eq!(session.user_id(), Some("user-1"));
        assert_eq!(client.store().await.threads().len(), 1);
        assert_eq!(client.owner_name("owner-1").await, "Dimas");
        assert_eq!(
            client.leaderboard().await.error.as_deref(),
            Some("Failed to fetch leaderboard")
        );
        assert_eq!(client.loading().count(), 0);
    }

    #[tokio::test]
    async fn active_category_is_persisted_and_filters() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![
            thread("t1", Some("JavaScript"), VoteSets::default()),
            thread("t2", Some("css"), VoteSets::default()),
        ];
        let (client, _gateway, storage) = client_with(gateway);
        client.fetch_threads().await.unwrap();

        client.set_active_category("JavaScript").await.unwrap();

        assert_eq!(
            storage.get(FILTER_KEY).await.unwrap().as_deref(),
            Some("JavaScript")
        );
        let filtered = client.filtered_threads().await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "t1");
        assert_eq!(
            client.store().await.active_category().to_string(),
            "Javascript"
        );
        assert_eq!(client.store().await.categories(), ["Css", "Javascript"]);
    }

    #[tokio::test]
    async fn reload_restores_persisted_category() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![
            thread("t1", Some("react"), VoteSets::default()),
            thread("t2", Some("css"), VoteSets::default()),
        ];
        let (client, _gateway, storage) = client_with(gateway);
        storage.set(FILTER_KEY, "React").await.unwrap();

        client.fetch_threads().await.unwrap();
        assert_eq!(
            *client.store().await.active_category(),
            CategoryFilter::Category("React".to_string())
        );

        client.set_active_category("ALL").await.unwrap();
        client.fetch_threads().await.unwrap();
        assert_eq!(*client.store().await.active_category(), CategoryFilter::All);
        assert_eq!(client.filtered_threads().await.len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_is_recorded() {
        let gateway = MockGateway::new();
        gateway.fail("threads");
        let (client, _gateway, _storage) = client_with(gateway);

        assert!(client.fetch_threads().await.is_err());
        assert_eq!(
            client.store().await.threads_error(),
            Some("Failed to fetch threads")
        );
        assert_eq!(client.loading().count(), 0);
    }

    #[tokio::test]
    async fn create_thread_prepends_and_merges_category() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", Some("javascript"), VoteSets::default())];
        let (client, _gateway, _storage) = signed_in(gateway).await;
        client.fetch_threads().await.unwrap();

        let created = client
            .create_thread("New Thread", "Thread body", Some("python"))
            .await
            .unwrap();

        let store = client.store().await;
        assert_eq!(store.threads()[0].id, created.id);
        assert_eq!(store.categories(), ["Javascript", "Python"]);
    }

    #[tokio::test]
    async fn thread_detail_and_comments() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", None, VoteSets::default())];
        *gateway.detail.lock().unwrap() = Some(detail(
            "t1",
            VoteSets::default(),
            vec![comment("c1", VoteSets::default())],
        ));
        let (client, _gateway, _storage) = signed_in(gateway).await;
        client.fetch_threads().await.unwrap();

        client.fetch_thread_detail("t1").await.unwrap();
        client.create_comment("t1", "Nice thread").await.unwrap();

        {
            let store = client.store().await;
            let detail = store.detail().unwrap();
            assert_eq!(detail.comments.len(), 2);
            assert_eq!(detail.comments[0].content, "Nice thread");
            assert_eq!(store.thread("t1").unwrap().total_comments, 2);
        }

        assert!(client.fetch_thread_detail("t404").await.is_err());
        assert_eq!(
            client.store().await.detail_error(),
            Some("thread tidak ditemukan")
        );

        client.clear_thread().await;
        assert!(client.store().await.detail().is_none());
    }

    #[tokio::test]
    async fn failed_thread_vote_reverts_silently() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", None, VoteSets::default())];
        gateway.fail("vote_thread");
        let (client, _gateway, _storage) = signed_in(gateway).await;
        client.fetch_threads().await.unwrap();

        let outcome = client
            .press_vote(EntityKey::thread("t1"), VoteButton::Upvote)
            .await;

        assert!(matches!(outcome, VoteOutcome::RolledBack { .. }));
        let store = client.store().await;
        assert_eq!(store.thread("t1").unwrap().votes, VoteSets::default());
        assert!(store.threads_error().is_none());
        assert_eq!(client.loading().count(), 0);
    }

    #[tokio::test]
    async fn thread_vote_updates_list_and_detail() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", None, VoteSets::default())];
        *gateway.detail.lock().unwrap() = Some(detail("t1", VoteSets::default(), vec![]));
        let (client, _gateway, _storage) = signed_in(gateway).await;
        client.fetch_threads().await.unwrap();
        client.fetch_thread_detail("t1").await.unwrap();

        let outcome = client
            .cast_vote(EntityKey::thread("t1"), VoteType::Down)
            .await;

        assert_eq!(outcome, VoteOutcome::Committed(VoteType::Down));
        let store = client.store().await;
        let expected = VoteSets::new(no_voters(), ["user-1"]);
        assert_eq!(store.thread("t1").unwrap().votes, expected);
        assert_eq!(store.detail().unwrap().votes, expected);
    }

    #[tokio::test]
    async fn vote_requires_signed_in_user() {
        let gateway = MockGateway::new();
        *gateway.threads.lock().unwrap() = vec![thread("t1", None, VoteSets::default())];
        let (client, gateway, _storage) = client_with(gateway);
        client.fetch_threads().await.unwrap();

        let outcome = client
            .press_vote(EntityKey::thread("t1"), VoteButton::Upvote)
            .await;

        assert_eq!(
            outcome,
            VoteOutcome::Rejected(VoteRejection::Unauthenticated)
        );
        assert!(!gateway.calls().iter().any(|c| c.starts_with("vote_")));
    }

    #[tokio::test]
    async fn logout_tears_down_session() {
        let gateway = MockGateway::new();
        *gateway.detail.lock().unwrap() = Some(detail("t1", VoteSets::default(), vec![]));
        let (client, gateway, storage) = signed_in(gateway).await;
        client.fetch_thread_detail("t1").await.unwrap();

        client.logout().await.unwrap();

        assert!(!client.session().await.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(gateway.token.lock().unwrap().as_deref(), None);
        assert!(client.store().await.detail().is_none());
    }
}
