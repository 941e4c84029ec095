use crate::models::{LeaderboardEntry, User};

/// Authentication state: the session token and the signed-in user.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Id of the signed-in user, only once the profile has loaded.
    pub fn user_id(&self) -> Option<&str> {
        if self.token.is_none() {
            return None;
        }
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.error = None;
    }
}

/// Users directory, used to resolve thread owners.
#[derive(Debug, Default, Clone)]
pub struct UsersState {
    pub list: Vec<User>,
    pub error: Option<String>,
}

impl UsersState {
    pub fn find(&self, user_id: &str) -> Option<&User> {
        self.list.iter().find(|u| u.id == user_id)
    }

    pub fn owner_name(&self, owner_id: &str) -> &str {
        self.find(owner_id).map_or("Unknown", |u| u.name.as_str())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LeaderboardState {
    pub list: Vec<LeaderboardEntry>,
    pub error: Option<String>,
}
