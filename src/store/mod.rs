pub mod categories;
pub mod entity_store;
pub mod loading;
pub mod session;

pub use categories::CategoryFilter;
pub use entity_store::{EntityStore, VoteSnapshot, VoteState};
pub use loading::{LoadingGate, LoadingGuard};
pub use session::{LeaderboardState, SessionState, UsersState};
