pub mod comment;
pub mod thread;
pub mod user;
pub mod vote;

pub use comment::*;
pub use thread::*;
pub use user::*;
pub use vote::*;
