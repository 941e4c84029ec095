//! Command-line surface over [`ForumClient`](forum_client::ForumClient).

use clap::{Parser, Subcommand, ValueEnum};
use forum_client::models::VoteButton;

#[derive(Parser)]
#[command(name = "forum", version, about = "Discussion forum client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List threads, optionally selecting a category filter first.
    Threads {
        /// Category to filter by; `ALL` clears the persisted filter.
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a thread with its comments.
    Thread { thread_id: String },
    Leaderboard,
    Users,
    Register {
        name: String,
        email: String,
        password: String,
    },
    Login { email: String, password: String },
    Logout,
    /// Start a new thread.
    NewThread {
        title: String,
        body: String,
        #[arg(long)]
        category: Option<String>,
    },
    Comment { thread_id: String, content: String },
    /// Vote on a thread; repeating the same direction takes the vote back.
    VoteThread {
        thread_id: String,
        #[arg(value_enum)]
        direction: Direction,
    },
    VoteComment {
        thread_id: String,
        comment_id: String,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteButton {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VoteButton::Upvote,
            Direction::Down => VoteButton::Downvote,
        }
    }
}
