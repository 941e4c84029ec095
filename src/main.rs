mod cli;

use chrono::Utc;
use clap::Parser;
use forum_client::config::Config;
use forum_client::format::{format_relative, truncate_body};
use forum_client::models::EntityKey;
use forum_client::services::VoteOutcome;
use forum_client::{ForumClient, create_client};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::debug!("Configuration loaded successfully");

    let client = create_client(config).await?;
    client.bootstrap_session().await;

    run(&client, cli.command).await?;
    Ok(())
}

async fn run(client: &ForumClient, command: Command) -> forum_client::error::Result<()> {
    match command {
        Command::Threads { category } => {
            if let Some(category) = category {
                client.set_active_category(&category).await?;
            }
            print_threads(client).await;
        }
        Command::Thread { thread_id } => {
            client.fetch_thread_detail(&thread_id).await?;
            print_detail(client).await;
        }
        Command::Leaderboard => {
            let leaderboard = client.leaderboard().await;
            if let Some(error) = leaderboard.error {
                println!("{}", error);
            }
            for (rank, entry) in leaderboard.list.iter().enumerate() {
                println!("{:>3}. {:<30} {}", rank + 1, entry.user.name, entry.score);
            }
        }
        Command::Users => {
            for user in client.users().await.list {
                println!("{}  {}", user.id, user.name);
            }
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = client.register(&name, &email, &password).await?;
            println!("Registered {} ({})", user.name, user.id);
        }
        Command::Login { email, password } => {
            client.login(&email, &password).await?;
            let user = client.get_me().await?;
            println!("Signed in as {}", user.name);
        }
        Command::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Command::NewThread {
            title,
            body,
            category,
        } => {
            let thread = client
                .create_thread(&title, &body, category.as_deref())
                .await?;
            println!("Created thread {}", thread.id);
        }
        Command::Comment { thread_id, content } => {
            client.fetch_thread_detail(&thread_id).await?;
            let comment = client.create_comment(&thread_id, &content).await?;
            println!("Created comment {}", comment.id);
        }
        Command::VoteThread {
            thread_id,
            direction,
        } => {
            let outcome = client
                .press_vote(EntityKey::thread(thread_id), direction.into())
                .await;
            print_outcome(&outcome);
        }
        Command::VoteComment {
            thread_id,
            comment_id,
            direction,
        } => {
            client.fetch_thread_detail(&thread_id).await?;
            let outcome = client
                .press_vote(EntityKey::comment(thread_id, comment_id), direction.into())
                .await;
            print_outcome(&outcome);
        }
    }
    Ok(())
}

async fn print_threads(client: &ForumClient) {
    let now = Utc::now();
    let (filter, categories, error) = {
        let store = client.store().await;
        (
            store.active_category().to_string(),
            store.categories().join(", "),
            store.threads_error().map(str::to_string),
        )
    };
    if let Some(error) = error {
        println!("{}", error);
        return;
    }

    println!("Filter: {}   Categories: {}", filter, categories);
    for thread in client.filtered_threads().await {
        println!();
        println!(
            "[{:+}] {}  ({})",
            thread.votes.score(),
            thread.title,
            thread.id
        );
        println!(
            "     {} by {}, {} comments",
            format_relative(thread.created_at, now),
            client.owner_name(&thread.owner_id).await,
            thread.total_comments
        );
        println!("     {}", truncate_body(&thread.body, 120));
    }
}

async fn print_detail(client: &ForumClient) {
    let now = Utc::now();
    let store = client.store().await;
    let Some(detail) = store.detail() else {
        return;
    };

    println!("[{:+}] {}", detail.votes.score(), detail.title);
    println!(
        "{} by {}",
        format_relative(detail.created_at, now),
        detail.owner.name
    );
    println!();
    println!("{}", truncate_body(&detail.body, usize::MAX));
    println!();
    println!("Comments ({})", detail.comments.len());
    for comment in &detail.comments {
        println!(
            "  [{:+}] {} ({}, {})",
            comment.votes.score(),
            truncate_body(&comment.content, usize::MAX),
            comment.owner.name,
            format_relative(comment.created_at, now)
        );
    }
}

fn print_outcome(outcome: &VoteOutcome) {
    match outcome {
        VoteOutcome::Committed(vote_type) => println!("Vote recorded: {}", vote_type),
        VoteOutcome::RolledBack { message, .. } => println!("{}", message),
        VoteOutcome::Rejected(reason) => println!("Vote not sent: {:?}", reason),
    }
}
