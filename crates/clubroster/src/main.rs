mod commands;
mod config;
mod output;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use clubroster_core::graduation::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, output::aprintln, storage::SqliteRepository};

/// Clubroster - Student club directory maintenance
#[derive(Parser, Debug)]
#[command(name = "clubroster")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "CLUBROSTER_DATABASE")]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Deactivate club memberships of students who have graduated
    GraduateUsers(commands::graduate_users::GraduateUsersCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubroster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config = config.with_sqlite_path(database);
    }

    tracing::debug!(database = %config.sqlite_path, "Opening database");
    let repo = SqliteRepository::new(&config.sqlite_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.sqlite_path))?;

    match cli.command {
        Commands::GraduateUsers(cmd) => {
            let report = commands::graduate_users::run(cmd, &repo, &config, &SystemClock).await?;
            aprintln!("{}", output::green(&report.to_string()));
        }
    }

    Ok(())
}
