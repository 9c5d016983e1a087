//! User command - loads a seed file into the in-memory store and queries it

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::User;
use crate::infrastructure::user::{InMemoryUserRepository, UserService};

/// Arguments for the user command
#[derive(Args, Clone)]
pub struct UserArgs {
    /// JSON file holding an array of users (overrides config)
    #[arg(long)]
    pub seed: Option<PathBuf>,

    #[command(subcommand)]
    pub query: UserQuery,
}

#[derive(Subcommand, Clone)]
pub enum UserQuery {
    /// Get a user by ID
    Get { id: String },

    /// Get a user by blood hash
    ByBloodHash { blood_hash: String },

    /// Show the balance of a user (zero when unknown)
    Balance { id: String },
}

/// Parse the contents of a seed file
pub fn parse_seed(contents: &str) -> anyhow::Result<Vec<User>> {
    serde_json::from_str(contents).context("Seed file must be a JSON array of users")
}

async fn load_seed(path: Option<PathBuf>) -> anyhow::Result<Vec<User>> {
    let Some(path) = path else {
        warn!("No seed file configured, starting with an empty user store");
        return Ok(Vec::new());
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let users = parse_seed(&contents)?;
    info!(path = %path.display(), users = users.len(), "Loaded seed file");
    Ok(users)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run the user command
pub async fn run(args: UserArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let seed = args
        .seed
        .or_else(|| config.storage.seed_file.as_ref().map(PathBuf::from));

    let repository = InMemoryUserRepository::with_users(load_seed(seed).await?);
    let service = UserService::new(Arc::new(repository));

    let found = match args.query {
        UserQuery::Get { id } => service.get(&id).await?,
        UserQuery::ByBloodHash { blood_hash } => service.get_by_blood_hash(&blood_hash).await?,
        UserQuery::Balance { id } => {
            print_json(&service.balance(&id).await?)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    print_json(&found)?;

    Ok(if found.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
