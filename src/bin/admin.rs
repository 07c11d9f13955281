//! CLI administration tool for shortly.
//!
//! Provisions users and API tokens and offers a few database checks
//! without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a user
//! cargo run --bin admin -- user create alice
//!
//! # Issue an API token (prints the raw token once)
//! cargo run --bin admin -- token create
//!
//! # List or revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "CI token"
//!
//! # Totals and connectivity
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for token commands)

use shortly::application::services::AuthService;
use shortly::domain::repositories::{TokenRepository, UserRepository};
use shortly::infrastructure::persistence::{PgTokenRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortly.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show link and click totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create { username: String },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for a user
    Create {
        /// Owning username (prompted when omitted)
        #[arg(long)]
        user: Option<String>,

        /// Token name (prompted when omitted)
        #[arg(long)]
        name: Option<String>,
    },

    /// List all tokens
    List,

    /// Revoke a token by name
    Revoke { name: String },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connectivity
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::User { action } => handle_user(action, pool).await,
        Commands::Token { action } => handle_token(action, pool).await,
        Commands::Stats => show_stats(&pool).await,
        Commands::Db { action } => match action {
            DbAction::Check => check_db(&pool).await,
        },
    }
}

async fn handle_user(action: UserAction, pool: Arc<PgPool>) -> Result<()> {
    let users = PgUserRepository::new(pool);

    match action {
        UserAction::Create { username } => {
            let user = users
                .create(&username)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!(
                "{} user {} (id {})",
                "Created".green().bold(),
                user.username.bold(),
                user.id
            );
        }
        UserAction::List => {
            let all = users.list().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            if all.is_empty() {
                println!("{}", "No users found".yellow());
                return Ok(());
            }
            for user in all {
                println!(
                    "{:>5}  {}  created {}",
                    user.id,
                    user.username.bold(),
                    user.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}

async fn handle_token(action: TokenAction, pool: Arc<PgPool>) -> Result<()> {
    let tokens = Arc::new(PgTokenRepository::new(pool.clone()));
    let users = Arc::new(PgUserRepository::new(pool));

    match action {
        TokenAction::Create { user, name } => {
            let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
                .context("TOKEN_SIGNING_SECRET must be set")?;

            let username: String = match user {
                Some(u) => u,
                None => Input::new().with_prompt("Username").interact_text()?,
            };

            let owner = users
                .find_by_username(&username)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?
                .with_context(|| format!("Unknown user: {username}"))?;

            let token_name: String = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Token name").interact_text()?,
            };

            let auth = AuthService::new(tokens, users, signing_secret);
            let (raw_token, stored) = auth
                .issue_token(owner.id, &token_name)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;

            println!(
                "{} token {} for {}",
                "Created".green().bold(),
                stored.name.bold(),
                owner.username.bold()
            );
            println!();
            println!("  {raw_token}");
            println!();
            println!(
                "{}",
                "Store this token now; it cannot be recovered later.".yellow()
            );
        }
        TokenAction::List => {
            let all = tokens.list().await.map_err(|e| anyhow::anyhow!("{e}"))?;
            if all.is_empty() {
                println!("{}", "No tokens found".yellow());
                return Ok(());
            }
            for token in all {
                let status = if token.revoked_at.is_some() {
                    "revoked".red()
                } else {
                    "active".green()
                };
                let last_used = token
                    .last_used_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{:>5}  {}  user {}  {}  last used {}",
                    token.id,
                    token.name.bold(),
                    token.user_id,
                    status,
                    last_used
                );
            }
        }
        TokenAction::Revoke { name } => {
            let confirmed = Confirm::new()
                .with_prompt(format!("Revoke token \"{name}\"?"))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("{}", "Aborted".yellow());
                return Ok(());
            }

            let revoked = tokens
                .revoke(&name)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;

            if revoked {
                println!("{} token {}", "Revoked".green().bold(), name.bold());
            } else {
                println!("{}: no active token named {}", "Not found".red(), name);
            }
        }
    }

    Ok(())
}

async fn show_stats(pool: &PgPool) -> Result<()> {
    let total_links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;
    let total_clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_clicks")
        .fetch_one(pool)
        .await?;
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    println!("{}", "Totals".bold());
    println!("  users:  {total_users}");
    println!("  links:  {total_links}");
    println!("  clicks: {total_clicks}");

    Ok(())
}

async fn check_db(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    println!("{}", "Database connection OK".green().bold());
    Ok(())
}
