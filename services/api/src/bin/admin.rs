//! Operator CLI for account administration outside the HTTP surface.
//!
//! ```bash
//! yamdb-admin create-superuser --username root --email root@example.com
//! yamdb-admin set-role --username alice --role moderator
//! ```

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use serde::Deserialize;
use uuid::Uuid;

use yamdb_api::infra::db::DbUserRepository;
use yamdb_api::usecase::user::{BootstrapSuperuserUseCase, SetRoleUseCase};
use yamdb_core::config::Config;
use yamdb_core::tracing::{LogFormat, init_tracing};
use yamdb_domain::id::UserId;
use yamdb_domain::policy::{Principal, Subject};
use yamdb_domain::user::Role;

#[derive(Deserialize)]
struct AdminConfig {
    database_url: String,
    #[serde(default)]
    log_format: LogFormat,
}

impl Config for AdminConfig {}

#[derive(Parser)]
#[command(name = "yamdb-admin", about = "YaMDb account administration")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an admin superuser, or promote the matching account to one.
    CreateSuperuser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    /// Change the role of an existing account.
    SetRole {
        #[arg(long)]
        username: String,
        /// user, moderator or admin
        #[arg(long)]
        role: String,
    },
}

/// The CLI acts with superuser authority.
fn operator() -> Subject {
    Principal {
        id: UserId(Uuid::nil()),
        role: Role::Admin,
        is_superuser: true,
    }
    .into()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AdminConfig::from_env()?;
    init_tracing(config.log_format);

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    let repo = DbUserRepository { db };

    match args.command {
        Command::CreateSuperuser { username, email } => {
            let user = BootstrapSuperuserUseCase { repo }
                .execute(username, email)
                .await?;
            println!("superuser {} ({}) ready", user.username, user.id);
        }
        Command::SetRole { username, role } => {
            let role: Role = role.parse().context("invalid --role")?;
            let user = SetRoleUseCase { repo }
                .execute(&operator(), &username, role)
                .await?;
            println!("{} is now {}", user.username, user.role);
        }
    }
    Ok(())
}
