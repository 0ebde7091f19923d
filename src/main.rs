//! Bookshelf server and admin commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bookshelf::{
    auth::JwtManager, config::Settings, crud::UsersCrud, entities::user, migration::Migrator,
    routes, state::AppState,
};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalog REST API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations, then serve the API (default)
    Serve,
    /// Apply pending migrations
    Migrate,
    /// Revert the last applied migration
    Rollback,
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Change the access level of an account
    Grant {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum)]
        level: AccessLevel,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AccessLevel {
    Reader,
    Librarian,
    Admin,
}

impl From<AccessLevel> for i32 {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Reader => user::READER,
            AccessLevel::Librarian => user::LIBRARIAN,
            AccessLevel::Admin => user::ADMIN,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let default_filter = if settings.debug {
        "bookshelf=debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let db = Database::connect(&settings.database_url)
        .await
        .context("failed to connect to the database")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            Migrator::up(&db, None).await?;
            serve(db, &settings).await?;
        }
        Command::Migrate => {
            Migrator::up(&db, None).await?;
            info!("migrations applied");
        }
        Command::Rollback => {
            Migrator::down(&db, Some(1)).await?;
            info!("last migration reverted");
        }
        Command::Fresh => {
            Migrator::fresh(&db).await?;
            info!("schema recreated");
        }
        Command::Grant { email, level } => {
            let user = UsersCrud::new(&db).grant(&email, level.into()).await?;
            info!(user_id = user.id, access_level = user.access_level, "access level granted");
        }
    }

    Ok(())
}

async fn serve(db: sea_orm::DatabaseConnection, settings: &Settings) -> Result<()> {
    let jwt = JwtManager::new(&settings.jwt_secret_key, settings.jwt_token_expiration);
    let app = routes::app(AppState::new(db, jwt), &settings.cors_allowed_origins);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}, docs at /docs");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
