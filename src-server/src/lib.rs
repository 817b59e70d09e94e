//! Lia task store
//!
//! Authoritative owner of task positions. Every partition
//! `(status, is_urgent)` keeps dense positions after each request.

pub mod domain;
pub mod http;
pub mod repository;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::http::{build_router, AppState};
use crate::repository::{init_db, TaskRepository};

/// Command line of the server binary
#[derive(Debug, Clone, Parser)]
#[command(name = "lia-tasks-server", about = "Task store and reorder endpoint for the Lia task board")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// SQLite database file (`:memory:` for a throwaway store)
    #[arg(long, default_value = "lia-tasks.db")]
    pub db_path: PathBuf,

    /// Directory for rotated log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Logger(#[from] rolling_logger::LoggerError),
    #[error(transparent)]
    Domain(#[from] domain::DomainError),
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    rolling_logger::init_logger(&args.log_dir, "lia-tasks")?;

    let conn = init_db(&args.db_path)?;
    let _ = rolling_logger::info(&format!("database ready at {}", args.db_path.display()));

    let app = build_router(AppState::new(TaskRepository::new(conn)));
    let listener = TcpListener::bind(args.bind).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
