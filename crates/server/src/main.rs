// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP server for the Tracer Study Platform.
//!
//! Maps the API layer's operations onto routes and status codes. State is a
//! `SQLite` persistence handle behind a mutex, a mail seam, and a lazily
//! loaded model registry.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod routes;
mod state;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;
use tracer_api::LogMailer;
use tracer_ml::ModelRegistry;
use tracer_persistence::SqlitePersistence;

use crate::state::AppState;

/// Tracer Study Server - HTTP server for the Tracer Study Platform
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory holding the exported model artifacts
    #[arg(short, long, default_value = "models")]
    models_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Tracer Study Server");

    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        mailer: Arc::new(LogMailer),
        models: Arc::new(ModelRegistry::new(&args.models_dir)),
    };

    let app: Router = routes::build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
