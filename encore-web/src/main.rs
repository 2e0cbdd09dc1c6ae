//! encore-web - Venue/artist/show booking directory server
//!
//! Serves the JSON API and the static UI shell over one port, backed by a
//! single SQLite database. Stateless beyond the pool and the form secret,
//! so multiple worker processes can share one database file.

use anyhow::Result;
use clap::Parser;
use encore_common::config::resolve_database_path;
use encore_common::db;
use encore_web::{build_router, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "encore-web", version, about = "Encore booking directory server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "ENCORE_PORT", default_value_t = 5730)]
    port: u16,

    /// Database file path (falls back to ENCORE_DB, then ./encore.db)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Encore (encore-web) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let db_path = resolve_database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let pool = db::init_database(&db_path).await?;

    let form_secret = db::settings::load_form_secret(&pool).await?;
    info!("Form secret loaded");

    let state = AppState::new(pool, form_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("encore-web listening on http://127.0.0.1:{}", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
