use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;

use watchlog_engine::Engine;
use watchlog_storage::SqliteStore;

mod handlers;
mod http_error;
mod logging;
mod routes;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "watchlog-server")]
#[command(about = "Personal viewing-record tracker with undo/redo", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: SocketAddr,

    /// SQLite database file
    #[arg(long, default_value = "./watchlog.db")]
    db: PathBuf,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Cap the undo history at this many commands (unbounded when unset)
    #[arg(long)]
    undo_depth: Option<usize>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let store = SqliteStore::open(&args.db)
        .with_context(|| format!("open database {}", args.db.display()))?;
    let engine = match args.undo_depth {
        Some(depth) => Engine::with_undo_depth(store, depth),
        None => Engine::new(store),
    };
    info!(db = %args.db.display(), undo_depth = ?args.undo_depth, "opened database");

    let state = Arc::new(AppState {
        engine: Mutex::new(engine),
    });
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("watchlog-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
