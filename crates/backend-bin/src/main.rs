// ============================
// crates/backend-bin/src/main.rs
// ============================
//! `passgate` server binary.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use passgate_backend_lib::{
    account::Account,
    config::{LogFormat, Settings},
    router,
    schema::Resource,
    AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Password registration and login server
#[derive(Debug, Parser)]
#[command(name = "passgate", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ./passgate.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    // Fail at startup rather than on every request
    Account::schema().validate_fields(&settings.fields.username, &settings.fields.password)?;

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::<Account>::from_settings(settings)?);
    let _cleanup = state.sessions.spawn_cleanup();

    let app = router::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
