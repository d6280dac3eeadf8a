//! AutoGLM-GUI API server entry point.

use autoglm_core::config::AppConfig;
use autoglm_core::phone::PhoneAgentFactory;
use autoglm_core::server::{self, ServerState};
use autoglm_core::session::{SessionController, SessionRegistry};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "autoglm-gui",
    version,
    about = "AutoGLM-GUI backend: phone agent REST API and web front end"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the built front end (overrides config)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("Starting AutoGLM-GUI server");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    debug!(
        base_url = config.agent.base_url.as_str(),
        model = config.agent.model_name.as_str(),
        max_steps = config.agent.max_steps,
        "Configuration loaded"
    );

    let addr = config.server.bind_addr()?;

    let factory = Arc::new(PhoneAgentFactory::from_defaults(&config.agent));
    let registry = Arc::new(SessionRegistry::new());
    let controller = SessionController::new(registry, factory);
    let state = Arc::new(ServerState::new(controller, config.agent.clone()));

    info!(addr = %addr, "REST server starting");
    server::serve(state, &config.server, addr).await?;
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = &cli.static_dir {
        config.server.static_dir = dir.clone();
    }
}

fn init_tracing(verbose: bool) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let fallback = if verbose { "debug" } else { "info" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
