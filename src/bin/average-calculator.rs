use anyhow::Result;
use average_calculator::server;
use average_calculator::server::server::AppState;
use average_calculator::utils::config_loader;
use average_calculator::utils::constants::DEFAULT_CONFIG_PATH;
use average_calculator::utils::logging;
use average_calculator::utils::logging::LogLevel;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// overrides settings.server.port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let mut service_config = config_loader::run(&args.config).await?;
    if let Some(port) = args.port {
        service_config.settings.server.port = port;
    }
    logging::run(&service_config, args.log_level)?;
    let settings = service_config.settings;

    // -------------------------------
    // 2. Build token manager, fetcher and window
    // -------------------------------

    let state = AppState::new(&settings).await?;

    // -------------------------------
    // 3. Start http server, initial token fetch runs alongside
    // -------------------------------

    let listener = server::server::bind(&settings).await?;
    info!("Service starting...");
    server::server::start(state, &settings, listener, shutdown_signal()).await?;

    info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
