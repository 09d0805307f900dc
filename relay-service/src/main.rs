use clap::Parser;
use relay_service::config::RelayConfig;
use relay_service::startup::Application;
use service_core::observability::init_tracing;

#[derive(Parser)]
#[command(name = "relay-service")]
#[command(about = "Relay tailnet log events to a push notification provider", long_about = None)]
struct Cli {
    /// IP address to listen on
    #[arg(long, env = "POTS_IP")]
    ip: Option<String>,

    /// Port to listen on
    #[arg(long, env = "POTS_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = RelayConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    if let Some(ip) = cli.ip {
        config.common.host = ip;
    }
    if let Some(port) = cli.port {
        config.common.port = port;
    }

    init_tracing(
        "relay-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    let app = Application::build(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start relay service: {}", e))?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
