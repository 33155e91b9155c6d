use clap::Parser;
use pdfindi::{Application, Config, config::VendorMode, telemetry};

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before the vendor client builds its TLS config
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let args = pdfindi::config::Args::parse();

    // Refuses to start without an API key in cloudmersive mode
    let config = Config::load(&args)?;

    if args.validate {
        println!(
            "Configuration is valid: {:?} vendor at {}, listening on {}.",
            config.vendor.mode,
            config.vendor.base_url,
            config.bind_address()
        );
        return Ok(());
    }

    telemetry::init_telemetry(config.enable_otel_export)?;

    tracing::debug!("{:?}", args);
    tracing::info!(
        environment = %config.environment,
        api_key_configured = config.vendor.api_key.is_some(),
        "Starting PDFINDI backend"
    );
    match config.vendor.mode {
        VendorMode::Cloudmersive => tracing::info!(vendor_url = %config.vendor.base_url, "Forwarding conversions to Cloudmersive"),
        VendorMode::Mock => tracing::warn!("Mock vendor enabled: conversions return canned documents"),
    }

    let shutdown = shutdown_signal();
    Application::new(config)?.serve(shutdown).await
}
