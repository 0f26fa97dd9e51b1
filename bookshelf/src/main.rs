use bookshelf::config::Args;
use bookshelf::{Application, Config, telemetry};
use clap::Parser;
use tokio::signal;

/// Resolves once the process is asked to stop. A listener that fails to install never fires.
async fn stop_requested() {
    let interrupt = async {
        match signal::ctrl_c().await {
            Ok(()) => "interrupt",
            Err(e) => {
                eprintln!("bookshelf: cannot listen for Ctrl+C: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                eprintln!("bookshelf: cannot listen for SIGTERM: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let reason = tokio::select! {
        reason = interrupt => reason,
        reason = terminate => reason,
    };
    tracing::info!(reason, "Stopping bookshelf");
}

fn print_validated(config: &Config) {
    println!(
        "Configuration is valid: {} strategy, API at http://{}{}",
        serde_json::to_value(config.persistence.strategy)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default(),
        config.bind_address(),
        config.api.base_path,
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args)?;

    if args.validate {
        print_validated(&config);
        return Ok(());
    }

    telemetry::init_telemetry(config.enable_otel_export)?;
    tracing::debug!(config_file = %args.config, "Loaded configuration");

    let app = Application::new(config).await?;
    app.serve(stop_requested()).await
}
