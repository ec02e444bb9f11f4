// Ambulance WL - Ambulance waiting list service
// Copyright (c) 2025 Ambulance WL Contributors
// Licensed under the MIT License

use ambulance_wl::cli::{Cli, Commands};
use ambulance_wl::config::{load_config_or_default, AmbulanceConfig, LoggingConfig};
use ambulance_wl::domain::Result as AmbulanceResult;
use ambulance_wl::logging::{bootstrap_subscriber, init_logging};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Override warnings are emitted while loading, before the configured
    // subscriber exists
    let bootstrap_level = cli.log_level.as_deref().unwrap_or("info");
    let bootstrap = match bootstrap_subscriber(bootstrap_level, std::io::stderr) {
        Ok(subscriber) => subscriber,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    // The file is optional for serve; validate-config reports its own errors
    let loaded = tracing::subscriber::with_default(bootstrap, || {
        load_config_or_default(&cli.config)
    });

    let (config_level, logging_config) = match &loaded {
        Ok(config) => (config.application.log_level.clone(), config.logging.clone()),
        Err(_) => ("info".to_string(), LoggingConfig::default()),
    };
    let log_level = cli.log_level.clone().unwrap_or(config_level);

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Ambulance waiting list service"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(listen_for_shutdown(shutdown.clone()));

    let exit_code = match execute_command(&cli, loaded, shutdown).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(logging_guard);
    process::exit(exit_code);
}

/// Cancels `shutdown` on SIGINT or SIGTERM
async fn listen_for_shutdown(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.cancel();
                }
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown...");
            }
        }
        shutdown.cancel();
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        } else {
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            shutdown.cancel();
        }
    }
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: AmbulanceResult<AmbulanceConfig>,
    shutdown: CancellationToken,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Serve(args) => match loaded {
            Ok(config) => args.execute(config, shutdown).await,
            Err(e) => {
                tracing::error!(error = %e, "Invalid configuration");
                eprintln!("Error: {e}");
                Ok(2)
            }
        },
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
