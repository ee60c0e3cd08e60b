use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use rate_verifier::config;
use rate_verifier::core::verifier::Verifier;
use rate_verifier::errors::{EXIT_FAILURE, EXIT_OK};
use rate_verifier::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file (ignore if missing).
    let _ = dotenvy::dotenv();

    // Determine config directory, default to `./config`.
    let config_dir = std::env::var("RATE_VERIFIER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    // Env-override notes are emitted while loading, before the file logger exists.
    let loaded = tracing::subscriber::with_default(logging::bootstrap_subscriber(), || {
        config::load_config(&config_dir)
    });
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration from {}: {e:#}", config_dir.display());
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    // Hold the guard for the process lifetime.
    let _guard = match logging::init_tracing(&config.app.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialise logging: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    info!(
        symbol = %config.endpoints.market_api.target_symbol,
        source = ?config.rate_model.source,
        "rate verifier starting"
    );

    let outcome = match Verifier::from_config(&config) {
        Ok(verifier) => verifier.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => {
            println!("{report}");
            info!("all comparisons within tolerance");
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            error!(error = %e, "verification failed");
            ExitCode::from(e.exit_code())
        }
    }
}
