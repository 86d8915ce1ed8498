use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use duplo_drive_runtime::config::RuntimeConfig;

/// Control runtime for the two-wheel Duplo rover
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; built-in defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the control loop frequency
    #[arg(long)]
    loop_hz: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match RuntimeConfig::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    if let Some(hz) = args.loop_hz {
        config.loop_hz = hz;
        if let Err(e) = config.validate() {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = duplo_drive_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
