mod app;
mod command;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pulse_core::{BackendClient, NewsClient, PulseConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::app::PulseApp;

#[derive(Parser)]
#[command(name = "newspulse", about = "Terminal news client", version)]
struct Cli {
    /// Config file path (defaults to <config dir>/newspulse/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = match PulseConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let clients = BackendClient::new(config.backend.clone())
        .and_then(|backend| Ok((backend, NewsClient::new(config.news.clone())?)));
    let (backend, news) = match clients {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "failed to build HTTP clients");
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let mut app = PulseApp::new(backend, news);
    match app.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terminal input failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
