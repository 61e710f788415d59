use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use dots_client::ClientConfig;
use dots_client::config::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

mod client;
mod tui;

#[derive(Parser)]
#[command(name = "dots")]
#[command(about = "Connect to a Dots game server", long_about = None)]
struct Cli {
    /// Server host name or address
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Login id announced to the server
    #[arg(short, long, required_unless_present = "config")]
    login: Option<String>,

    /// Seconds to wait for the connection to open
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    /// Read host, port and login from a JSON file instead of the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File receiving the client log (filter with RUST_LOG)
    #[arg(long, default_value = "dots-client.log")]
    log_file: PathBuf,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)?;
            return Ok(ClientConfig::from_json(&text)?);
        }
        let login = self.login.clone().unwrap_or_default();
        Ok(ClientConfig::new(self.host.clone(), self.port, login)
            .with_connect_timeout_secs(self.connect_timeout_secs))
    }
}

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Cannot open log file {}: {}", cli.log_file.display(), e);
    }

    let config = match cli.client_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    println!(
        "Connecting to {}:{} as '{}'...",
        config.host, config.port, config.login_id
    );

    if let Err(e) = client::start_client(config).await {
        eprintln!("Error: {}", e);
    }
}
