use crate::config::toml_config::{AnalyzerConfig, DEFAULT_HOST, DEFAULT_PORT};
use clap::Parser;

pub const HOST_ENV: &str = "EDHREC_HOST";
pub const PORT_ENV: &str = "EDHREC_PORT";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "edhrec-server",
    about = "HTTP API for the EDHREC deck analyzer",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct ServerArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

impl BindConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Flag, then environment, then settings file, then `0.0.0.0:8000`.
pub fn resolve_bind_config(args: &ServerArgs, settings: &AnalyzerConfig) -> BindConfig {
    resolve_with_env(
        args,
        settings,
        std::env::var(HOST_ENV).ok(),
        std::env::var(PORT_ENV).ok(),
    )
}

fn resolve_with_env(
    args: &ServerArgs,
    settings: &AnalyzerConfig,
    env_host: Option<String>,
    env_port: Option<String>,
) -> BindConfig {
    let fallback_host = settings
        .server
        .host
        .clone()
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let fallback_port = settings.server.port.unwrap_or(DEFAULT_PORT);

    let host = args.host.clone().unwrap_or_else(|| match env_host {
        Some(raw) => {
            let host = raw.trim();
            if host.is_empty() {
                tracing::warn!("Empty {}, falling back to {}", HOST_ENV, fallback_host);
                fallback_host.clone()
            } else {
                host.to_string()
            }
        }
        None => fallback_host.clone(),
    });

    let port = args.port.unwrap_or_else(|| match env_port {
        Some(raw) => match raw.trim().parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    "Invalid {}='{}', falling back to {}",
                    PORT_ENV,
                    raw,
                    fallback_port
                );
                fallback_port
            }
        },
        None => fallback_port,
    });

    BindConfig { host, port }
}
