#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "server")]
pub mod server;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::AnalyzerConfig;
