//! Configuration and CLI argument handling

use clap::Parser;

use crate::services::DEFAULT_API_URL;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A focus timer service that records finished sessions to a planner API")]
#[command(version)]
pub struct Config {
    /// Port to bind the control API to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Initial focus duration in minutes
    #[arg(short, long, default_value = "5")]
    pub minutes: u64,

    /// Base URL of the planner API that stores finished sessions
    #[arg(long, env = "FOCUS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token presented to the planner API
    #[arg(long, env = "FOCUS_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
