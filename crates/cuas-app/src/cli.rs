//! CLI argument definitions for the `cuas` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// C-UAS product assistant: ask questions, chat, and summarize reviews.
#[derive(Parser, Debug)]
#[command(name = "cuas", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Knowledge base location (file path or http(s) URL).
    #[arg(short = 'k', long = "knowledge")]
    pub knowledge: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Ask a single question and print the answer.
    Ask {
        /// The question text.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Scope the question to a product (partial names match).
        #[arg(short = 'p', long = "product")]
        product: Option<String>,

        /// Print the reply and its outcome as JSON.
        #[arg(long = "json")]
        json: bool,
    },

    /// Interactive conversation on stdin.
    Chat {
        /// Initial focus product.
        #[arg(short = 'p', long = "product")]
        product: Option<String>,
    },

    /// List the products in the knowledge base.
    Products {
        /// Print the load state and product names as JSON.
        #[arg(long = "json")]
        json: bool,
    },

    /// Summarize operator reviews of a product.
    Summarize {
        /// Product name used in the summary prompt.
        product: String,

        /// JSON file with the product's reviews.
        #[arg(short = 'r', long = "reviews")]
        reviews: PathBuf,

        /// Produce a 2-3 sentence summary instead of the full report.
        #[arg(long = "brief")]
        brief: bool,
    },

    /// Generate free-form review content from a prompt.
    Draft {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Send one test prompt to confirm the backend and API key work.
    Check,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CUAS_CONFIG env var > platform default (~/.cuas/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CUAS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Resolve the knowledge base location.
    ///
    /// Priority: --knowledge flag > config file value.
    pub fn resolve_knowledge(&self, config_source: &str) -> String {
        self.knowledge
            .clone()
            .unwrap_or_else(|| config_source.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".cuas").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".cuas").join("config.toml");
    }
    PathBuf::from("config.toml")
}
