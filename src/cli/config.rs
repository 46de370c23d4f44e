use std::collections::HashMap;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::date::resolver::DEFAULT_DATE_FORMAT;
use crate::schema::tree_model::{ControlKind, TypeMap};

pub const DEFAULT_CONFIG_PATH: &str = "screen-schema.yaml";
pub const DEFAULT_BRIDGE_PROGRAM: &str = "screen-bridge";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "screen-schema",
    version,
    about = "Discover screen fields by label and fill them in by name"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: screen-schema.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Bridge program that connects to the host session
    #[arg(long, global = true)]
    pub bridge: Option<String>,

    /// Date format for date fields (strftime syntax)
    #[arg(long, global = true)]
    pub date_format: Option<String>,

    /// Append every control write to this JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a transaction and print the fields of its screen
    Discover {
        /// Transaction code
        #[arg(long)]
        transaction: String,

        /// Window to read
        #[arg(long, default_value_t = 0)]
        window: usize,

        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,

        /// Leave the transaction open afterwards
        #[arg(long)]
        keep_open: bool,
    },

    /// Run job files
    Run {
        /// Path to a job YAML file or a directory of YAML files
        #[arg(long)]
        job: String,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `screen-schema.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub trace: Option<String>,

    /// Extra or overriding raw type code to control kind entries
    #[serde(default)]
    pub type_map: HashMap<String, ControlKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            bridge: BridgeConfig::default(),
            trace: None,
            type_map: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    pub program: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Settings (merge CLI args with config file)
// ============================================================================

/// Effective settings: CLI > config file > defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bridge_program: String,
    pub bridge_args: Vec<String>,
    pub date_format: String,
    pub trace: Option<String>,
    pub type_map: TypeMap,
}

pub fn resolve_settings(cli: &Cli, config: &AppConfig) -> Settings {
    Settings {
        bridge_program: cli
            .bridge
            .clone()
            .or_else(|| config.bridge.program.clone())
            .unwrap_or_else(|| DEFAULT_BRIDGE_PROGRAM.to_string()),
        bridge_args: config.bridge.args.clone(),
        date_format: cli
            .date_format
            .clone()
            .unwrap_or_else(|| config.date_format.clone()),
        trace: cli.trace.clone().or_else(|| config.trace.clone()),
        type_map: TypeMap::with_overrides(&config.type_map),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
