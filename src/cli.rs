//! Command-line argument parsing for crm-joins.
//!
//! Uses clap to parse CLI arguments.

use crm_joins::config::{Config, DisplayConfig, StoreConfig};
use crm_joins::error::Result;
use crm_joins::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Worked SQL join lessons against a sample CRM database.
#[derive(Parser, Debug)]
#[command(name = "crm-joins")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file or connection string (e.g., sqlite:data.sqlite)
    #[arg(value_name = "DATABASE")]
    pub database: Option<String>,

    /// Use named connection from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "CRM_JOINS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use a private copy of the bundled sample CRM database
    #[arg(long, conflicts_with_all = ["database", "seed"])]
    pub sample: bool,

    /// Build a private read-only database from a SQL seed file
    #[arg(long, value_name = "PATH", conflicts_with = "database")]
    pub seed: Option<PathBuf>,

    /// List the lesson steps and exit
    #[arg(long)]
    pub list: bool,

    /// Print the database schema instead of running the lesson
    #[arg(long, conflicts_with_all = ["query", "step"])]
    pub schema: bool,

    /// Run only this lesson step (repeatable)
    #[arg(short = 's', long = "step", value_name = "STEP")]
    pub step: Vec<String>,

    /// Run an ad-hoc SQL query instead of the lesson (repeatable)
    #[arg(short = 'q', long = "query", value_name = "SQL", conflicts_with = "step")]
    pub query: Vec<String>,

    /// Number of rows to show per result
    #[arg(short = 'n', long, value_name = "ROWS")]
    pub rows: Option<usize>,

    /// Maximum rendered column width
    #[arg(long, value_name = "WIDTH")]
    pub max_width: Option<usize>,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub output: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Converts the positional DATABASE argument to a StoreConfig.
    pub fn to_store_config(&self) -> Result<Option<StoreConfig>> {
        self.database
            .as_deref()
            .map(StoreConfig::from_connection_string)
            .transpose()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the named connection to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    /// Parses the output format, falling back to the configured one.
    pub fn parse_output_format(
        &self,
        configured: OutputFormat,
    ) -> std::result::Result<OutputFormat, String> {
        match &self.output {
            Some(output) => output.parse(),
            None => Ok(configured),
        }
    }

    /// Applies --rows and --max-width over the configured display settings.
    pub fn apply_display_overrides(&self, display: &mut DisplayConfig) {
        if let Some(rows) = self.rows {
            display.preview_rows = rows;
        }
        if let Some(width) = self.max_width {
            display.max_column_width = width;
        }
    }
}
