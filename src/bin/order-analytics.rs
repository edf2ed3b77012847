//! order-analytics CLI - consumption and price analytics over an order history
//!
//! ## Example Usage
//!
//! ```bash
//! # Write <orders.json>.analysis.csv with every item
//! order-analytics batch orders.json
//!
//! # Only orders placed after a given moment
//! order-analytics batch orders.json --after "2024-01-01 00:00"
//!
//! # Pick one item from the grouped list
//! order-analytics select orders.json
//! order-analytics select orders.json --item 3
//!
//! # Show the grouped list only
//! order-analytics list orders.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use order_analytics::analysis::{
    run_analysis, AnalysisConfig, RunMode, RunOutcome, DEFAULT_OUTPUT_SUFFIX, DEFAULT_PRICE_PRECISION,
};
use order_analytics::error::{AnalyticsError, Result as AnalyticsResult};
use order_analytics::types::parse_timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

/// order-analytics: per-item consumption and price-change analytics
#[derive(Parser)]
#[command(name = "order-analytics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Per-item consumption and price-change analytics over an order history", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate every item into a CSV table
    Batch {
        /// Order history JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Only use orders strictly after this moment (YYYY-MM-DD HH:MM)
        #[arg(short = 'a', long)]
        after: Option<String>,

        /// Output CSV path (default: <INPUT>.analysis.csv)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Summarize a single item chosen from the grouped list
    Select {
        /// Order history JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Only use orders strictly after this moment (YYYY-MM-DD HH:MM)
        #[arg(short = 'a', long)]
        after: Option<String>,

        /// Item number from the list (prompts when omitted)
        #[arg(short = 'i', long)]
        item: Option<usize>,
    },

    /// Print the grouped item list
    List {
        /// Order history JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Only use orders strictly after this moment (YYYY-MM-DD HH:MM)
        #[arg(short = 'a', long)]
        after: Option<String>,
    },
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Config {
    /// Default threshold when --after is not given
    #[serde(default)]
    after: Option<String>,
    #[serde(default = "default_output_suffix")]
    output_suffix: String,
    #[serde(default = "default_price_precision")]
    price_precision: usize,
}

fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.to_string()
}

fn default_price_precision() -> usize {
    DEFAULT_PRICE_PRECISION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            after: None,
            output_suffix: default_output_suffix(),
            price_precision: default_price_precision(),
        }
    }
}

impl Config {
    fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".order-analytics").join("config.toml"))
    }

    /// Read an explicitly requested config file; any failure is an error
    fn read(path: &Path) -> AnalyticsResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnalyticsError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents).map_err(|e| {
            AnalyticsError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load `--config` strictly, or the default location leniently
    fn load(path: Option<&Path>) -> AnalyticsResult<Self> {
        if let Some(config_path) = path {
            return Self::read(config_path);
        }

        let Some(default_config) = Self::default_path().filter(|p| p.exists()) else {
            return Ok(Config::default());
        };
        match Self::read(&default_config) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!("{} {}", "Warning:".yellow(), e);
                Ok(Config::default())
            }
        }
    }
}

impl Cli {
    /// Merge flags over config values into a pipeline configuration
    fn analysis_config(self, config: &Config) -> Result<AnalysisConfig> {
        let (input, after, mode) = match self.command {
            Commands::Batch { input, after, output } => (input, after, RunMode::Batch { output }),
            Commands::Select { input, after, item } => (input, after, RunMode::Select { item }),
            Commands::List { input, after } => (input, after, RunMode::List),
        };

        let after = match after.or_else(|| config.after.clone()) {
            Some(raw) => Some(parse_timestamp(&raw).context("Invalid --after threshold")?),
            None => None,
        };

        let mut analysis = AnalysisConfig::new(input, mode).with_after(after);
        analysis.output_suffix = config.output_suffix.clone();
        analysis.price_precision = config.price_precision;
        Ok(analysis)
    }
}

fn run(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;
    let config = Config::load(cli.config.as_deref())?;
    let analysis = cli.analysis_config(&config)?;

    if verbose {
        println!(
            "{} v{}",
            "order-analytics".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("  {} {}", "Input:".bold(), analysis.input.display());
        if let Some(after) = analysis.after {
            println!("  {} {}", "After:".bold(), after);
        }
        println!();
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let outcome = run_analysis(&analysis, &mut input, &mut output)
        .with_context(|| format!("Failed to analyze {}", analysis.input.display()))?;

    match outcome {
        RunOutcome::CsvWritten { path, rows } => {
            println!(
                "{} Wrote {} items to: {}",
                "✓".green().bold(),
                rows,
                path.display()
            );
        }
        RunOutcome::Summarized(_) | RunOutcome::Listed(_) => {}
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
