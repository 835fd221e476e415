use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "layout-orchestrator")]
#[command(about = "Arrange three apps into a split freeform layout on an adb-connected tablet")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: CliCommand,

    /// adb device serial (defaults to the layout file, then adb's own choice)
    #[arg(long, global = true)]
    pub serial: Option<String>,

    /// Path to the adb executable
    #[arg(long, global = true)]
    pub adb: Option<String>,

    /// Per-command timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Launch and arrange the three apps of a layout
    Apply {
        /// Layout file (TOML); the built-in default layout is used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the top pane's share of the usable height
        #[arg(long)]
        split_ratio: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Only push the freeform window settings to the device
    EnableFlags,

    /// Print the computed pane bounds without touching a device
    Bounds {
        #[arg(long)]
        width: i32,

        #[arg(long)]
        height: i32,

        #[arg(long, default_value = "160")]
        density: u32,

        #[arg(long, default_value = "generic")]
        manufacturer: String,

        #[arg(long, default_value = "")]
        model: String,

        #[arg(long, default_value = "0.33")]
        split_ratio: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout_ms {
            validation::validate_range("--timeout-ms", timeout, 100, 600_000)?;
        }
        if let Some(adb) = &self.adb {
            validation::validate_non_empty_string("--adb", adb)?;
        }
        match &self.command {
            CliCommand::Apply {
                split_ratio: Some(ratio),
                ..
            } => validation::validate_open_range("--split-ratio", *ratio, 0.0, 1.0)?,
            CliCommand::Bounds {
                width,
                height,
                density,
                split_ratio,
                ..
            } => {
                validation::validate_range("--width", *width, 1, 100_000)?;
                validation::validate_range("--height", *height, 1, 100_000)?;
                validation::validate_range("--density", *density, 1, 2_000)?;
                validation::validate_open_range("--split-ratio", *split_ratio, 0.0, 1.0)?;
            }
            _ => {}
        }
        Ok(())
    }
}
