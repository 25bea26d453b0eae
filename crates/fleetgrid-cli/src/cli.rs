//! CLI definition using clap

use clap::{Parser, Subcommand};
use fleetgrid_types::{Layer, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleetgrid")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Client of the vehicle scheduling board server")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides FLEETGRID_SERVER and the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Output format (json, table)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show uploaded dataset: dates, filter columns and their values
    Meta,

    /// Show the board for a day
    Schedule {
        /// Day (YYYY-MM-DD). Defaults to the first available date.
        #[arg(long, short = 'd')]
        day: Option<String>,

        /// Restrict a column, e.g. --filter "Статус=В работе" (repeatable)
        #[arg(long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,
    },

    /// Set or clear one schedule/fact cell
    Mark {
        #[arg(long, short = 'd')]
        day: String,

        /// Vehicle license plate
        #[arg(long, short = 'p')]
        plate: String,

        /// Layer (schedule, fact)
        #[arg(long, short = 'k')]
        kind: Layer,

        /// Slot label, e.g. 08:30
        #[arg(long, short = 's')]
        slot: String,

        /// 1 = filled, 0 = empty
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
        value: u8,
    },

    /// Upload a source workbook (.xlsx)
    Upload {
        /// Path to the workbook
        file: PathBuf,
    },

    /// Download the export of a day
    Export {
        #[arg(long, short = 'd')]
        day: String,

        /// Restrict a column (repeatable)
        #[arg(long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Output file path
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Show or change the board palette
    Palette {
        #[command(subcommand)]
        action: Option<PaletteAction>,
    },

    /// Manage the vehicle directory
    Directory {
        #[command(subcommand)]
        action: Option<DirectoryAction>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set server base URL
        #[arg(long)]
        set_server: Option<String>,

        /// Set request timeout in seconds (0 = no timeout)
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Set preference directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set the visible-filter sanity threshold
        #[arg(long)]
        set_filter_threshold: Option<usize>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum PaletteAction {
    /// Show the stored palette
    Get,

    /// Change one or more colors (hex, e.g. #55b4c7 or 2563eb)
    Set {
        #[arg(long)]
        accent: Option<String>,

        #[arg(long)]
        schedule_fill: Option<String>,

        #[arg(long)]
        plan_fill: Option<String>,

        #[arg(long)]
        fact_fill: Option<String>,

        #[arg(long)]
        border: Option<String>,
    },

    /// Restore the default palette
    Reset,
}

#[derive(Subcommand)]
pub enum DirectoryAction {
    /// List directory rows
    List,

    /// Add or update a row
    Upsert {
        /// Vehicle license plate
        plate: String,

        /// Work pattern, e.g. "5/2 8 часов"
        #[arg(long, default_value = "")]
        schedule: String,

        /// Regime start, e.g. 07:00
        #[arg(long, default_value = "")]
        start: String,

        /// Regime end, e.g. 18:00
        #[arg(long, default_value = "")]
        end: String,
    },

    /// Delete a row by plate
    Delete {
        plate: String,
    },
}
