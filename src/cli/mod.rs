pub mod export;
pub mod init;
pub mod load;
pub mod report;
pub mod season;
pub mod status;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::loader::SourcePaths;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "offseason",
    about = "Past-season stock and sales reporting for HK/MC/TW inventory extracts."
)]
pub struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source files and fiscal year. Flags override the saved settings.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Prior-year inventory extract (CSV)
    #[arg(long)]
    pub py: Option<String>,
    /// Current-year inventory extract (CSV)
    #[arg(long)]
    pub cy: Option<String>,
    /// Long-range trend extract (CSV, optional)
    #[arg(long)]
    pub graph: Option<String>,
    /// Season target file (CSV, optional)
    #[arg(long)]
    pub target: Option<String>,
    /// Two-digit fiscal year of the CY extract, e.g. 25
    #[arg(long = "fiscal-year", value_parser = clap::value_parser!(i32).range(0..=99))]
    pub fiscal_year: Option<i32>,
}

impl SourceArgs {
    pub fn resolve(&self, settings: &Settings) -> (SourcePaths, i32) {
        let pick = |flag: &Option<String>, saved: &Option<String>| {
            flag.as_ref().or(saved.as_ref()).map(PathBuf::from)
        };
        let paths = SourcePaths {
            prior: pick(&self.py, &settings.prior_year_file),
            current: pick(&self.cy, &settings.current_year_file),
            graph: pick(&self.graph, &settings.graph_file),
            target: pick(&self.target, &settings.target_file),
        };
        (paths, self.fiscal_year.unwrap_or(settings.current_fiscal_year))
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Print the report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save the fiscal year and default source files.
    Init {
        #[command(flatten)]
        sources: SourceArgs,
    },
    /// Show saved settings and whether the source files exist.
    Status,
    /// Load all sources and summarize what was decoded or skipped.
    Load {
        #[command(flatten)]
        sources: SourceArgs,
        /// List every skipped row with its reason.
        #[arg(long)]
        details: bool,
    },
    /// Classify a season code, e.g. 24F.
    Season {
        /// Season code: two-digit year plus F, S or N
        code: String,
        /// Two-digit fiscal year to classify against
        #[arg(long = "fiscal-year", value_parser = clap::value_parser!(i32).range(0..=99))]
        fiscal_year: Option<i32>,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Write normalized rows as CSV or JSON.
    Export {
        #[command(flatten)]
        sources: SourceArgs,
        /// Collection to export: inventory, graph, target
        #[arg(long, default_value = "inventory")]
        kind: String,
        /// Output format: csv, json
        #[arg(long, default_value = "csv")]
        format: String,
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<String>,
        /// Only rows that pass the off-season Fall/Winter filter
        #[arg(long = "off-season")]
        off_season: bool,
    },
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// PY vs CY totals, all rows and off-season only.
    Summary(ReportArgs),
    /// Off-season PY vs CY by years past season.
    Buckets(ReportArgs),
    /// CY off-season by category.
    Categories(ReportArgs),
    /// Off-season trend by period from the graph extract.
    Trend(ReportArgs),
    /// Season targets vs CY actuals.
    Targets(ReportArgs),
}
