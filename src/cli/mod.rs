//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{command, Parser, Subcommand};
use indicatif::ProgressBar;
use supram::{aggregate::Granularity, export::Format};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root URL of the remote database
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Read from a local mirror of the database instead of HTTP
    #[arg(long, global = true)]
    pub local: Option<PathBuf>,

    /// Directory exported files are saved to
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List variable labels
    Variables {},
    /// List datasets of a variable
    Datasets {
        #[arg(long)]
        variable: String,
        #[arg(long, value_enum, default_value_t = Granularity::Monthly)]
        granularity: Granularity,
    },
    /// Describe the databases on offer
    Descriptions {},
    /// List land cover datasets, or the classes of one dataset
    Classes {
        #[arg(long)]
        dataset: Option<String>,
    },
    /// Aggregate the series of a region and save them
    Series {
        #[arg(long)]
        region: String,
        #[arg(long)]
        variable: String,
        #[arg(long, value_enum, default_value_t = Granularity::Monthly)]
        granularity: Granularity,
        /// Dataset to include; repeat for several
        #[arg(long = "dataset")]
        datasets: Vec<String>,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Compose the land cover of a region and save it
    LandCover {
        #[arg(long)]
        region: String,
        #[arg(long)]
        dataset: String,
        /// Classes below this percentage are grouped as "Other"
        #[arg(long, default_value_t = 1.0)]
        threshold: f64,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Print the region values of a variable map
    Map {
        #[arg(long)]
        variable: String,
        #[arg(long)]
        dataset: String,
    },
    /// Print the region percentages of one land cover class
    LandCoverMap {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        class: String,
    },
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

// -- Tests -------------------------------------------------------------------
