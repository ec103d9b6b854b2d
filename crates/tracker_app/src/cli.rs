use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "job_tracker")]
#[command(about = "Track job postings into a Google Sheets spreadsheet", version)]
pub struct Cli {
    /// Path to the RON configuration file
    #[arg(short, long, default_value = "./job_tracker.ron")]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect, scrape and save the job posting at URL
    Track {
        url: String,
        /// Read the page markup from a saved file instead of fetching URL
        #[arg(long)]
        html: Option<PathBuf>,
        /// Exit as soon as the save reply arrives instead of waiting for the control reset
        #[arg(long)]
        no_wait: bool,
    },
    /// Show or change the stored spreadsheet
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Check that the spreadsheet is reachable with the current credentials
    Test {
        #[arg(long)]
        sheet_id: Option<String>,
    },
    /// Answer JSON requests, one per line, on stdin/stdout
    Serve,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the stored spreadsheet id
    Show,
    /// Validate and store a spreadsheet id
    Set { sheet_id: String },
    /// Store the id found in a spreadsheet URL
    FromUrl { url: String },
    /// Test the given id, or the stored one
    Test { sheet_id: Option<String> },
    /// Explain where to find the spreadsheet id
    Help,
}
