//! CLI module for Libretto.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Libretto - Professional Book Analysis
///
/// Generate an executive-grade digest of any book: structured analysis with
/// grounded citations, a derived concept-art illustration, and an optional
/// narrated audio brief.
#[derive(Parser, Debug)]
#[command(name = "libretto")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Libretto and write a default configuration file
    Init,

    /// Generate a professional analysis of a book
    Analyze {
        /// Book title
        title: String,

        /// Author name
        author: String,

        /// Save the generated illustration as a PNG file
        #[arg(long)]
        image_out: Option<String>,

        /// Also synthesize a narrated audio brief
        #[arg(long)]
        narrate: bool,

        /// Where to save the narrated brief (WAV). Implies --narrate
        #[arg(long)]
        audio_out: Option<String>,

        /// Print the raw outcome as JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Narrate arbitrary text through the speech stage
    Narrate {
        /// Text to narrate (reads stdin if omitted)
        text: Option<String>,

        /// Output WAV file
        #[arg(short, long, default_value = "narration.wav")]
        output: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
