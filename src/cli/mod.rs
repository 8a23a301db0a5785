//! CLI module for Klipp.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Klipp - AI-powered video clipping
///
/// Cuts captioned short clips out of videos. The name "Klipp" comes from
/// the Norwegian/Scandinavian word for "cut."
#[derive(Parser, Debug)]
#[command(name = "klipp")]
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
    /// Cut captioned clips out of a video
    Clip {
        /// YouTube URL/ID, or local video file path
        input: String,

        /// OpenAI API key (falls back to the OPENAI_API_KEY environment variable)
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// What to look for, e.g. "the funniest exchanges"
        #[arg(short, long)]
        prompt: Option<String>,

        /// LLM model used to pick clips
        #[arg(short, long)]
        model: Option<String>,

        /// Minimum number of clips to request
        #[arg(long)]
        min_clips: Option<u32>,

        /// Maximum number of clips to request
        #[arg(long)]
        max_clips: Option<u32>,

        /// Longest acceptable clip duration in seconds
        #[arg(long)]
        max_clip_seconds: Option<f64>,

        /// Directory where finished clips are written
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

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

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
