//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::recording::{Quality, VideoFormat};

/// Saved path commands.
#[derive(Debug, Subcommand)]
pub enum PathCommand {
    /// Show distance, flight time and framing for a saved path
    Info {
        /// Path JSON file
        file: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Write a copy of a path that flies the waypoints in reverse
    Reverse {
        /// Path JSON file
        file: PathBuf,

        /// Where to write the reversed path (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Record command arguments.
#[derive(Debug, Args)]
pub struct RecordCommand {
    /// Record from the demo feed instead of the camera
    #[arg(long)]
    pub demo: bool,

    /// Container format (mp4, avi, mov, webm)
    #[arg(short, long)]
    pub format: Option<VideoFormat>,

    /// Quality tier (ultra, high, medium, low)
    #[arg(short = 'Q', long)]
    pub quality: Option<Quality>,

    /// Directory to export the recording into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_command_debug() {
        let cmd = PathCommand::Info {
            file: PathBuf::from("survey.json"),
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Info"));
        assert!(debug_str.contains("survey.json"));
    }

    #[test]
    fn test_record_command_debug() {
        let cmd = RecordCommand {
            demo: true,
            format: Some(VideoFormat::Webm),
            quality: None,
            output: None,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("demo"));
        assert!(debug_str.contains("Webm"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
