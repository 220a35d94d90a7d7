//! Root CLI structure for the avatar tool

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "avatar")]
#[command(about = "Inspect avatar rigs and preview procedural gestures", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect rig bones and the joints gestures will drive
    Rig {
        #[command(subcommand)]
        command: crate::commands::rig::RigCommands,
    },

    /// Gesture presets and headless playback
    Gesture {
        #[command(subcommand)]
        command: crate::commands::gesture::GestureCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
