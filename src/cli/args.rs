//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

/// Inspect multicast path trees of time-sensitive network flows
#[derive(Parser, Debug)]
#[command(name = "flowtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d for info, -dd for debug, -ddd for trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render each flow's path tree
    Tree {
        /// Flows file
        #[arg(value_hint = ValueHint::FilePath)]
        flows_file: PathBuf,
    },

    /// Print each flow's leaf devices in pre-order
    Leaves {
        /// Flows file
        #[arg(value_hint = ValueHint::FilePath)]
        flows_file: PathBuf,
    },

    /// Print each flow's source-to-destination device sequences
    Routes {
        /// Flows file
        #[arg(value_hint = ValueHint::FilePath)]
        flows_file: PathBuf,
    },

    /// Print node count, depth and leaf count per flow
    Info {
        /// Flows file
        #[arg(value_hint = ValueHint::FilePath)]
        flows_file: PathBuf,
    },
}
