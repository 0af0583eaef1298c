//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Inspect, query and reorder indented outlines as trees
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file, applied after the global config
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath, env = "RSTREE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Traversal used by `show`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Box-drawing tree
    #[default]
    Tree,
    /// Pre-order, one indented node per line
    Pre,
    /// Post-order, one node per line
    Post,
    /// Breadth-first, one node per line
    Breadth,
    /// Leaves only, left to right
    Leaves,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an outline as a tree or in a traversal order
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Order::Tree)]
        order: Order,

        /// Do not show nodes deeper than this (roots are depth 0)
        #[arg(long, value_name = "N")]
        depth: Option<usize>,
    },

    /// Print node counts and depth of an outline
    Stats {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the path of the first node with the given value
    Path {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        value: String,
    },

    /// Print the subtree at a dotted path (e.g. 0.2.1)
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        path: String,
    },

    /// Print the outline with its roots sorted
    Sort {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Sort every level, not only the roots
        #[arg(long)]
        deep: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented settings template
    Template,
}
