//! CLI argument parsing using clap derive

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// autovars - Resolve inventory variables from group_vars directory chains
#[derive(Parser, Debug)]
#[command(name = "autovars")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub resolver: ResolverArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ResolverArgs {
    /// Directory the upward walk never leaves (defaults to the current directory)
    #[arg(long, global = true, env = "AUTOVARS_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Directory name that stops the upward walk
    #[arg(long, global = true, default_value = "inventories")]
    pub boundary: String,

    /// Subdirectory scanned at every level
    #[arg(long, global = true, default_value = "group_vars")]
    pub group_vars_dir: String,

    /// Group that receives the merged variables
    #[arg(long, global = true, default_value = "all")]
    pub target_group: String,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the whole inventory with resolved variables
    ///
    /// Examples:
    ///   autovars list inventories/acme/shop/prod/inventory.yaml
    ///   autovars list inventories/acme/shop/prod/inventory.yaml --yaml
    List {
        /// Path to inventory.yaml
        inventory: PathBuf,

        /// Output YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Print the effective variables of one host
    Host {
        /// Path to inventory.yaml
        inventory: PathBuf,

        /// Host name
        host: String,
    },

    /// Print the group tree
    Graph {
        /// Path to inventory.yaml
        inventory: PathBuf,
    },

    /// Show which directories and files contributed, and why
    Explain {
        /// Path to inventory.yaml
        inventory: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
