//! CLI argument definitions for droidplan.
//!
//! Each command corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "droidplan",
    version,
    about = "Resolve an Android module descriptor into an ordered build plan",
    long_about = "droidplan reads a declarative Droidplan.toml (plugins, SDK levels, \
                  compatibility settings, dependencies and platform imports), resolves one \
                  version per dependency, validates the module and emits the build plan \
                  for an external execution engine."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the descriptor
    #[arg(short, long, global = true, default_value = droidplan_core::DESCRIPTOR_FILE)]
    pub manifest: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where pipeline inputs come from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Platform catalog file (repeatable)
    #[arg(long = "platform", value_name = "FILE")]
    pub platforms: Vec<PathBuf>,

    /// Property file for `${name}` references
    #[arg(long, value_name = "FILE")]
    pub properties: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the descriptor and print the build plan
    Plan {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output format
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Validate the descriptor without emitting a plan
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Print the dependency tree
    Tree {
        #[command(flatten)]
        inputs: InputArgs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Show everything that requires a dependency
        #[arg(long)]
        why: Option<String>,
        /// Show version overrides
        #[arg(long)]
        conflicts: bool,
    },

    /// Add a dependency to the descriptor
    Add {
        /// Dependency coordinate (group:artifact[:version])
        coordinate: String,
        /// Gradle configuration, e.g. implementation, kapt, testImplementation
        #[arg(short, long)]
        scope: Option<String>,
        /// Add as a platform (bill-of-materials) import
        #[arg(long)]
        platform: bool,
        /// Dependency that must be resolved first (repeatable)
        #[arg(long, value_name = "KEY")]
        requires: Vec<String>,
    },

    /// Create a Droidplan.toml in the current directory
    Init {
        /// Android namespace, e.g. com.example.app
        #[arg(long)]
        namespace: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
