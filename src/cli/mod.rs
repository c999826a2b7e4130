// CLI module
// Argument parsing for the `promptgan` binary

mod commands;

pub use commands::run;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find an instruction that makes a language model produce a desired output.
#[derive(Debug, Parser)]
#[command(name = "promptgan", version, about)]
pub struct Cli {
    /// Config file (default: ~/.promptgan/config.toml)
    #[arg(long, global = true, env = "PROMPTGAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP refinement server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one refinement and print the result
    Refine(RefineArgs),
}

#[derive(Debug, Args)]
pub struct RefineArgs {
    /// The output the generator should produce
    pub desired_output: String,

    /// Rounds allowed before giving up
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Instruction for the first round
    #[arg(long)]
    pub initial_instruction: Option<String>,

    /// Print the full run report as JSON
    #[arg(long)]
    pub json: bool,
}
