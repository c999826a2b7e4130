// PromptGAN - adversarial prompt refinement
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use promptgan::cli::{self, Cli};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli::run(cli).await
}
