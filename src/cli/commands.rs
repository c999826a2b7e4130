// Command execution

use anyhow::{Context, Result};
use std::process::ExitCode;

use super::{Cli, Command, RefineArgs};
use crate::config::constants::NO_PROMPT_FOUND;
use crate::config::{load_config_from, Config};
use crate::errors::RefineError;
use crate::logging;
use crate::refinement::{RefinementLoop, RoundRecord};
use crate::server::RefineServer;

/// Load configuration, set up logging and run the chosen command.
///
/// Returns a failure exit code when a refinement finds no prompt; agent
/// and configuration failures come back as `Err`.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config_from(cli.config.as_deref())?;

    logging::init(cli.debug || config.features.debug_logging)?;

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Refine(args) => refine(config, args).await,
    }
}

async fn serve(mut config: Config, bind: Option<String>) -> Result<ExitCode> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
        config.validate()?;
    }

    RefineServer::from_config(&config)?.serve().await?;
    Ok(ExitCode::SUCCESS)
}

async fn refine(mut config: Config, args: RefineArgs) -> Result<ExitCode> {
    if let Some(max_attempts) = args.max_attempts {
        config.refinement.max_attempts = max_attempts;
    }
    if let Some(instruction) = args.initial_instruction {
        config.refinement.initial_instruction = instruction;
    }
    config.validate()?;

    let refinement = RefinementLoop::from_config(&config)?;
    let show_rounds = !args.json;

    let result = refinement
        .run_with(&args.desired_output, |round| {
            if show_rounds {
                print_round(round);
            }
        })
        .await;

    let report = match result {
        Ok(report) => report,
        Err(e @ RefineError::MalformedDecision { .. }) => {
            tracing::warn!("{}", e);
            if args.json {
                println!("{}", serde_json::json!({ "error": NO_PROMPT_FOUND }));
            } else {
                eprintln!("{}", NO_PROMPT_FOUND);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("Refinement run failed"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match report.correct_prompt() {
            Some(prompt) => println!("{}", prompt),
            None => eprintln!("{}", NO_PROMPT_FOUND),
        }
    }

    Ok(if report.correct_prompt().is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_round(round: &RoundRecord) {
    eprintln!("── round {} ──", round.attempt + 1);
    eprintln!("instruction: {}", round.instruction);
    eprintln!("candidate:   {}", round.candidate);
    eprintln!("decision:    {}", round.raw_decision.trim());
    if let Some(coach) = &round.coach_output {
        eprintln!("coach:       {}", coach);
    }
}
