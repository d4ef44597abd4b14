//! crxkit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod writer;

use commands::{Cli, CommandError, Commands};
use crxkit_templates::TemplateError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let templates_dir = cli.templates_dir.clone();
    let result = match cli.command {
        Commands::Create(args) => commands::create::execute(args, &templates_dir).await,
        Commands::List(args) => commands::list::execute(args, &templates_dir).await,
        Commands::Info(args) => commands::info::execute(args, &templates_dir).await,
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::CheckTemplates(args) => {
            commands::check_templates::execute(args, &templates_dir).await
        }
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "crxkit_cli=debug,crxkit_templates=debug,crxkit_manifest=debug"
    } else if quiet {
        "error"
    } else {
        "crxkit_cli=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(command_error) = cause.downcast_ref::<CommandError>() {
            return match command_error {
                CommandError::InvalidArgument(_) => ExitCodes::INVALID_ARGS,
                CommandError::ValidationFailed { .. } => ExitCodes::VALIDATION_FAILURE,
                CommandError::TemplateIssues(_) => ExitCodes::TEMPLATE_ERROR,
            };
        }
        if cause.is::<TemplateError>() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_error() {
        let invalid: anyhow::Error = CommandError::InvalidArgument("x".into()).into();
        assert_eq!(categorize_error(&invalid), ExitCodes::INVALID_ARGS);

        let failed: anyhow::Error = CommandError::ValidationFailed {
            file: "manifest.json".into(),
            errors: 2,
        }
        .into();
        assert_eq!(categorize_error(&failed), ExitCodes::VALIDATION_FAILURE);

        let template: Result<(), TemplateError> = Err(TemplateError::NotFound("vue".into()));
        let wrapped = template.context("Failed to render template").unwrap_err();
        assert_eq!(categorize_error(&wrapped), ExitCodes::TEMPLATE_ERROR);

        assert_eq!(
            categorize_error(&anyhow::anyhow!("disk full")),
            ExitCodes::GENERAL_ERROR
        );
    }
}
