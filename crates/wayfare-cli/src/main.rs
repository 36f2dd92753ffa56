mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, content, countries, image, phone, Context};
use crate::error::{exit_code_for, report_error};
use wayfare_config as config;

#[derive(Debug, Parser)]
#[command(name = "wayfare", version, about = "wayfare CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse, format and validate phone numbers
    #[command(subcommand)]
    Phone(phone::PhoneCommand),
    /// List known dial codes
    Countries(countries::CountriesArgs),
    /// Rewrite CDN image URLs
    #[command(subcommand)]
    Image(image::ImageCommand),
    /// Split blog HTML into text and image blocks
    #[command(subcommand)]
    Content(content::ContentCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let optimizer = app_config.image_optimizer();
    let ctx = Context {
        json,
        config: &app_config,
        optimizer: &optimizer,
    };

    match command {
        Command::Phone(cmd) => match cmd {
            phone::PhoneCommand::Parse(args) => phone::parse_phone(&ctx, args),
            phone::PhoneCommand::Format(args) => phone::format_phone(&ctx, args),
            phone::PhoneCommand::Validate(args) => phone::validate_phone(&ctx, args),
        },
        Command::Countries(args) => countries::list_countries(&ctx, args),
        Command::Image(cmd) => match cmd {
            image::ImageCommand::Optimize(args) => image::optimize(&ctx, args),
            image::ImageCommand::Preset(args) => image::preset(&ctx, args),
        },
        Command::Content(cmd) => match cmd {
            content::ContentCommand::Split(args) => content::split(&ctx, args),
        },
        Command::Completions(_) => {
            unreachable!("completions command handled before config load")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
