//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::expansion_cmd::{self, ExpansionCommands};
use super::logging;
use super::output::{Output, OutputFormat};
use super::resolve_cmd;
use super::session::{Session, SessionOptions};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "papi")]
#[command(author, version, about = "Resolve %identifier_params% placeholder tags")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory of expansion binaries to load
    #[arg(long, global = true, env = "PAPI_EXPANSION_DIR")]
    pub expansion_dir: Option<PathBuf>,

    /// Do not register the built-in expansions
    #[arg(long, global = true)]
    pub no_builtins: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a .papi directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Resolve placeholder tags in text
    Resolve {
        /// Text to resolve (read from stdin when omitted)
        text: Option<String>,

        /// Caller id passed to context-bound expansions
        #[arg(long, short = 'c')]
        context: Option<String>,

        /// Context attribute as KEY=VALUE (repeatable, needs --context)
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = resolve_cmd::parse_attribute)]
        attributes: Vec<(String, String)>,
    },

    /// Manage expansions
    #[command(subcommand)]
    Expansion(ExpansionCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    logging::init(cli.verbose, config.global.log_level);
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format);

    tracing::debug!("papi starting, project root: {:?}", config.project_root);

    let options = SessionOptions {
        expansion_dir: cli.expansion_dir,
        no_builtins: cli.no_builtins,
    };

    match cli.command {
        Commands::Init { path } => {
            let papi_dir = Config::init_project(&path)?;
            if output.is_json() {
                output.data(&serde_json::json!({
                    "initialized": true,
                    "path": papi_dir.display().to_string(),
                }));
            } else {
                output.success(&format!("Initialized papi project at {}", path.display()));
            }
        }

        Commands::Resolve {
            text,
            context,
            attributes,
        } => {
            let session = Session::start(&config, &options);
            resolve_cmd::run(&output, &session, text, context, attributes)?
        }

        Commands::Expansion(cmd) => {
            let session = Session::start(&config, &options);
            expansion_cmd::run(cmd, &output, &session)?
        }
    }

    tracing::debug!("Command completed successfully");
    Ok(())
}
