use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::core::Make;
use crate::error::MakesResult;

use super::app::App;

#[derive(Parser, Debug)]
#[command(name = "makes")]
#[command(version, about = "Interactively select make targets from a Makefile")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, short, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Make program to run")]
    pub make: Option<String>,

    #[arg(long, short = 'f', global = true, help = "Makefile to read documentation comments from")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Select a target interactively and run it (default)
    Pick,

    /// List targets without running anything
    List {
        #[arg(long, help = "Print targets as JSON")]
        json: bool,
    },

    /// Initialize the configuration
    Init {
        #[arg(long, help = "Force overwrite existing configuration")]
        force: bool,
    },
}

impl Args {
    /// Load configuration and apply command line overrides
    pub fn load_config(&self) -> MakesResult<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(make) = &self.make {
            config.make.program = make.clone();
        }
        if let Some(file) = &self.file {
            config.make.makefile = file.clone();
        }

        Ok(config)
    }
}

/// Execute a command, returning the process exit code
pub async fn execute_command(args: &Args) -> MakesResult<i32> {
    match args.command.clone().unwrap_or(Commands::Pick) {
        Commands::Pick => build_app(args)?.pick_and_run().await,
        Commands::List { json } => {
            build_app(args)?.list(json).await?;
            Ok(0)
        }
        Commands::Init { force } => {
            let path = Config::init(args.config.as_deref(), force)?;
            println!("Configuration initialized at {}", path.display());
            Ok(0)
        }
    }
}

fn build_app(args: &Args) -> MakesResult<App<Make>> {
    let config = args.load_config()?;
    info!("Using {} with {}", config.make.program, config.make.makefile.display());
    Ok(App::new(config))
}
