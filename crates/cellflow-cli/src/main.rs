mod commands;

use anyhow::{Context, Result};
use cellflow_notebook::NotebookConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cellflow")]
#[command(about = "Run the smoothing notebook headlessly")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Notebook config (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the notebook, then apply each window write in order
    Run {
        /// Slider value to write; repeat for several passes
        #[arg(short, long = "window", allow_negative_numbers = true)]
        windows: Vec<i64>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Print the topological levels and bindings
    Graph,

    /// Write the slider and explain why a cell changed
    Explain {
        #[arg(short, long, allow_negative_numbers = true)]
        window: i64,

        /// Cell to explain
        #[arg(short, long, default_value = "commentary")]
        cell: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { windows, output } => {
            commands::run::run(&config, &windows, output)?;
        }

        Commands::Graph => {
            commands::graph::run(&config)?;
        }

        Commands::Explain { window, cell } => {
            commands::explain::run(&config, window, &cell)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<NotebookConfig> {
    match path {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            NotebookConfig::load(path)
                .with_context(|| format!("Failed to load config '{}'", path.display()))
        }
        None => {
            log::debug!("No config given, using defaults");
            Ok(NotebookConfig::default())
        }
    }
}
