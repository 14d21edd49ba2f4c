//! Ember command-line driver
//!
//! Lowers tuple-encoded instruction streams and class descriptors read from
//! JSON files, printing the generated text to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Ember JIT lowering backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Compiler configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower one stream (or a list of streams) to target text
    Lower {
        /// JSON file holding the tuple-encoded stream(s)
        file: PathBuf,
    },

    /// Convert a class descriptor to a class definition
    Class {
        /// JSON file holding the class descriptor
        file: PathBuf,
    },

    /// Print the decoded vertices of a stream without lowering
    Dump {
        /// JSON file holding the tuple-encoded stream(s)
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let output = match cli.command {
        Commands::Lower { file } => commands::lower::execute(&file, config)?,
        Commands::Class { file } => commands::class::execute(&file, config)?,
        Commands::Dump { file } => commands::dump::execute(&file)?,
    };

    println!("{}", output);
    Ok(())
}
