// nosrs/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use nosrs::cli::reconfigure_project;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nosrs")]
#[command(about = "Reconfiguration toolkit for NOS 2.8.7 batch hosts", long_about = None)]
#[command(version = env!("NOSRS_CLI_VERSION"))]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    project_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the site configuration to the staged installation
    Reconfigure,
}

fn entrypoint() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let project_dir = cli
        .project_dir
        .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current directory"));

    match cli.command {
        Commands::Reconfigure => reconfigure_project(&project_dir),
    }
}

fn main() -> ExitCode {
    match entrypoint() {
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}
