mod book;
mod common;
mod completions;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::book::{BookCommands, handle_book_command};
use crate::completions::CompletionCommands;
use crate::ui::prelude::*;

/// Render narrated picture books into subtitled videos
#[derive(Parser, Debug)]
#[command(name = "bookreel", author, version, about, long_about = None)]
struct Cli {
    /// Print debug events, including the full ffmpeg command lines
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Render configuration file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Book(BookCommands),

    /// Shell completion scripts
    Completions {
        #[command(subcommand)]
        command: CompletionCommands,
    },
}

pub fn cli_command() -> clap::Command {
    Cli::command()
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Book(command) => handle_book_command(command, cli.config.as_deref()),
        Commands::Completions { command } => match command {
            CompletionCommands::Generate { shell } => {
                print!("{}", completions::generate(shell)?);
                Ok(())
            }
            CompletionCommands::Install {
                shell,
                file,
                force,
            } => {
                let path = completions::install(shell, file, force)?;
                emit(
                    Level::Success,
                    "completions.installed",
                    &format!("Installed {shell} completions to {}", path.display()),
                    None,
                );
                emit(
                    Level::Info,
                    "completions.activate",
                    &shell.activation_hint(&path),
                    None,
                );
                Ok(())
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    ui::init(cli.output, !cli.no_color);
    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        emit(Level::Error, "error", &format!("Error: {err:#}"), None);
        std::process::exit(1);
    }
}
