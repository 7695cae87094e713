use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use clap_complete::Shell;

use crate::common::paths::bookreel_data_dir;

pub const BIN_NAME: &str = "bookreel";

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SupportedShell {
    Bash,
    Zsh,
}

impl SupportedShell {
    fn as_complete_shell(self) -> Shell {
        match self {
            SupportedShell::Bash => Shell::Bash,
            SupportedShell::Zsh => Shell::Zsh,
        }
    }

    fn script_name(self) -> String {
        match self {
            SupportedShell::Bash => format!("{BIN_NAME}.bash"),
            SupportedShell::Zsh => format!("_{BIN_NAME}"),
        }
    }

    /// How to make the shell pick up a script written to `script`.
    pub fn activation_hint(self, script: &Path) -> String {
        match self {
            SupportedShell::Bash => format!(
                "Source it from ~/.bashrc:\n  [ -r \"{0}\" ] && source \"{0}\"",
                script.display()
            ),
            SupportedShell::Zsh => {
                let dir = script.parent().unwrap_or(script);
                format!(
                    "Add its directory to fpath in ~/.zshrc:\n  fpath=(\"{}\" $fpath)\n  autoload -U compinit && compinit",
                    dir.display()
                )
            }
        }
    }
}

impl fmt::Display for SupportedShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportedShell::Bash => write!(f, "bash"),
            SupportedShell::Zsh => write!(f, "zsh"),
        }
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum CompletionCommands {
    /// Print the completion script to stdout
    Generate {
        #[arg(value_enum)]
        shell: SupportedShell,
    },
    /// Write the completion script into the bookreel data directory
    Install {
        #[arg(value_enum)]
        shell: SupportedShell,
        /// Write to this file instead
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
        /// Replace an existing script
        #[arg(long)]
        force: bool,
    },
}

pub fn generate(shell: SupportedShell) -> Result<String> {
    let mut command = crate::cli_command();
    let mut buffer = Vec::new();
    clap_complete::generate(shell.as_complete_shell(), &mut command, BIN_NAME, &mut buffer);
    String::from_utf8(buffer).context("completion script is not valid UTF-8")
}

pub fn install(shell: SupportedShell, file: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let target = file.unwrap_or_else(|| {
        bookreel_data_dir()
            .join("completions")
            .join(shell.script_name())
    });

    if target.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", target.display());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(&target, generate(shell)?)
        .with_context(|| format!("Failed to write completion script {}", target.display()))?;
    Ok(target)
}
