use anyhow::Result;
use std::process::Command;

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the bookreel binary with HOME and XDG dirs pointing into `env`.
pub fn run_bookreel(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let home = env.home();
    let output = Command::new(env!("CARGO_BIN_EXE_bookreel"))
        .args(args)
        .current_dir(env.path())
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("NO_COLOR", "1")
        .output()?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Like [`run_bookreel`], with `--config` pointing at the environment's config file.
pub fn run_with_config(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let config = env.config_path();
    let config = config.to_string_lossy();
    let mut full_args = vec!["--no-color", "--config", config.as_ref()];
    full_args.extend_from_slice(args);
    run_bookreel(env, &full_args)
}
