//! Command dispatch

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::Session;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Session { script, strict }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            cmd_session(settings, script.as_deref(), *strict)
        }
        Some(Commands::Config { command }) => cmd_config(cli.config.as_deref(), command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
        None => Err(CliError::Usage(
            "no command given, try 'bananasplits --help'".into(),
        )),
    }
}

#[instrument(skip(settings))]
fn cmd_session(settings: Settings, script: Option<&Path>, strict: bool) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let mut session = Session::new(&container);

    let report = match script {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| InfraError::io(format!("open script {}", path.display()), e))?;
            session.run(BufReader::new(file), strict)?
        }
        None => session.run(io::stdin().lock(), strict)?,
    };
    debug!("session finished: {:?}", report);

    if report.failed > 0 {
        output::warning(&format!(
            "{} of {} command(s) failed",
            report.failed,
            report.executed + report.failed + report.skipped
        ));
    }
    Ok(())
}

#[instrument]
fn cmd_config(config_file: Option<&Path>, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config_file)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::action("Global", &format!("{} ({state})", path.display()));
                }
                None => output::warning("no config directory available on this platform"),
            }
            if let Some(path) = config_file {
                let state = if path.exists() { "exists" } else { "not found" };
                output::action("File", &format!("{} ({state})", path.display()));
            }
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
