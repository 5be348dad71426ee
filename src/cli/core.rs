//! Core CLI dispatch, error types, and shell context helpers.

use std::{io, path::PathBuf};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{utils::PathResolver, TripManager},
    domain::parse_date_key,
    errors::TripError,
    remote::{providers_from_config, spawn_startup_fetches},
    storage::JsonFileStore,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io::{self as cli_io, DialogConfirm};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Builds a shell whose config and stores live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load().unwrap_or_else(|err| {
            cli_io::print_warning(format!("{err}; using default settings"));
            Config::default()
        });
        let store = JsonFileStore::new(PathResolver::store_dir_in(&base))?;
        let manager = TripManager::load(Box::new(store), &config)?;

        let updates = if config.network_enabled {
            let (rates, weather) = providers_from_config(&config);
            Some(spawn_startup_fetches(rates, weather))
        } else {
            tracing::info!("network disabled; using fallback rate");
            None
        };

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            updates,
            last_command: None,
            running: true,
        })
    }

    /// `(name, usage)` for every registered command, in registration order.
    pub(crate) fn command_usages(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .iter()
            .map(|entry| (entry.name, entry.usage))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        let date = self.manager.selected_date();
        format!("trip {}> ", date.format("%m/%d"))
    }

    pub(crate) fn confirmer(&self) -> DialogConfirm<'_> {
        DialogConfirm::new(self.mode, &self.theme)
    }

    /// Applies whatever background lookups have finished since the last command.
    pub(crate) fn drain_updates(&mut self) {
        let Some(updates) = &self.updates else {
            return;
        };
        let pending: Vec<_> = updates.try_iter().collect();
        for update in pending {
            self.manager.apply_remote(update);
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        self.drain_updates();
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Runs one line of shell input. Blank lines and `#` comments do nothing.
    pub(crate) fn execute_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = shell_words::split(line).map_err(|err| {
            CommandError::InvalidArguments(format!("cannot parse `{}`: {err}", line.trim()))
        })?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        if raw.starts_with('#') {
            return Ok(LoopControl::Continue);
        }

        self.last_command = Some(line.trim().to_string());
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> bool {
        if self.mode == CliMode::Script {
            return true;
        }
        crate::core::Confirmation::confirm(&self.confirmer(), "Exit shell?")
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}

/// Accepts `YYYY-MM-DD`.
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    parse_date_key(input).ok_or_else(|| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] TripError),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TripError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf())?;
    let mut config = manager.load()?;
    config.network_enabled = false;
    manager.save(&config)?;

    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf())?;
    for line in lines {
        let control = match app.execute_line(line) {
            Ok(control) => control,
            Err(err) => {
                app.report_error(err)?;
                LoopControl::Continue
            }
        };
        if control == LoopControl::Exit {
            break;
        }
    }
    Ok(app)
}
