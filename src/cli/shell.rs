use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, ShellContext};
use crate::cli::output::{self, info as output_info, OutputPreferences};
use crate::utils::build_info;

/// Environment variable switching the shell to line-by-line stdin processing.
pub const SCRIPT_ENV: &str = "TRIP_PLANNER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    if mode == CliMode::Script {
        output::set_preferences(OutputPreferences {
            plain: true,
            quiet_mode: true,
        });
    }

    tracing::debug!(build = %build_info::current().summary(), "starting shell");
    let mut context = ShellContext::new(mode)?;
    tracing::debug!(status = %context.status(), "shell ready");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_usages())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output_info("Type `help` to list commands.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }
                run_line(context, &line)?;
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit() {
                    context.running = false;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                context.running = false;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running {
            break;
        }
        run_line(context, &line?)?;
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) -> Result<(), CliError> {
    match context.execute_line(line) {
        Ok(_) => Ok(()),
        Err(err) => context.report_error(err),
    }
}

/// Completes command names and hints the argument list once a command is typed.
struct CommandHelper {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandHelper {
    fn new(mut commands: Vec<(&'static str, &'static str)>) -> Self {
        commands.sort_by_key(|(name, _)| *name);
        commands.dedup_by_key(|(name, _)| *name);
        Self { commands }
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|(name, _)| name.starts_with(needle))
            .map(|(name, _)| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect()
    }

    /// Arguments still to type after `<command> `, taken from the usage line.
    fn argument_hint(&self, line: &str) -> Option<String> {
        let name = line.strip_suffix(' ')?.trim_start().to_ascii_lowercase();
        let (_, usage) = self.commands.iter().find(|(known, _)| *known == name)?;
        let rest = usage.strip_prefix(usage.split_whitespace().next()?)?.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }
}

impl Helper for CommandHelper {}
impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        // Only the command word completes.
        if !prefix[..start].trim().is_empty() {
            return Ok((start, Vec::new()));
        }

        let needle = prefix[start..].to_ascii_lowercase();
        Ok((start, self.candidates(&needle)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        self.argument_hint(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> CommandHelper {
        CommandHelper::new(vec![
            ("add-day", "add-day"),
            ("add-item", "add-item <HH:MM|-> <name> [--category c]"),
            ("days", "days"),
            ("delete-day", "delete-day [YYYY-MM-DD]"),
        ])
    }

    #[test]
    fn completion_matches_command_prefixes() {
        let names: Vec<String> = helper()
            .candidates("add")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, vec!["add-day", "add-item"]);
    }

    #[test]
    fn typed_command_hints_its_arguments() {
        let helper = helper();
        assert_eq!(
            helper.argument_hint("add-item ").as_deref(),
            Some("<HH:MM|-> <name> [--category c]")
        );
        assert_eq!(
            helper.argument_hint("Delete-Day ").as_deref(),
            Some("[YYYY-MM-DD]")
        );
        assert_eq!(helper.argument_hint("add-day "), None);
        assert_eq!(helper.argument_hint("add-item"), None);
        assert_eq!(helper.argument_hint("add-item 09:00 "), None);
    }
}
