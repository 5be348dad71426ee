use std::collections::HashMap;
use std::str::FromStr;

pub mod config;
pub mod expenses;
pub mod itinerary;
pub mod rates;
pub mod shopping;
pub mod system;
pub mod transfer;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(itinerary::definitions());
    commands.extend(shopping::definitions());
    commands.extend(expenses::definitions());
    commands.extend(rates::definitions());
    commands.extend(transfer::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus `--name value` options.
pub(crate) struct CommandArgs<'a> {
    positional: Vec<&'a str>,
    options: HashMap<&'a str, &'a str>,
}

impl<'a> CommandArgs<'a> {
    pub(crate) fn parse(raw: &[&'a str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut options = HashMap::new();
        let mut tokens = raw.iter().copied();
        while let Some(token) = tokens.next() {
            match token.strip_prefix("--") {
                Some(name) if !name.is_empty() => {
                    let value = tokens.next().ok_or_else(|| {
                        CommandError::InvalidArguments(format!("option `--{name}` needs a value"))
                    })?;
                    options.insert(name, value);
                }
                _ => positional.push(token),
            }
        }
        Ok(Self {
            positional,
            options,
        })
    }

    pub(crate) fn get(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index).copied()
    }

    pub(crate) fn required(&self, index: usize, what: &str) -> Result<&'a str, CommandError> {
        self.get(index)
            .ok_or_else(|| CommandError::InvalidArguments(format!("missing {what}")))
    }

    pub(crate) fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    /// Remaining positionals from `index` joined with spaces.
    pub(crate) fn joined_from(&self, index: usize) -> Option<String> {
        let rest = self.positional.get(index..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }

    /// Rejects options this command does not understand.
    pub(crate) fn allow_only(&self, known: &[&str]) -> Result<(), CommandError> {
        match self.options.keys().find(|name| !known.contains(name)) {
            Some(name) => Err(CommandError::InvalidArguments(format!(
                "unknown option `--{name}`"
            ))),
            None => Ok(()),
        }
    }
}

pub(crate) fn parse_value<T: FromStr>(value: &str, what: &str) -> Result<T, CommandError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{value}` is not a valid {what}")))
}

/// Converts a 1-based position typed by the user into an index.
pub(crate) fn parse_position(value: &str) -> Result<usize, CommandError> {
    let position: usize = parse_value(value, "position")?;
    position
        .checked_sub(1)
        .ok_or_else(|| CommandError::InvalidArguments("positions start at 1".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_split_from_positionals() {
        let args = CommandArgs::parse(&["12:00", "Lunch", "--note", "cash only", "spot"]).unwrap();
        assert_eq!(args.get(0), Some("12:00"));
        assert_eq!(args.joined_from(1).as_deref(), Some("Lunch spot"));
        assert_eq!(args.option("note"), Some("cash only"));
        assert!(args.allow_only(&["note"]).is_ok());
        assert!(args.allow_only(&["time"]).is_err());
    }

    #[test]
    fn dangling_option_is_an_error() {
        assert!(CommandArgs::parse(&["--image"]).is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_position("1").unwrap(), 0);
        assert!(parse_position("0").is_err());
        assert!(parse_position("x").is_err());
    }

    #[test]
    fn every_command_is_registered_once() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());
        for name in ["days", "add-expense", "rewards", "import", "config", "exit"] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }
}
