use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::commands::CommandDefinition;
use crate::cli::io;
use crate::cli::output::section as output_section;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change preferences",
        "config [show|path|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "path" => {
            io::print_info(context.config_manager.path().display());
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <key> <value>".into(),
                ));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            context.config.set_value(key, value.trim())?;
            context.config_manager.save(&context.config)?;
            io::print_success(format!("Set {key} = {}.", value.trim()));
            if key != "export_prefix" {
                io::print_hint("Takes effect the next time the shell starts.");
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}` (expected show, path, or set)"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!("  trip_start        : {}", config.trip_start));
    io::print_info(format!("  initial_days      : {}", config.initial_days));
    io::print_info(format!("  seed_sample       : {}", config.seed_sample));
    io::print_info(format!("  fallback_rate     : {}", config.fallback_rate));
    io::print_info(format!("  network_enabled   : {}", config.network_enabled));
    io::print_info(format!("  rate_endpoint     : {}", config.rate_endpoint));
    io::print_info(format!("  weather.latitude  : {}", config.weather.latitude));
    io::print_info(format!("  weather.longitude : {}", config.weather.longitude));
    io::print_info(format!("  weather.timezone  : {}", config.weather.timezone));
    io::print_info(format!("  export_prefix     : {}", config.export_prefix));
    Ok(())
}
