use crate::cli::commands::{parse_value, CommandArgs, CommandDefinition};
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::currency::{format_amount, Currency, ExchangeRate};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "rate",
            "Show or override the TWD-per-JPY rate",
            "rate [value]",
            cmd_rate,
        ),
        CommandDefinition::new(
            "convert",
            "Convert an amount at the current rate",
            "convert <amount> [JPY|TWD]",
            cmd_convert,
        ),
        CommandDefinition::new(
            "weather",
            "Show current weather at the destination",
            "weather",
            cmd_weather,
        ),
    ]
}

fn cmd_rate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let rate = ExchangeRate::new(parse_value(raw, "rate")?)?;
        context.manager.set_rate(rate);
        io::print_success(format!("Rate set to {rate}."));
        return Ok(());
    }
    let rate = context.manager.rate();
    io::print_info(rate.to_string());
    io::print_info(format!(
        "{} = {}",
        format_amount(1000, Currency::Jpy),
        format_amount(context.manager.convert(1000.0, Currency::Jpy), Currency::Twd)
    ));
    Ok(())
}

fn cmd_convert(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    let amount: f64 = parse_value(args.required(0, "amount")?, "amount")?;
    let from = match args.get(1) {
        Some(code) => code.parse::<Currency>()?,
        None => Currency::Jpy,
    };
    let to = match from {
        Currency::Jpy => Currency::Twd,
        Currency::Twd => Currency::Jpy,
    };
    let converted = context.manager.convert(amount, from);
    io::print_info(format!("{amount} {} ≈ {}", from, format_amount(converted, to)));
    Ok(())
}

fn cmd_weather(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.manager.weather() {
        Some(report) => io::print_info(format!(
            "{}: {}",
            context.config.weather.timezone,
            report.summary()
        )),
        None if context.config.network_enabled => {
            io::print_info("Weather is not available yet.")
        }
        None => io::print_info("Weather lookups are disabled (network_enabled = false)."),
    }
    Ok(())
}
