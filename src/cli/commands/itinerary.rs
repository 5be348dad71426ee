use crate::cli::commands::{parse_position, CommandArgs, CommandDefinition};
use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::Outcome;
use crate::domain::{Displayable, FlightInfo, ItineraryCategory, ItineraryEntry, TransportMode};

const ENTRY_OPTIONS: &[&str] = &[
    "name", "time", "category", "note", "transport", "duration", "flight",
];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("days", "List the trip days", "days", cmd_days),
        CommandDefinition::new("add-day", "Add a day after the last one", "add-day", cmd_add_day),
        CommandDefinition::new(
            "prepend-day",
            "Add a day before the first one",
            "prepend-day",
            cmd_prepend_day,
        ),
        CommandDefinition::new(
            "delete-day",
            "Delete a day and its plans",
            "delete-day [YYYY-MM-DD]",
            cmd_delete_day,
        ),
        CommandDefinition::new(
            "select",
            "Select the day to work on",
            "select <YYYY-MM-DD|day-number>",
            cmd_select,
        ),
        CommandDefinition::new("plan", "Show the selected day's plan", "plan", cmd_plan),
        CommandDefinition::new(
            "add-item",
            "Add a plan entry to the selected day",
            "add-item <HH:MM|-> <name> [--category c] [--note n] [--transport walk|car|train] [--duration d] [--flight \"NO FROM TO DEP ARR [TERMINAL]\"]",
            cmd_add_item,
        ),
        CommandDefinition::new(
            "edit-item",
            "Edit a plan entry by id",
            "edit-item <id> [--name n] [--time HH:MM] [--category c] [--note n] [--transport m] [--duration d] [--flight text]",
            cmd_edit_item,
        ),
        CommandDefinition::new(
            "delete-item",
            "Delete a plan entry by id",
            "delete-item <id>",
            cmd_delete_item,
        ),
        CommandDefinition::new(
            "move-item",
            "Reorder the selected day's plan",
            "move-item <from> <to>",
            cmd_move_item,
        ),
    ]
}

fn cmd_days(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Trip days");
    let selected = context.manager.selected_date();
    let book = context.manager.range().book();
    for (index, entry) in context.manager.dates().iter().enumerate() {
        let marker = if entry.date() == selected { "*" } else { " " };
        io::print_info(format!(
            "{marker} Day {:<2} {}  {} plans",
            index + 1,
            entry.display_label(),
            book.day(entry.date()).len()
        ));
    }
    Ok(())
}

fn cmd_add_day(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let entry = context.manager.append_day()?;
    io::print_success(format!("Added {}.", entry.display_label()));
    Ok(())
}

fn cmd_prepend_day(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let entry = context.manager.prepend_day()?;
    io::print_success(format!("Added {}.", entry.display_label()));
    Ok(())
}

fn cmd_delete_day(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args.first() {
        Some(raw) => parse_date(raw)?,
        None => context.manager.selected_date(),
    };
    let confirm = io::DialogConfirm::new(context.mode, &context.theme);
    match context.manager.delete_day(target, &confirm)? {
        Outcome::Applied(Some(deleted)) => io::print_success(format!(
            "Deleted {} ({} plans). Now on {}.",
            deleted.date.full_date(),
            deleted.removed_entries,
            deleted.selected
        )),
        Outcome::Applied(None) => io::print_warning(format!("{target} is not part of the trip.")),
        Outcome::Declined => io::print_info("Nothing deleted."),
    }
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: select <YYYY-MM-DD|day-number>".into()))?;
    let date = match raw.parse::<usize>() {
        Ok(number) => {
            let index = number
                .checked_sub(1)
                .filter(|index| *index < context.manager.dates().len())
                .ok_or_else(|| CommandError::InvalidArguments(format!("no day {number}")))?;
            context.manager.dates()[index].date()
        }
        Err(_) => parse_date(raw)?,
    };
    context.manager.select(date)?;
    io::print_success(format!("Selected {date}."));
    Ok(())
}

fn cmd_plan(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let date = context.manager.selected_date();
    output_section(format!("Plan for {date}"));
    let plan = context.manager.current_itinerary();
    if plan.is_empty() {
        io::print_info("No plans yet. Use `add-item` to add one.");
        return Ok(());
    }
    for (index, entry) in plan.iter().enumerate() {
        io::print_info(format!(
            "{:>2}. {}  #{}",
            index + 1,
            entry.display_label(),
            entry.id
        ));
        if let Some(terminal) = entry.flight.as_ref().and_then(|f| f.terminal.as_deref()) {
            io::print_info(format!("      terminal {terminal}"));
        }
        if let Some(note) = &entry.note {
            io::print_info(format!("      {note}"));
        }
        if let Some(mode) = entry.transport_mode {
            let duration = entry.transport_time.as_deref().unwrap_or("?");
            io::print_info(format!("      then {} ({duration})", mode.label()));
        }
    }
    Ok(())
}

fn cmd_add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    args.allow_only(ENTRY_OPTIONS)?;
    let time = match args.required(0, "time (HH:MM or -)")? {
        "-" => "",
        time => time,
    };
    let name = args
        .joined_from(1)
        .or_else(|| args.option("name").map(str::to_string))
        .ok_or_else(|| CommandError::InvalidArguments("missing entry name".into()))?;

    let mut entry = ItineraryEntry::new(0, name, time);
    apply_entry_options(&mut entry, &args)?;
    let id = context.manager.add_entry(entry)?;
    io::print_success(format!("Added plan #{id}."));
    Ok(())
}

fn cmd_edit_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    args.allow_only(ENTRY_OPTIONS)?;
    let id = parse_id(args.required(0, "entry id")?)?;
    let date = context.manager.selected_date();
    let mut entry = context
        .manager
        .current_itinerary()
        .iter()
        .find(|entry| entry.id == id)
        .cloned()
        .ok_or(crate::errors::TripError::EntryNotFound {
            date: date.to_string(),
            id,
        })?;

    if let Some(name) = args.option("name") {
        entry.name = name.to_string();
    }
    if let Some(time) = args.option("time") {
        entry.time = if time == "-" { String::new() } else { time.to_string() };
    }
    apply_entry_options(&mut entry, &args)?;
    context.manager.update_entry(entry)?;
    io::print_success(format!("Updated plan #{id}."));
    Ok(())
}

fn cmd_delete_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(
        args.first()
            .ok_or_else(|| CommandError::InvalidArguments("missing entry id".into()))?,
    )?;
    let confirm = io::DialogConfirm::new(context.mode, &context.theme);
    match context.manager.delete_entry(id, &confirm)? {
        Outcome::Applied(entry) => io::print_success(format!("Deleted `{}`.", entry.name)),
        Outcome::Declined => io::print_info("Nothing deleted."),
    }
    Ok(())
}

fn cmd_move_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    let from = parse_position(args.required(0, "source position")?)?;
    let to = parse_position(args.required(1, "target position")?)?;
    context.manager.move_entry(from, to)?;
    io::print_success(format!("Moved plan {} to position {}.", from + 1, to + 1));
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64, CommandError> {
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))
}

fn apply_entry_options(entry: &mut ItineraryEntry, args: &CommandArgs<'_>) -> CommandResult {
    if let Some(text) = args.option("flight") {
        entry.flight = Some(parse_flight(text)?);
        entry.category = ItineraryCategory::Flight;
    }
    if let Some(category) = args.option("category") {
        entry.category = category.parse::<ItineraryCategory>()?;
    }
    if let Some(note) = args.option("note") {
        entry.note = Some(note.to_string()).filter(|note| !note.is_empty());
    }
    if let Some(mode) = args.option("transport") {
        let mode = mode.parse::<TransportMode>()?;
        entry.transport_mode = Some(mode);
        if let Some(duration) = args.option("duration") {
            entry.transport_time = Some(duration.to_string());
        }
    } else if let Some(duration) = args.option("duration") {
        entry.transport_time = Some(duration.to_string());
    }
    Ok(())
}

/// `NO FROM TO DEP ARR [TERMINAL]`, e.g. `IT284 KHH KIX 06:55 10:40 T1`.
fn parse_flight(text: &str) -> Result<FlightInfo, CommandError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [no, from, to, dep, arr, rest @ ..] if rest.len() <= 1 => Ok(FlightInfo {
            from: from.to_string(),
            to: to.to_string(),
            dep: dep.to_string(),
            arr: arr.to_string(),
            no: no.to_string(),
            terminal: rest.first().map(|terminal| terminal.to_string()),
        }),
        _ => Err(CommandError::InvalidArguments(format!(
            "flight `{text}` must be `NO FROM TO DEP ARR [TERMINAL]`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_text_parses_with_optional_terminal() {
        let flight = parse_flight("IT284 KHH KIX 06:55 10:40").unwrap();
        assert_eq!(flight.no, "IT284");
        assert_eq!(flight.to, "KIX");
        assert!(flight.terminal.is_none());
        let flight = parse_flight("IT285 KIX KHH 11:50 14:05 T1").unwrap();
        assert_eq!(flight.terminal.as_deref(), Some("T1"));
        assert!(parse_flight("IT284 KHH").is_err());
    }

    #[test]
    fn flight_option_marks_the_entry_as_a_flight() {
        let args = CommandArgs::parse(&["--flight", "IT284 KHH KIX 06:55 10:40"]).unwrap();
        let mut entry = ItineraryEntry::new(1, "Fly to Osaka", "06:55");
        apply_entry_options(&mut entry, &args).unwrap();
        assert_eq!(entry.category, ItineraryCategory::Flight);
        assert!(entry.display_label().contains("KHH→KIX"));
    }
}
