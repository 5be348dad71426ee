use std::path::PathBuf;

use chrono::Local;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::core::Outcome;
use crate::transfer::{export_file_name, read_import, write_export};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "export",
            "Write a backup of the whole trip",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "import",
            "Replace trip data from a backup file",
            "import <path>",
            cmd_import,
        ),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(export_file_name(
            &context.config.export_prefix,
            Local::now().date_naive(),
        )),
    };
    write_export(&path, &context.manager.export_document())?;
    io::print_success(format!("Exported trip to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = args
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| CommandError::InvalidArguments("missing backup path".into()))?;
    let payload = read_import(&path)?;
    if payload.is_empty() {
        io::print_warning("Backup contains no itinerary, shopping, or expenses section.");
        return Ok(());
    }
    let confirm = io::DialogConfirm::new(context.mode, &context.theme);
    match context.manager.import(payload, &confirm)? {
        Outcome::Applied(sections) => {
            io::print_success(format!("Imported {}.", sections.join(", ")))
        }
        Outcome::Declined => io::print_info("Import cancelled."),
    }
    Ok(())
}
