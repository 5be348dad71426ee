use crate::cli::commands::{parse_position, CommandArgs, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::Outcome;
use crate::domain::ShoppingItem;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("shop", "Show the shopping list", "shop", cmd_shop),
        CommandDefinition::new(
            "add-shop",
            "Add an item to the shopping list",
            "add-shop <name> [--image data:...]",
            cmd_add_shop,
        ),
        CommandDefinition::new(
            "delete-shop",
            "Remove a shopping item by position",
            "delete-shop <position>",
            cmd_delete_shop,
        ),
    ]
}

fn cmd_shop(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Shopping list");
    let items = context.manager.shopping().items();
    if items.is_empty() {
        io::print_info("Nothing to buy yet.");
    }
    for (index, item) in items.iter().enumerate() {
        let photo = if item.image.is_some() { " [photo]" } else { "" };
        io::print_info(format!("{:>2}. {}{photo}", index + 1, item.name));
    }
    Ok(())
}

fn cmd_add_shop(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    args.allow_only(&["image"])?;
    let name = args
        .joined_from(0)
        .ok_or_else(|| CommandError::InvalidArguments("missing item name".into()))?;
    let mut item = ShoppingItem::new(name);
    if let Some(image) = args.option("image") {
        item = item.with_image(image);
    }
    context.manager.add_shopping_item(item)?;
    io::print_success(format!(
        "Added to shopping list ({} items).",
        context.manager.shopping().len()
    ));
    Ok(())
}

fn cmd_delete_shop(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_position(
        args.first()
            .ok_or_else(|| CommandError::InvalidArguments("missing position".into()))?,
    )?;
    let confirm = io::DialogConfirm::new(context.mode, &context.theme);
    match context.manager.remove_shopping_item(index, &confirm)? {
        Outcome::Applied(item) => io::print_success(format!("Removed `{}`.", item.name)),
        Outcome::Declined => io::print_info("Nothing removed."),
    }
    Ok(())
}
