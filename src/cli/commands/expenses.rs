use crate::cli::commands::{CommandArgs, CommandDefinition};
use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::core::Outcome;
use crate::currency::{format_amount, Currency};
use crate::domain::{Amount, ExpenseForm, PaymentMethod};
use crate::errors::TripError;
use crate::ledger::{SaveKind, BONUS_REWARD_CAP, BONUS_THRESHOLD_TWD};

const FORM_OPTIONS: &[&str] = &["amount", "name", "category", "payment", "currency", "date"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("expenses", "List recorded expenses", "expenses", cmd_expenses),
        CommandDefinition::new(
            "add-expense",
            "Record an expense",
            "add-expense <amount> [name] [--category c] [--payment cash|card|rewards] [--currency JPY|TWD] [--date YYYY-MM-DD]",
            cmd_add_expense,
        ),
        CommandDefinition::new(
            "edit-expense",
            "Edit an expense by id",
            "edit-expense <id> [--amount a] [--name n] [--category c] [--payment p] [--currency c] [--date d]",
            cmd_edit_expense,
        ),
        CommandDefinition::new(
            "delete-expense",
            "Delete an expense by id",
            "delete-expense <id>",
            cmd_delete_expense,
        ),
        CommandDefinition::new(
            "totals",
            "Show spending totals in JPY and TWD",
            "totals",
            cmd_totals,
        ),
        CommandDefinition::new(
            "rewards",
            "Show rewards-card cashback progress",
            "rewards",
            cmd_rewards,
        ),
    ]
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Expenses");
    let records = context.manager.expenses().records();
    if records.is_empty() {
        io::print_info("No expenses recorded.");
        return Ok(());
    }
    for record in records {
        let name = if record.name.is_empty() {
            record.category.as_str()
        } else {
            record.name.as_str()
        };
        io::print_info(format!(
            "#{:<14} {}  {:<12} {:>12}  {} / {}",
            record.id,
            record.date_label(),
            name,
            format_amount(record.amount.whole_units(), record.currency),
            record.category,
            record.payment
        ));
    }
    Ok(())
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    args.allow_only(FORM_OPTIONS)?;
    let mut form = context.manager.new_expense_form();
    form.amount = Amount::from(args.required(0, "amount")?);
    if let Some(name) = args.joined_from(1) {
        form.name = name;
    }
    apply_form_options(&mut form, &args)?;
    report_save(context.manager.save_expense(form)?);
    Ok(())
}

fn cmd_edit_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let args = CommandArgs::parse(args)?;
    args.allow_only(FORM_OPTIONS)?;
    let raw = args.required(0, "expense id")?;
    let id: i64 = raw
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))?;
    let record = context
        .manager
        .expenses()
        .find(id)
        .ok_or(TripError::ExpenseNotFound(id))?;
    let mut form = ExpenseForm::edit(record);
    if let Some(amount) = args.option("amount") {
        form.amount = Amount::from(amount);
    }
    if let Some(name) = args.option("name") {
        form.name = name.to_string();
    }
    apply_form_options(&mut form, &args)?;
    report_save(context.manager.save_expense(form)?);
    Ok(())
}

fn cmd_delete_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("missing expense id".into()))?;
    let id: i64 = raw
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))?;
    let confirm = io::DialogConfirm::new(context.mode, &context.theme);
    match context.manager.delete_expense(id, &confirm)? {
        Outcome::Applied(id) => io::print_success(format!("Deleted expense #{id}.")),
        Outcome::Declined => io::print_info("Nothing deleted."),
    }
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager.totals();
    output_section("Totals");
    io::print_info(format!("  JPY : {}", format_amount(totals.jpy, Currency::Jpy)));
    io::print_info(format!("  TWD : {}", format_amount(totals.twd, Currency::Twd)));
    io::print_info(format!("  Rate: {}", context.manager.rate()));
    Ok(())
}

fn cmd_rewards(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let stats = context.manager.rewards();
    output_section(format!("{} cashback", PaymentMethod::RewardsCard));
    io::print_info(format!(
        "  Card spend   : {}",
        format_amount(stats.spent_twd, Currency::Twd)
    ));
    io::print_info(format!("  Base reward  : {}", format_amount(stats.base_reward, Currency::Twd)));
    io::print_info(format!(
        "  Bonus reward : {}{}",
        format_amount(stats.bonus_reward, Currency::Twd),
        if stats.bonus_capped() { " (capped)" } else { "" }
    ));
    io::print_info(format!("  Total reward : {}", format_amount(stats.total_reward, Currency::Twd)));
    io::print_info(format!(
        "  Bonus progress: {}% of {} (cap {})",
        stats.progress_percent,
        format_amount(BONUS_THRESHOLD_TWD as i64, Currency::Twd),
        format_amount(BONUS_REWARD_CAP, Currency::Twd)
    ));
    Ok(())
}

fn apply_form_options(form: &mut ExpenseForm, args: &CommandArgs<'_>) -> CommandResult {
    if let Some(category) = args.option("category") {
        form.category = category.to_string();
    }
    if let Some(payment) = args.option("payment") {
        form.payment = payment.parse::<PaymentMethod>()?;
    }
    if let Some(date) = args.option("date") {
        form.date = Some(parse_date(date)?);
    }
    if let Some(currency) = args.option("currency") {
        if form.set_currency(currency.parse::<Currency>()?) {
            io::print_warning(format!(
                "{} only applies to JPY spending; switched to {}.",
                PaymentMethod::RewardsCard,
                PaymentMethod::CreditCard
            ));
        }
    }
    Ok(())
}

fn report_save(kind: SaveKind) {
    match kind {
        SaveKind::Created(id) => io::print_success(format!("Recorded expense #{id}.")),
        SaveKind::Updated(id) => io::print_success(format!("Updated expense #{id}.")),
    }
}
