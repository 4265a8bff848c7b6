//! Spendful forecast CLI
//!
//! Loads a budget snapshot into the in-memory store and prints occurrence
//! listings, misc transactions and balance projections.

mod cli;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendful_core::budget::{BalanceService, Budget, BudgetService};
use spendful_core::store::{MemoryStore, Snapshot, Store};
use spendful_shared::AppConfig;
use spendful_shared::types::Money;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);

    let cli = Cli::parse();
    let path = cli.snapshot.clone().unwrap_or_else(|| config.forecast.snapshot_path.clone());
    let text = std::fs::read_to_string(&path).with_context(|| format!("failed to read snapshot {path}"))?;
    let snapshot = Snapshot::from_json(&text).with_context(|| format!("invalid snapshot {path}"))?;
    info!(
        path = %path,
        budgets = snapshot.budgets.len(),
        items = snapshot.items.len(),
        transactions = snapshot.transactions.len(),
        "Snapshot loaded"
    );

    let budget = select_budget(&snapshot.budgets, cli.budget.as_deref())?;
    let store = MemoryStore::from_snapshot(snapshot);
    let today = cli
        .today
        .or(config.forecast.today)
        .unwrap_or_else(|| Local::now().date_naive());
    debug!(budget = %budget.slug, %today, "Running forecast");

    match &cli.command {
        Commands::Occurrences(args) => print_occurrences(&store, &budget, args, today, cli.json),
        Commands::Misc(args) => print_misc(&store, &budget, args, today, cli.json),
        Commands::Balance(args) => print_balance(&store, &budget, args.as_of.unwrap_or(today), today, cli.json),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn select_budget(budgets: &[Budget], selector: Option<&str>) -> anyhow::Result<Budget> {
    let found = match selector {
        Some(key) => budgets.iter().find(|b| b.slug == key || b.name == key),
        None => budgets.first(),
    };
    match (found, selector) {
        (Some(budget), _) => Ok(budget.clone()),
        (None, Some(key)) => bail!("no budget named {key}"),
        (None, None) => bail!("snapshot has no budgets"),
    }
}

fn print_occurrences<S: Store>(
    store: &S,
    budget: &Budget,
    args: &cli::PeriodArgs,
    today: NaiveDate,
    as_json: bool,
) -> anyhow::Result<()> {
    let occurrences = BudgetService::occurrences(store, budget.id, args.filter(), today)?;

    if as_json {
        let mut rows = Vec::with_capacity(occurrences.len());
        for occurrence in &occurrences {
            rows.push(json!({
                "item_id": occurrence.item_id(),
                "date": occurrence.date(),
                "name": occurrence.name(),
                "category": occurrence.category(),
                "amount": occurrence.amount(),
                "actual": occurrence.actual(store)?,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for occurrence in &occurrences {
        println!(
            "{}  {:<8} {:<30} {:>12}  paid {:>12}",
            occurrence.date(),
            occurrence.category(),
            occurrence.name(),
            Money::from_minor(occurrence.amount()),
            Money::from_minor(occurrence.actual(store)?),
        );
    }
    Ok(())
}

fn print_misc<S: Store>(
    store: &S,
    budget: &Budget,
    args: &cli::PeriodArgs,
    today: NaiveDate,
    as_json: bool,
) -> anyhow::Result<()> {
    let txns = BudgetService::misc_transactions(store, budget.id, args.filter(), today)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&txns)?);
        return Ok(());
    }

    for txn in &txns {
        let item = match txn.item_id {
            Some(id) => store.item(id)?,
            None => None,
        };
        let category = txn
            .category_with(item.as_ref())
            .map_or("-", |category| category.as_str());
        println!(
            "{}  {:<8} {:<30} {:>12}",
            txn.date,
            category,
            txn.description_with(item.as_ref()),
            Money::from_minor(txn.amount),
        );
    }
    Ok(())
}

fn print_balance<S: Store>(
    store: &S,
    budget: &Budget,
    as_of: NaiveDate,
    today: NaiveDate,
    as_json: bool,
) -> anyhow::Result<()> {
    let projection = BalanceService::project(store, budget.id, as_of, today)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!("{} as of {as_of}", budget.name);
    println!("  opening  {:>12}", Money::from_minor(projection.initial_balance));
    println!("  income   {:>12}", Money::from_minor(projection.income));
    println!("  expense  {:>12}", Money::from_minor(projection.expense));
    println!("  balance  {:>12}", Money::from_minor(projection.balance()));
    Ok(())
}
