use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use spendful_core::budget::PeriodFilter;
use spendful_core::item::Category;

/// Spendful - recurring budget forecasts from a snapshot file
#[derive(Parser)]
#[command(name = "spendful")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the JSON budget snapshot
    #[arg(short, long, global = true, env = "SPENDFUL_SNAPSHOT")]
    pub snapshot: Option<String>,

    /// Budget slug or name (defaults to the first budget in the snapshot)
    #[arg(short, long, global = true)]
    pub budget: Option<String>,

    /// Override "today" (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List item occurrences in a window
    Occurrences(PeriodArgs),
    /// List misc and orphaned transactions in a window
    Misc(PeriodArgs),
    /// Project the balance on a day
    Balance(BalanceArgs),
}

/// Window and category arguments shared by the listings
#[derive(Args)]
pub struct PeriodArgs {
    /// Window start (defaults to the first of the current month)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Window end (defaults to the last of the current month)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only list one category
    #[arg(short, long, value_enum)]
    pub category: Option<CategoryArg>,
}

impl PeriodArgs {
    pub fn filter(&self) -> PeriodFilter {
        PeriodFilter {
            starting: self.from,
            ending: self.to,
            category: self.category.map(Category::from),
        }
    }
}

/// Arguments for the `balance` command
#[derive(Args)]
pub struct BalanceArgs {
    /// Day to project to (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Income,
    Expense,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Income => Self::Income,
            CategoryArg::Expense => Self::Expense,
        }
    }
}
