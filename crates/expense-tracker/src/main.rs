//! Personal Expense Tracker
//!
//! Records daily expenses in a flat CSV log (or an SQLite database) and serves
//! monthly and yearly spending reports over HTTP or on the console.

mod charts;
mod config;
mod constants;
mod expenses;
mod monthly;
mod reports;
mod server;
mod store;
mod views;
mod yearly;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Backend, Config, FileConfig, Overrides};
use expenses::NewExpense;
use reports::{DetailRow, Outcome};
use store::{CsvStore, ExpenseStore, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "expense-tracker")]
#[command(about = "Personal expense tracker with monthly and yearly reports")]
struct Args {
    /// Config file (optional; defaults apply when it does not exist)
    #[arg(short, long, default_value = constants::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Expense log (CSV) or database (SQLite) path
    #[arg(short, long, global = true)]
    data_file: Option<PathBuf>,

    /// Storage backend
    #[arg(long, value_enum, global = true)]
    backend: Option<Backend>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseCommand,
    },

    /// Print spending reports
    Report {
        #[command(subcommand)]
        action: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    /// List all expenses
    List,

    /// Add a new expense
    Add {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Category (free text)
        #[arg(long)]
        category: String,

        /// Amount (stored as typed; non-numeric amounts count as 0 in reports)
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// Note (optional)
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Append every row of another expense CSV
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Export expenses to CSV file
    Export {
        /// Path to output CSV file
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Category breakdown for one month (default: month of the latest expense)
    Monthly {
        #[arg(long)]
        year: Option<i32>,

        /// Month number (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Month-by-month totals for one year (default: latest year)
    Yearly {
        #[arg(long)]
        year: Option<i32>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    let (host, port) = match &command {
        Command::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    let overrides = Overrides {
        host,
        port,
        backend: args.backend,
        data_file: args.data_file,
    };
    let config = Config::resolve(FileConfig::load_or_default(&args.config)?, overrides);

    match config.backend {
        Backend::Csv => {
            let store = CsvStore::open(&config.data_file)?;
            run(store, command, &config).await
        }
        Backend::Sqlite => {
            let store = SqliteStore::open(&config.data_file).await?;
            info!(records = store.count().await?, "opened expense database");
            run(store, command, &config).await
        }
    }
}

async fn run<S: ExpenseStore>(store: S, command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Serve { .. } => server::serve(store, config).await,
        Command::Expense { action } => handle_expense_command(action, &store, config).await,
        Command::Report { action } => handle_report_command(action, &store, config).await,
    }
}

/// Handle expense subcommands
async fn handle_expense_command<S: ExpenseStore>(
    action: ExpenseCommand,
    store: &S,
    config: &Config,
) -> Result<()> {
    match action {
        ExpenseCommand::List => {
            let records = store.load_all().await?;
            if records.is_empty() {
                println!("No expenses recorded.");
                println!("\nUse 'expense-tracker expense add' to add expenses");
                println!("Or 'expense-tracker expense import <file.csv>' to import from CSV");
                return Ok(());
            }

            let rows: Vec<DetailRow> = records.iter().map(DetailRow::from).collect();
            reports::print_details(&rows, &config.currency_symbol);
            println!("{}", "-".repeat(64));
            println!(
                "{:>29} {}{:>11.2}",
                "Total:",
                config.currency_symbol,
                expenses::total_amount(&records)
            );
            println!("\n{} expense(s)", records.len());
            Ok(())
        }

        ExpenseCommand::Add {
            date,
            category,
            amount,
            note,
        } => {
            let Some(parsed) = expenses::parse_date(&date) else {
                bail!("Invalid date '{}'. Expected YYYY-MM-DD", date);
            };

            let expense = NewExpense {
                date: parsed,
                category,
                amount,
                note,
            };
            store.append(&expense).await?;

            println!(
                "Added expense: {} {} {}{}",
                expense.date, expense.category, config.currency_symbol, expense.amount
            );
            Ok(())
        }

        ExpenseCommand::Import { file } => {
            let rows = store::read_csv(&file)?;
            for row in &rows {
                store.append(row).await?;
            }
            info!(file = %file.display(), count = rows.len(), "imported expenses");
            println!("Imported {} expenses from {}", rows.len(), file.display());
            Ok(())
        }

        ExpenseCommand::Export { file } => {
            let records = store.load_all().await?;
            store::export_to_csv(&records, &file)?;
            println!("Exported {} expenses to {}", records.len(), file.display());
            Ok(())
        }
    }
}

/// Handle report subcommands
async fn handle_report_command<S: ExpenseStore>(
    action: ReportCommand,
    store: &S,
    config: &Config,
) -> Result<()> {
    let records = store.load_all().await?;

    match action {
        ReportCommand::Monthly { year, month } => {
            match monthly::monthly_report(&records, month, year) {
                Outcome::NoData(reason) => println!("{}", reason),
                Outcome::Report(report) => reports::print_monthly(&report, &config.currency_symbol),
            }
        }
        ReportCommand::Yearly { year } => match yearly::yearly_report(&records, year) {
            Outcome::NoData(reason) => println!("{}", reason),
            Outcome::Report(report) => reports::print_yearly(&report, &config.currency_symbol),
        },
    }

    Ok(())
}
