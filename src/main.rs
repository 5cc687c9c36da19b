use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use envelope_triage::cli::{
    handle_export_command, handle_ledger_command, handle_metrics_command,
    handle_rebalance_command, handle_whatif_command, parse_as_of, ExportFormat, Session,
};
use envelope_triage::config::{Settings, TriagePaths};

#[derive(Parser)]
#[command(
    name = "triage",
    author = "Kaylee Beyene",
    version,
    about = "Month-indexed envelope budgeting ledger",
    long_about = "Envelope Triage folds a bank transaction export, monthly allocations, \
                  envelope transfers, and balance snapshots into a rollover ledger, \
                  then reports budget health and proposes rebalancing transfers."
)]
struct Cli {
    /// Directory holding the input CSV files (overrides settings)
    #[arg(long, global = true, env = "ENVELOPE_TRIAGE_DATA")]
    data_dir: Option<PathBuf>,

    /// Date to evaluate the budget at (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    as_of: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the envelope ledger for a month
    Ledger {
        /// Month to show (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export every month instead of one (with --output)
        #[arg(long, requires = "output")]
        all: bool,
    },

    /// Show income, health, and cash metrics for a month
    Metrics {
        /// Month to show (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Propose transfers that cover overspent envelopes
    Rebalance {
        /// Month to rebalance (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Preview a month with hypothetical transfers applied
    #[command(alias = "what-if")]
    Whatif {
        /// Month to preview (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// CSV of queued transfers (month,from_category,to_category,amount,note)
        #[arg(short, long)]
        queue: Option<PathBuf>,

        /// Also apply the Smart Rebalance proposal
        #[arg(long)]
        rebalance: bool,
    },

    /// Export the dashboard bundle or the full ledger
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration and paths
    Config {
        /// Write default settings if none exist
        #[arg(long)]
        init: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = TriagePaths::new()?;
    let as_of = parse_as_of(cli.as_of.as_deref())?;

    let Some(command) = cli.command else {
        println!("Envelope Triage - month-indexed envelope budgeting");
        println!();
        println!("Run 'triage --help' for usage information.");
        return Ok(());
    };

    if let Commands::Config { init } = command {
        return show_config(&paths, cli.data_dir, init);
    }

    let session = Session::open(paths, cli.data_dir, as_of)?;

    match command {
        Commands::Ledger { month, output, all } => {
            handle_ledger_command(&session, month, output, all)?;
        }
        Commands::Metrics { month, json } => {
            handle_metrics_command(&session, month, json)?;
        }
        Commands::Rebalance { month } => {
            handle_rebalance_command(&session, month)?;
        }
        Commands::Whatif {
            month,
            queue,
            rebalance,
        } => {
            handle_whatif_command(&session, month, queue, rebalance)?;
        }
        Commands::Export { format, output } => {
            handle_export_command(&session, format, output)?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn show_config(paths: &TriagePaths, data_dir: Option<PathBuf>, init: bool) -> Result<()> {
    let settings = Settings::load_or_create(paths)?;

    if init {
        if paths.is_initialized() {
            println!("Settings already exist at: {}", paths.settings_file().display());
        } else {
            settings.save(paths)?;
            std::fs::create_dir_all(settings.resolve_data_dir(paths))?;
            println!("Wrote default settings to: {}", paths.settings_file().display());
        }
    }

    let data_dir = data_dir.unwrap_or_else(|| settings.resolve_data_dir(paths));
    let budget = &settings.budget;

    println!("Envelope Triage Configuration");
    println!("=============================");
    println!("Config directory: {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Data directory:   {}", data_dir.display());
    println!();
    println!("Input files:");
    println!("  Transactions: {}", settings.files.transactions);
    println!("  Allocations:  {}", settings.files.allocations);
    println!("  Transfers:    {}", settings.files.transfers);
    println!("  Balances:     {}", settings.files.balances);
    println!();
    println!("Budget:");
    println!("  Start date:        {}", budget.budget_start_date);
    println!(
        "  Expected income:   {}",
        budget.expected_monthly_income.format_with_symbol(&settings.currency_symbol)
    );
    println!("  Income categories: {}", join(&budget.income_categories));
    println!("  Recurring:         {}", join(&budget.recurring_envelopes));
    println!("  Variable:          {}", join(&budget.variable_envelopes));
    println!("  Health exclusions: {}", join(&budget.health_exclusions));
    println!("  Untracked:         {}", join(&budget.untracked_exclusions));
    println!("  Track unbudgeted:  {}", budget.track_unbudgeted);

    Ok(())
}

fn join(names: &std::collections::BTreeSet<String>) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
