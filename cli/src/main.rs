//! `ledger`: inspect and settle a JSON snapshot of ledger entries
//!
//! The snapshot is a JSON array of ledger entries (the store's row format).
//! Reports are printed to stdout as pretty JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use settlement_ledger_core::core::parse_amount;
use settlement_ledger_core::{InMemoryLedgerStore, LedgerConfig, LedgerEngine, LedgerEntry, NoopCache};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Group expense ledger reports
#[derive(Parser, Debug)]
#[command(name = "ledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger snapshot (JSON array of entries)
    #[arg(short, long, global = true, default_value = "ledger.json")]
    snapshot: PathBuf,

    /// Optional engine config (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Who still owes whom, per debtor
    Owed {
        #[arg(short, long)]
        group: String,
    },

    /// Flat list of netted debts
    Debts {
        #[arg(short, long)]
        group: String,
    },

    /// Gives/gets per member and counterparty
    Balances {
        #[arg(short, long)]
        group: String,
    },

    /// Spend share per member
    Shares {
        #[arg(short, long)]
        group: String,
    },

    /// Draft a split of an amount among members
    Plan {
        /// Amount to split, e.g. "300" or "12.50"
        #[arg(short, long)]
        total: String,

        /// equal, percentage, fraction or custom
        #[arg(short, long, default_value = "equal")]
        method: String,

        /// Member IDs (repeat the flag)
        #[arg(long = "member", required = true)]
        members: Vec<String>,
    },

    /// Settle one member's entry and write the snapshot back
    Settle {
        /// Member performing the settlement (must be the payer)
        #[arg(long)]
        actor: String,

        #[arg(long)]
        expense: String,

        #[arg(long)]
        member: String,
    },

    /// Settle both directions between two members and write the snapshot back
    SettleBetween {
        #[arg(long)]
        actor: String,

        #[arg(short, long)]
        group: String,

        a: String,
        b: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    let Some(path) = path else {
        return Ok(LedgerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn load_snapshot(path: &Path) -> Result<Vec<LedgerEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
}

fn save_snapshot(path: &Path, entries: &[LedgerEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let entries = load_snapshot(&cli.snapshot)?;
    info!(rows = entries.len(), snapshot = %cli.snapshot.display(), "snapshot loaded");

    let store = InMemoryLedgerStore::with_entries(entries).context("loading snapshot rows")?;
    let engine = LedgerEngine::with_cache(store, NoopCache, config)?;

    match cli.command {
        Commands::Owed { group } => print_json(&engine.compute_owed_records(&group)?),
        Commands::Debts { group } => print_json(&engine.compute_net_debts(&group)?),
        Commands::Balances { group } => print_json(&engine.compute_balance_summary(&group)?),
        Commands::Shares { group } => print_json(&engine.compute_shares(&group)?),
        Commands::Plan {
            total,
            method,
            members,
        } => {
            let total = parse_amount(&total).with_context(|| format!("parsing total {:?}", total))?;
            print_json(&engine.plan_split(total, &method, &members)?)
        }
        Commands::Settle {
            actor,
            expense,
            member,
        } => {
            let entry = engine.settle_entry(&actor, &expense, &member)?;
            save_snapshot(&cli.snapshot, &engine.store().snapshot()?)?;
            print_json(&entry)
        }
        Commands::SettleBetween { actor, group, a, b } => {
            let outcome = engine.settle_between_users(&actor, &group, &a, &b)?;
            save_snapshot(&cli.snapshot, &engine.store().snapshot()?)?;
            print_json(&outcome)
        }
    }
}
