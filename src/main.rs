//! `guardian` command line: runs the inventory operations for one account.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use guardian::core::config::Config;
use guardian::core::logging::init_logging;
use guardian::items::types::ClassType;
use guardian::loadout::orchestrator::{RealizationReport, StepOutcome};
use guardian::lookup::{DefinitionTable, Destination, ItemLookup};
use guardian::operations::{
    count_item, equip_max_light, transfer_item, unload_engrams, TransferCommand, TransferReport,
};
use guardian::remote::{BungieClient, ClientPool, InventoryService};
use guardian::{GuardianResult, InputError};

#[derive(Parser)]
#[command(name = "guardian")]
#[command(about = "Moves and equips gear across your characters and vault")]
struct Cli {
    /// Configuration file (default: <config dir>/guardian/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OAuth access token of the player
    #[arg(long, env = "BUNGIE_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    /// Log level or filter directives, overrides the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Equip the highest-power gear on a character
    MaxLight {
        /// Class to equip (default: most recently played character)
        #[arg(long)]
        class: Option<String>,
    },

    /// Move an item between characters and the vault
    Transfer {
        /// Item name as spoken
        item: String,

        /// Destination: vault, titan, hunter or warlock
        #[arg(long)]
        to: Option<String>,

        /// Source to take from (default: everywhere but the destination)
        #[arg(long)]
        from: Option<String>,

        /// How many to move (default: all)
        #[arg(long, allow_negative_numbers = true)]
        quantity: Option<i64>,
    },

    /// Count an item on every character and in the vault
    Count {
        /// Item name as spoken
        item: String,
    },

    /// Send every engram on every character to the vault
    UnloadEngrams,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("guardian: {}", err);
            return ExitCode::FAILURE;
        }
    };
    init_logging(
        cli.log_level.as_deref().unwrap_or(&config.log_level),
        cli.json_logs,
    );

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("guardian: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &Config) -> GuardianResult<()> {
    // Engrams are found by bucket alone; everything else needs tiers, classes and names.
    let lookup: Arc<dyn ItemLookup> = match (&cli.command, &config.definitions_path) {
        (Command::UnloadEngrams, None) => Arc::new(DefinitionTable::default()),
        (Command::UnloadEngrams, Some(path)) => Arc::new(DefinitionTable::load(path)?),
        _ => Arc::new(DefinitionTable::load_required(
            config.definitions_path.as_deref(),
        )?),
    };
    let pool = Arc::new(ClientPool::from_addresses(
        &config.local_addresses,
        config.request_timeout(),
    ));
    let client = BungieClient::from_config(config, pool, cli.token, Arc::clone(&lookup))?;
    let account = client.current_account()?;

    match cli.command {
        Command::MaxLight { class } => {
            let class = class.as_deref().map(parse_class).transpose()?;
            let report = equip_max_light(&client, &config.retry, &account, class)?;
            print_realization(&report);
        }
        Command::Transfer {
            item,
            to,
            from,
            quantity,
        } => {
            let command =
                TransferCommand::parse(&item, quantity, from.as_deref(), to.as_deref())?;
            let report = transfer_item(
                &client,
                lookup.as_ref(),
                &config.retry,
                &account,
                &command,
            )?;
            print_transfer(&item, &report);
        }
        Command::Count { item } => {
            let count = count_item(&client, lookup.as_ref(), &account, &item)?;
            println!("{}: {}", item, count);
        }
        Command::UnloadEngrams => {
            let report = unload_engrams(&client, &config.retry, &account)?;
            print_transfer("engrams", &report);
        }
    }
    Ok(())
}

fn parse_class(name: &str) -> Result<ClassType, InputError> {
    match Destination::parse(name)? {
        Destination::Class(class) => Ok(class),
        Destination::Vault => Err(InputError::UnknownClass(name.to_string())),
    }
}

fn print_realization(report: &RealizationReport) {
    println!(
        "Equipped {} slot(s), projected power {:.1} (run {})",
        report.slots_realized(),
        report.projected_power,
        report.run_id
    );
    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Succeeded { attempts } => {
                println!("  {:<8} {:<11} ok ({} attempt(s))", step.phase, step.slot, attempts)
            }
            StepOutcome::Skipped { reason } => {
                println!("  {:<8} {:<11} skipped: {}", step.phase, step.slot, reason)
            }
            StepOutcome::Failed { attempts, error } => println!(
                "  {:<8} {:<11} FAILED after {} attempt(s): {}",
                step.phase, step.slot, attempts, error
            ),
        }
    }
    for slot in &report.unassigned {
        println!("  {:<8} {:<11} nothing eligible", "-", slot);
    }
}

fn print_transfer(what: &str, report: &TransferReport) {
    match report.requested {
        Some(requested) => println!("Moved {} of {} requested {}", report.moved, requested, what),
        None => println!("Moved {} {}", report.moved, what),
    }
    for failure in &report.failures {
        println!(
            "  {} x{} from {} failed after {} attempt(s): {}",
            failure.item_hash, failure.quantity, failure.from, failure.attempts, failure.error
        );
    }
}
