#![forbid(unsafe_code)]
//! Inspect and seed the lockup params of a node's param store

use clap::{Parser, Subcommand};
use colored::*;
use lockup::config::{load_config, load_config_from, Config};
use lockup::context::Context;
use lockup::error::LockupError;
use lockup::lockup::{export_genesis, init_genesis, GenesisState, LockupKeeper, Params};
use lockup::persistence::SqliteParamStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ./config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the current lockup params
    Show,
    /// Validates a genesis file and writes its params to the store
    InitGenesis {
        /// JSON genesis file; the default genesis for the configured native
        /// denom is used when omitted
        file: Option<PathBuf>,
    },
    /// Prints the stored params as a JSON genesis
    ExportGenesis,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    tracing_subscriber::fmt()
        .with_max_level(config.logging.tracing_level()?)
        .with_writer(std::io::stderr)
        .init();

    let ctx = open_context(&config)?;
    let keeper = LockupKeeper::default();

    match &cli.command {
        Commands::Show => show(&ctx, &keeper)?,
        Commands::InitGenesis { file } => {
            let genesis = match file {
                Some(path) => {
                    let contents = std::fs::read_to_string(path)
                        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
                    serde_json::from_str::<GenesisState>(&contents)
                        .map_err(|e| format!("Failed to parse genesis: {}", e))?
                }
                None => GenesisState::new(Params::with_native_denom(&config.chain.native_denom)),
            };
            init_genesis(&ctx, &keeper, &genesis)?;
            println!("{}", "✅ Lockup genesis written".bright_green().bold());
            print_params(&genesis.params);
        }
        Commands::ExportGenesis => {
            let genesis = export_genesis(&ctx, &keeper)?;
            println!("{}", serde_json::to_string_pretty(&genesis)?);
        }
    }

    Ok(())
}

fn open_context(config: &Config) -> Result<Context, LockupError> {
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteParamStore::open(&config.database.path)?;
    Ok(Context::new(Arc::new(store), config.chain.chain_id.clone())
        .with_account_prefix(config.chain.account_prefix.clone()))
}

fn show(ctx: &Context, keeper: &LockupKeeper) -> Result<(), LockupError> {
    println!("{}", format!("Chain: {}", ctx.chain_id()).cyan());
    match keeper.params(ctx) {
        Ok(params) => {
            print_params(&params);
            Ok(())
        }
        Err(LockupError::NotFound { key }) => {
            println!(
                "{}",
                format!("⚠️  Lockup params not initialized ({} is unset)", key).yellow()
            );
            println!("{}", "💡 Run 'lockup-params init-genesis' first".yellow());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn print_params(params: &Params) {
    let status = if params.locked {
        "LOCKED".bright_red().bold()
    } else {
        "unlocked".bright_green().bold()
    };
    println!("Status: {}", status);

    println!("{}", "Exempt addresses:".bright_white().underline());
    if params.lock_exempt.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for address in &params.lock_exempt {
        println!("  - {}", address);
    }

    println!("{}", "Locked token denoms:".bright_white().underline());
    for denom in &params.locked_token_denoms {
        println!("  - {}", denom.bright_yellow());
    }

    println!("{}", "Locked message types:".bright_white().underline());
    for type_url in &params.locked_message_types {
        println!("  - {}", type_url);
    }
}
