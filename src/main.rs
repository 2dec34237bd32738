//! # DaySlot
//!
//! Discord bot that blocks the day into four 4-hour slots, DMs you when a
//! started task runs out, and turns a nightly habit check-in into a journal
//! post.
//!
//! Usage:
//!   dayslot                          # Serve the interactions endpoint
//!   dayslot serve --skip-register    # Serve without re-registering commands
//!   dayslot register-commands        # Register slash commands and exit
//!   dayslot check-config             # Print the resolved config

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dayslot_channels::discord::commands;
use dayslot_channels::{DiscordRest, SignatureVerifier};
use dayslot_core::config::DaySlotConfig;
use dayslot_gateway::AppState;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dayslot",
    version,
    about = "📅 DaySlot: day slots, task timers and habit journaling on Discord"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (default: ~/.dayslot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the interactions endpoint
    Serve {
        /// Don't register slash commands on startup
        #[arg(long)]
        skip_register: bool,
    },
    /// Register slash commands and exit
    RegisterCommands,
    /// Print the resolved config with secrets masked
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<DaySlotConfig> {
    let mut config = match path {
        Some(path) => DaySlotConfig::load_from(path)?,
        None => DaySlotConfig::load()?,
    };
    config.apply_env()?;
    Ok(config)
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(unset)".into();
    }
    let head: String = secret.chars().take(4).collect();
    format!("{head}****")
}

async fn register(rest: &DiscordRest, config: &DaySlotConfig) -> Result<usize> {
    let definitions = commands::definitions();
    let count = rest
        .register_commands(config.discord.guild_id.as_deref(), &definitions)
        .await?;
    match &config.discord.guild_id {
        Some(guild) => tracing::info!("⚡ Registered {count} commands in guild {guild}"),
        None => tracing::info!("⚡ Registered {count} global commands"),
    }
    Ok(count)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "dayslot=debug,dayslot_gateway=debug,dayslot_scheduler=debug,dayslot_channels=debug,dayslot_db=debug,dayslot_core=debug,tower_http=debug"
    } else {
        "dayslot=info,dayslot_gateway=info,dayslot_scheduler=info,dayslot_channels=info,dayslot_db=info,dayslot_core=info"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command.unwrap_or(Command::Serve { skip_register: false }) {
        Command::CheckConfig => {
            println!("📅 DaySlot v{}", env!("CARGO_PKG_VERSION"));
            println!("   🔑 Bot token:       {}", mask(&config.discord.bot_token));
            println!("   🆔 Application ID:  {}", config.discord.application_id);
            println!("   🔏 Public key:      {}", mask(&config.discord.public_key));
            println!(
                "   🏠 Guild:           {}",
                config.discord.guild_id.as_deref().unwrap_or("(global)")
            );
            println!("   🗄️  Database:        {}", config.database.url);
            println!(
                "   🌐 Endpoint:        http://{}{}",
                config.bind_addr(),
                config.gateway.interactions_path
            );
            println!(
                "   ⏰ Check-in:        {}s answer / {}s journal",
                config.checkin.answer_timeout_secs, config.checkin.journal_timeout_secs
            );
            match config.validate() {
                Ok(()) => println!("\n✅ Config OK"),
                Err(e) => println!("\n⚠️  {e}"),
            }
            Ok(())
        }
        Command::RegisterCommands => {
            config.validate()?;
            let rest = DiscordRest::new(&config.discord);
            register(&rest, &config).await?;
            Ok(())
        }
        Command::Serve { skip_register } => {
            config.validate()?;
            let store = dayslot_db::open_store(&config.database.url)?;
            let rest = Arc::new(DiscordRest::new(&config.discord));
            let verifier = SignatureVerifier::from_hex(&config.discord.public_key)?;

            if skip_register {
                tracing::info!("⏭️ Skipping command registration");
            } else if let Err(e) = register(&rest, &config).await {
                tracing::warn!("⚠️ Command registration failed: {e}");
            }

            let state = AppState::new(config, verifier, store, rest);
            state.timers.restore().await?;

            tracing::info!("📅 DaySlot v{} starting", env!("CARGO_PKG_VERSION"));
            dayslot_gateway::start(state).await
        }
    }
}
