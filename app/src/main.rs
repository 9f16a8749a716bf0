#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use xtract_config::Config;
use xtract_core::{Extractor, extractor::default_specs};
use xtract_providers::ZhipuProvider;
use xtract_telegram::ExtractorBot;

#[derive(Parser)]
#[command(name = "xtract")]
#[command(about = "Tag extractor for character chat responses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot
    Telegram {
        /// Bot token (overrides config)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Run the extractor once over a local text (file or stdin)
    Extract {
        /// File to read; stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Build an extractor from config, or from defaults when no config exists.
/// Configuration problems degrade, they never stop the run.
fn build_extractor() -> Extractor {
    Config::load().map_or_else(
        |e| {
            info!("No usable config ({e}), using default tag set");
            Extractor::new("AI", default_specs())
        },
        |config| {
            Extractor::new(
                config.character.display_name.clone(),
                config.extractor.tags.clone(),
            )
        },
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Telegram { token } => {
            let config = Config::load()?;
            info!("Loaded config from ~/xtract/config.json");

            if !config.telegram.enabled {
                anyhow::bail!("Telegram is not enabled in config. Set \"telegram.enabled\": true");
            }

            let token = match token {
                Some(t) => t,
                None if !config.telegram.token.is_empty() => config.telegram.token.clone(),
                None => {
                    anyhow::bail!(
                        "Telegram bot token not configured. Set \"telegram.token\" in config"
                    )
                }
            };

            let provider = ZhipuProvider::new(config.providers.zhipu.api_key.clone());
            let bot = ExtractorBot::new(token, provider, &config)?;

            info!("Telegram bot is running. Press Ctrl+C to stop.");
            bot.run().await?;
        }
        Commands::Extract { file } => {
            let text = read_input(file)?;
            let extractor = build_extractor();

            // One local scope stands in for a chat.
            extractor.on_turn_start("cli");
            extractor.process_response("cli", &text);

            for spec in extractor.specs() {
                println!("{}", extractor.render("cli", &spec.tag));
                println!();
            }
        }
        Commands::Init => {
            Config::create_config()?;
        }
        Commands::Version => {
            println!("xtract {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
