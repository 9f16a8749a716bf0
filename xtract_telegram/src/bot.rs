use crate::{Command, Result};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use teloxide::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};
use xtract_character::{CharacterOptions, CharacterService, TracingSink};
use xtract_config::Config;
use xtract_core::{Extractor, TagSpec, tap::TapGuard};
use xtract_providers::ZhipuProvider;

/// Telegram bot wiring the character service and the tag extractor together.
pub struct ExtractorBot {
    /// Teloxide bot instance
    pub bot: Bot,
    /// Character reply pipeline (the observed host)
    pub character: Arc<CharacterService<ZhipuProvider>>,
    /// Tag extractor plugin
    pub extractor: Arc<Extractor>,
    /// Configured tag specs, for command parsing and registration
    pub specs: Vec<TagSpec>,
    /// Allowed chat IDs; empty means everyone
    allowed_chats: Vec<i64>,
    /// Installed log tap, restored on shutdown
    tap: Arc<Mutex<Option<TapGuard>>>,
}

impl ExtractorBot {
    /// Create the bot and install the extractor over the character logger.
    pub fn new(token: String, provider: ZhipuProvider, config: &Config) -> Result<Self> {
        let allowed_chats = config
            .telegram
            .allow_from
            .iter()
            .filter_map(|s| s.parse::<i64>().ok())
            .collect();

        let extractor = Arc::new(Extractor::new(
            config.character.display_name.clone(),
            config.extractor.tags.clone(),
        ));
        let specs = extractor.specs();

        let character = Arc::new(CharacterService::new(
            provider,
            CharacterOptions {
                model: config.character.model.clone(),
                system_prompt: config.character.system_prompt.clone(),
                max_tokens: config.character.max_tokens,
                temperature: config.character.temperature,
            },
            Arc::new(TracingSink),
        ));

        // Turn-start wiring: the character announces the scope it is about
        // to answer, the extractor remembers it until the response lands.
        {
            let extractor = Arc::clone(&extractor);
            character.collect(move |scope| extractor.on_turn_start(scope));
        }

        let tap = Extractor::install(&extractor, Some(character.logger()));

        Ok(Self {
            bot: Bot::new(token),
            character,
            extractor,
            specs,
            allowed_chats,
            tap: Arc::new(Mutex::new(tap)),
        })
    }

    /// Check if a chat is allowed to talk to the character.
    #[must_use]
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }

    /// Restore the original character logger. Idempotent.
    pub fn teardown(&self) {
        let guard = self
            .tap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(guard) = guard {
            guard.restore();
            info!("Restored original character logger");
        }
    }

    /// Test connection to the Telegram API, retrying with a growing delay
    /// until it succeeds.
    async fn test_connection(&self) -> Result<()> {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(me) => {
                    info!(
                        "Connected to Telegram API: @{} (id: {})",
                        me.user
                            .username
                            .clone()
                            .unwrap_or_else(|| "no username".to_string()),
                        me.user.id
                    );
                    return Ok(());
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);
                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");
                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run the bot until shutdown, then restore the character logger.
    pub async fn run(self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::types::Update;

        self.test_connection().await?;

        self.bot
            .set_my_commands(Command::bot_commands(&self.specs))
            .await?;

        let bot = self.bot.clone();

        let schema = dptree::entry().branch(Update::filter_message().endpoint({
            let bot_clone = self.clone();
            move |_bot: Bot, msg: teloxide::types::Message| {
                let bot_clone = bot_clone.clone();
                async move { crate::handler::handle_message(bot_clone, msg).await }
            }
        }));

        Dispatcher::builder(bot, schema)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        self.teardown();
        Ok(())
    }
}

impl Clone for ExtractorBot {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            character: Arc::clone(&self.character),
            extractor: Arc::clone(&self.extractor),
            specs: self.specs.clone(),
            allowed_chats: self.allowed_chats.clone(),
            tap: Arc::clone(&self.tap),
        }
    }
}
