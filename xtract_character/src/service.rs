//! Character reply service.
//!
//! Mirrors the host contract the extractor relies on: registered collectors
//! hear about each turn before the model runs, and the raw model response is
//! emitted through the shared sink at debug level, prefixed with
//! `model response: `, before the reply is returned to the caller.

use crate::{ChatMessage, ChatParams, ChatProvider, Role};
use chrono::Utc;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;
use xtract_core::{MODEL_RESPONSE_PREFIX, SharedSink, logger};

type Collector = Box<dyn Fn(&str) + Send + Sync>;

/// Configuration for the character pipeline.
#[derive(Debug, Clone)]
pub struct CharacterOptions {
    /// Model name; empty means "whatever the provider calls its default".
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

/// The character host: provider-backed replies plus an observable log stream.
pub struct CharacterService<P> {
    provider: P,
    options: CharacterOptions,
    logger: SharedSink,
    collectors: Mutex<Vec<Collector>>,
}

impl<P: ChatProvider> CharacterService<P> {
    #[must_use]
    pub fn new(
        provider: P,
        mut options: CharacterOptions,
        sink: Arc<dyn xtract_core::LogSink>,
    ) -> Self {
        if options.model.is_empty() {
            options.model = provider.default_model().to_string();
        }

        Self {
            provider,
            options,
            logger: logger::shared_sink(sink),
            collectors: Mutex::new(Vec::new()),
        }
    }

    /// The swappable logger cell. This is what an observer wraps.
    #[must_use]
    pub const fn logger(&self) -> &SharedSink {
        &self.logger
    }

    /// Register a callback invoked with the scope id when a turn begins.
    pub fn collect(&self, callback: impl Fn(&str) + Send + Sync + 'static) {
        self.collectors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    fn announce_turn(&self, scope: &str) {
        let collectors = self
            .collectors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for callback in collectors.iter() {
            callback(scope);
        }
    }

    fn emit_debug(&self, line: String) {
        logger::current_sink(&self.logger).debug(&[line]);
    }

    /// Produce a reply for `scope`.
    ///
    /// Collectors are announced before the provider call, so the turn-start
    /// signal always precedes the response emission for the same turn.
    pub async fn reply(&self, scope: &str, user_text: &str) -> anyhow::Result<String> {
        self.announce_turn(scope);

        let messages = [
            ChatMessage {
                role: Role::System,
                content: self.options.system_prompt.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: user_text.to_string(),
            },
        ];

        let params = ChatParams {
            model: self.options.model.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let started = Utc::now();
        let reply = self.provider.chat(&messages, &params).await?;
        let elapsed_ms = (Utc::now() - started).num_milliseconds();

        self.emit_debug(format!("{MODEL_RESPONSE_PREFIX}{}", reply.content));
        if let Some(usage) = reply.usage {
            self.emit_debug(format!(
                "usage: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ));
        }

        info!("[{scope}] character reply in {elapsed_ms}ms");
        Ok(reply.content)
    }
}
