//! Plugin lifecycle object tying the pieces together.
//!
//! An [`Extractor`] owns the compiled tag set, the response cache, and the
//! active-scope cell, so tests (and hosts) can construct and drop independent
//! instances instead of reaching for free-floating globals.

use crate::logger::SharedSink;
use crate::matcher::TagMatcher;
use crate::render;
use crate::scope::ScopeTracker;
use crate::store::ResponseStore;
use crate::tap::{self, TapGuard};
use crate::{DEFAULT_TEMPLATE, TagSpec};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Default tag set when configuration supplies none.
#[must_use]
pub fn default_specs() -> Vec<TagSpec> {
    vec![TagSpec::new("think")]
}

struct TagEntry {
    spec: TagSpec,
    matcher: TagMatcher,
}

/// Log-stream tag extractor with a per-scope latest-value cache.
pub struct Extractor {
    display_name: String,
    entries: Vec<TagEntry>,
    store: ResponseStore,
    tracker: ScopeTracker,
}

impl Extractor {
    /// Build an extractor from configuration.
    ///
    /// Configuration defects are never fatal: invalid tag names are skipped,
    /// templates missing a placeholder fall back to the default template, and
    /// an empty surviving tag set falls back to `<think>`.
    #[must_use]
    pub fn new(display_name: impl Into<String>, specs: Vec<TagSpec>) -> Self {
        let mut entries = Self::compile(specs);
        if entries.is_empty() {
            warn!("没有可用的标签配置，回退到默认标签 <think>");
            entries = Self::compile(default_specs());
        }

        Self {
            display_name: display_name.into(),
            entries,
            store: ResponseStore::new(),
            tracker: ScopeTracker::new(),
        }
    }

    fn compile(specs: Vec<TagSpec>) -> Vec<TagEntry> {
        specs
            .into_iter()
            .filter_map(|mut spec| match TagMatcher::new(&spec.tag) {
                Ok(matcher) => {
                    if !TagSpec::has_placeholders(&spec.template) {
                        warn!(
                            "标签 <{}> 的模板缺少占位符，使用默认模板",
                            spec.tag
                        );
                        spec.template = DEFAULT_TEMPLATE.to_string();
                    }
                    Some(TagEntry { spec, matcher })
                }
                Err(e) => {
                    warn!("忽略无效标签: {e}");
                    None
                }
            })
            .collect()
    }

    /// Configured tag specs, in configuration order.
    #[must_use]
    pub fn specs(&self) -> Vec<TagSpec> {
        self.entries.iter().map(|e| e.spec.clone()).collect()
    }

    /// Display name substituted into output templates.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The active-scope cell.
    #[must_use]
    pub const fn tracker(&self) -> &ScopeTracker {
        &self.tracker
    }

    /// The response cache.
    #[must_use]
    pub const fn store(&self) -> &ResponseStore {
        &self.store
    }

    /// A new turn began for `scope`.
    pub fn on_turn_start(&self, scope: &str) {
        info!("[collect] 开始处理群组: {scope}");
        self.tracker.on_turn_start(scope);
    }

    /// Run every configured matcher over one response and replace the
    /// scope's cache wholesale with the results.
    pub fn process_response(&self, scope: &str, response: &str) {
        let mut extracted = HashMap::new();
        for entry in &self.entries {
            if let Some(content) = entry.matcher.extract(response) {
                extracted.insert(entry.spec.tag.clone(), content);
            }
        }
        self.store.replace_scope(scope, extracted);
    }

    /// Remove every configured tag's spans from `text`.
    ///
    /// Hosts use this on the outgoing reply so extracted content is only
    /// reachable through the query commands.
    #[must_use]
    pub fn strip_all(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for entry in &self.entries {
            stripped = entry.matcher.strip(&stripped);
        }
        stripped
    }

    /// Render the cached content for (`scope`, `tag`) through its template.
    ///
    /// Absence — unknown scope, unknown tag, or a response that carried no
    /// such span — renders as the fixed "no content" message.
    #[must_use]
    pub fn render(&self, scope: &str, tag: &str) -> String {
        let Some(entry) = self.entries.iter().find(|e| e.spec.tag == tag) else {
            return render::no_content_message(tag);
        };

        self.store.get(scope, tag).map_or_else(
            || render::no_content_message(tag),
            |content| render::fill_template(&entry.spec.template, &self.display_name, &content),
        )
    }

    /// Human-readable enumeration of the configured tags and templates.
    #[must_use]
    pub fn list(&self) -> String {
        render::list_tags(&self.specs())
    }

    /// Wrap the host's log sink, if the host exposes one.
    ///
    /// With no sink cell available the tap is not installed and extraction
    /// stays inert for the session; queries keep answering "no content".
    pub fn install(extractor: &Arc<Self>, shared: Option<&SharedSink>) -> Option<TapGuard> {
        match shared {
            Some(shared) => {
                let guard = tap::install(shared, Arc::clone(extractor));
                info!("成功拦截角色服务的 debug 日志");
                Some(guard)
            }
            None => {
                warn!("无法拦截角色服务日志，logger 不存在或形状不符，提取功能停用");
                None
            }
        }
    }
}
