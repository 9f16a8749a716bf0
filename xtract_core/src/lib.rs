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

use serde::{Deserialize, Serialize};

pub mod error;
pub mod extractor;
pub mod logger;
pub mod matcher;
pub mod render;
pub mod scope;
pub mod store;
pub mod tap;

pub use error::{Error, Result};
pub use extractor::Extractor;
pub use logger::{LogSink, SharedSink, shared_sink};
pub use matcher::TagMatcher;
pub use scope::ScopeTracker;
pub use store::ResponseStore;
pub use tap::{LogTap, TapGuard};

/// Conversation scope identifier (e.g. a chat group id). Opaque: the core
/// only ever compares scopes for equality.
pub type ScopeId = String;

/// Literal prefix the character host puts in front of every raw model
/// response it emits at debug level.
pub const MODEL_RESPONSE_PREFIX: &str = "model response: ";

/// Placeholder in an output template replaced by the display name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Placeholder in an output template replaced by the extracted content.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Default output template when none is configured or the configured one is
/// missing a placeholder.
pub const DEFAULT_TEMPLATE: &str = "{name}在想：\n{content}";

/// A configured markup tag plus the template used to render its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagSpec {
    /// Tag name without angle brackets, e.g. `think`.
    pub tag: String,
    /// Output template containing `{name}` and `{content}` placeholders.
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl TagSpec {
    /// Create a spec with the default template.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            template: default_template(),
        }
    }

    /// Set the output template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// A tag name must be a valid markup identifier: non-empty, no whitespace.
    #[must_use]
    pub fn is_valid_tag(tag: &str) -> bool {
        !tag.is_empty() && !tag.chars().any(char::is_whitespace)
    }

    /// Whether the template carries both substitution placeholders.
    #[must_use]
    pub fn has_placeholders(template: &str) -> bool {
        template.contains(NAME_PLACEHOLDER) && template.contains(CONTENT_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_validity() {
        assert!(TagSpec::is_valid_tag("think"));
        assert!(TagSpec::is_valid_tag("Inner_Voice"));
        assert!(!TagSpec::is_valid_tag(""));
        assert!(!TagSpec::is_valid_tag("two words"));
        assert!(!TagSpec::is_valid_tag("tab\there"));
    }

    #[test]
    fn template_placeholder_check() {
        assert!(TagSpec::has_placeholders(DEFAULT_TEMPLATE));
        assert!(!TagSpec::has_placeholders("{name} only"));
        assert!(!TagSpec::has_placeholders("{content} only"));
    }

    #[test]
    fn spec_defaults_to_template() {
        let spec = TagSpec::new("think");
        assert_eq!(spec.template, DEFAULT_TEMPLATE);

        let spec = TagSpec::new("mood").with_template("{name}: {content}");
        assert_eq!(spec.template, "{name}: {content}");
    }
}
