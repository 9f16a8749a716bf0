//! Tag span matching over raw model-response text.
//!
//! A matcher is compiled once per configured tag and then applied to every
//! response. Matching is case-insensitive on the tag name, spans newlines,
//! and is non-greedy per span while still collecting every span in the text.

use crate::{Error, Result, TagSpec};
use regex::Regex;

/// Compiled matcher for one markup tag.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    tag: String,
    pattern: Regex,
}

impl TagMatcher {
    /// Compile a matcher for `tag`.
    ///
    /// Fails if the tag name is empty or contains whitespace.
    pub fn new(tag: &str) -> Result<Self> {
        if !TagSpec::is_valid_tag(tag) {
            return Err(Error::InvalidTag(tag.to_string()));
        }

        let escaped = regex::escape(tag);
        // (?is): case-insensitive tag names, content may span newlines.
        // Non-greedy body so each span ends at the nearest closing tag.
        let pattern = Regex::new(&format!("(?is)<{escaped}>(.*?)</{escaped}>"))?;

        Ok(Self {
            tag: tag.to_string(),
            pattern,
        })
    }

    /// The tag name this matcher was compiled for.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Remove every well-formed span of this tag (markup included) from
    /// `text`. Used by hosts that extract a tag precisely so the user never
    /// sees it inline.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").into_owned()
    }

    /// Extract every well-formed span of this tag from `text`.
    ///
    /// Each span's inner text is trimmed; spans are joined with a blank line
    /// in document order. Returns `None` when nothing matched or when the
    /// joined result is all whitespace — absence and empty collapse to the
    /// same outcome. Unterminated or mismatched markup simply does not match.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<String> {
        let spans: Vec<&str> = self
            .pattern
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .collect();

        if spans.is_empty() {
            return None;
        }

        let joined = spans.join("\n\n");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}
