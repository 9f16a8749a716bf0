//! User-facing rendering of cached extractions.

use crate::{CONTENT_PLACEHOLDER, NAME_PLACEHOLDER, TagSpec};

/// Reply when the caller's scope cannot be resolved.
pub const NO_SESSION_MESSAGE: &str = "无法获取会话信息";

/// Reply when nothing is cached for a tag. Normal outcome, not an error.
#[must_use]
pub fn no_content_message(tag: &str) -> String {
    format!("没有 <{tag}> 标签包裹的信息")
}

/// Substitute `name` and `content` into a template.
///
/// Literal, first-occurrence-only replacement: only the template's own
/// placeholder is touched, so a `{content}` appearing verbatim inside the
/// extracted content survives untouched.
#[must_use]
pub fn fill_template(template: &str, name: &str, content: &str) -> String {
    template
        .replacen(NAME_PLACEHOLDER, name, 1)
        .replacen(CONTENT_PLACEHOLDER, content, 1)
}

/// Enumerate configured tags and their templates, independent of cache state.
#[must_use]
pub fn list_tags(specs: &[TagSpec]) -> String {
    if specs.is_empty() {
        return "当前没有配置任何标签。".to_string();
    }

    let lines: Vec<String> = specs
        .iter()
        .map(|spec| format!("- <{}>：{}", spec.tag, spec.template.replace('\n', "\\n")))
        .collect();

    format!("当前配置的标签:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_both_placeholders() {
        let got = fill_template("{name}在想：\n{content}", "AI", "hello");
        assert_eq!(got, "AI在想：\nhello");
    }

    #[test]
    fn substitution_is_not_recursive() {
        // "{content}" appearing inside the extracted text is data, not a
        // placeholder; only the template's own occurrence is replaced.
        let got = fill_template("{name}在想：\n{content}", "AI", "say {content} twice");
        assert_eq!(got, "AI在想：\nsay {content} twice");
    }

    #[test]
    fn only_first_placeholder_occurrence_is_replaced() {
        let got = fill_template("{content} / {content}", "AI", "x");
        assert_eq!(got, "x / {content}");
    }

    #[test]
    fn listing_shows_every_tag() {
        let specs = vec![
            TagSpec::new("think"),
            TagSpec::new("mood").with_template("{name}: {content}"),
        ];
        let listing = list_tags(&specs);
        assert!(listing.contains("<think>"));
        assert!(listing.contains("<mood>"));
        assert!(listing.contains("{name}: {content}"));
    }

    #[test]
    fn empty_listing_has_fallback_text() {
        assert_eq!(list_tags(&[]), "当前没有配置任何标签。");
    }
}
