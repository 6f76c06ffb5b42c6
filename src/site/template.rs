//! Placeholder substitution and escaping for generated pages.
//!
//! Templates use `{{key}}` placeholders, replaced in a single pass. Missing
//! keys resolve to the empty string. `{{{{` is a literal `{{`. Substituted
//! values are never re-interpolated.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching `{{key}}` placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("valid regex"));

/// Sentinel marker for escaped `{{{{` sequences.
const ESCAPE_SENTINEL: &str = "\x00ESC_BRACES\x00";

/// Values for a template, keyed by placeholder name.
pub type TemplateVars = HashMap<&'static str, String>;

/// Substitutes every `{{key}}` in `template` from `vars`.
#[must_use]
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let working = template.replace("{{{{", ESCAPE_SENTINEL);

    let result = PLACEHOLDER_RE
        .replace_all(&working, |caps: &regex::Captures| {
            let key = &caps[1];
            vars.get(key).cloned().unwrap_or_else(|| {
                tracing::trace!(key, "template placeholder has no value");
                String::new()
            })
        })
        .to_string();

    result.replace(ESCAPE_SENTINEL, "{{")
}

/// Placeholder names used in `template`, in order of first appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<String> {
    let working = template.replace("{{{{", ESCAPE_SENTINEL);
    let mut out: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(&working) {
        let key = caps[1].to_string();
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

/// Escapes text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for XML character data and attributes.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    escape_html(text).replace("&#39;", "&apos;")
}

/// Encodes a value as a JavaScript string literal safe inside `<script>`.
#[must_use]
pub fn js_string(text: &str) -> String {
    let encoded = serde_json::Value::from(text).to_string();
    encoded
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Encodes a list of strings as a JavaScript array literal.
#[must_use]
pub fn js_string_array(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| js_string(s)).collect();
    format!("[{}]", inner.join(", "))
}
