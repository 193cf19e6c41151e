use std::sync::LazyLock;

use regex::Regex;

/// Characters Telegram MarkdownV2 treats as markup outside entities.
const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

// An escaped character, or a bare bold marker.
static MARKUP: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\\([\s\S])|\*").ok());

/// Escape user or model text for a MarkdownV2 message. Each reserved
/// character is prefixed once; already-escaped input gets escaped again.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Turn a MarkdownV2 message back into plain text: unescape `\x` and drop
/// unescaped `*` markers.
pub fn strip_markup(text: &str) -> String {
    match MARKUP.as_ref() {
        Some(re) => re
            .replace_all(text, |caps: &regex::Captures<'_>| {
                caps.get(1).map_or(String::new(), |m| m.as_str().to_string())
            })
            .into_owned(),
        None => text.replace(['*', '\\'], ""),
    }
}

/// `*text*` with `text` escaped.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}
