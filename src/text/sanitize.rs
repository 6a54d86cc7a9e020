use tracing::warn;

use crate::config::{CleanupSettings, Replacement};

use super::roman;

/// Words kept in lowercase by [`capitalize_words`] unless they open the text.
const LOWERCASE_WORDS: [&str; 9] = ["de", "del", "des", "di", "e", "en", "la", "les", "y"];

/// Which replacement table to apply.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Charset {
    /// Tag values shown on screen and written back to files.
    Display,
    /// File and folder names; the result is safe to use as a path component.
    Filesystem,
}

/// Normalizes free text using the configured replacement tables.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    display: Vec<Replacement>,
    filesystem: Vec<Replacement>,
}

impl Sanitizer {
    pub fn new(settings: &CleanupSettings) -> Self {
        Self {
            display: settings.display_chars.clone(),
            filesystem: settings.filesystem_chars.clone(),
        }
    }

    fn table(&self, charset: Charset) -> &[Replacement] {
        match charset {
            Charset::Display => &self.display,
            Charset::Filesystem => &self.filesystem,
        }
    }

    /// Apply the `charset` replacements in order, trim, and optionally
    /// re-title every word.
    pub fn sanitize_text(&self, text: &str, charset: Charset, capitalize: bool) -> String {
        let mut out = text.to_string();
        for replacement in self.table(charset) {
            for src in replacement.src.iter().filter(|s| !s.is_empty()) {
                out = out.replace(src.as_str(), &replacement.dst);
            }
        }
        let out = out.trim();

        if capitalize {
            capitalize_words(out)
        } else {
            out.to_string()
        }
    }

    pub fn display(&self, text: &str, capitalize: bool) -> String {
        self.sanitize_text(text, Charset::Display, capitalize)
    }

    pub fn filesystem(&self, text: &str, capitalize: bool) -> String {
        self.sanitize_text(text, Charset::Filesystem, capitalize)
    }
}

/// Re-title each whitespace separated word and join them with single spaces.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| capitalize_token(&token.to_lowercase(), i == 0))
        .collect::<Vec<String>>()
        .join(" ")
}

fn capitalize_token(token: &str, first: bool) -> String {
    if LOWERCASE_WORDS.contains(&token) {
        return if first {
            upper_first(token)
        } else {
            token.to_string()
        };
    }

    if token.chars().count() == 1 || token == "ost" || roman::is_valid(token) {
        return token.to_uppercase();
    }

    // "I." style movement numbers in classical titles
    if let Some(numeral) = token.strip_suffix('.') {
        if roman::is_valid(numeral) {
            return format!("{}.", numeral.to_uppercase());
        }
    }

    if token.starts_with(['(', '[', '{']) {
        let letter = token
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_lowercase());
        return match letter {
            Some((idx, c)) => {
                let mut out = String::with_capacity(token.len());
                out.push_str(&token[..idx]);
                out.push(c.to_ascii_uppercase());
                out.push_str(&token[idx + c.len_utf8()..]);
                out
            }
            None => token.to_string(),
        };
    }

    upper_first(token)
}

fn upper_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalize a numeric tag: `"5/12"` keeps `5`. Unparseable input is logged
/// and yields `None`.
pub fn sanitize_number(text: &str) -> Option<u32> {
    let head = text.split('/').next().unwrap_or(text).trim();
    match head.parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("cannot parse number from {text:?}: {e}");
            None
        }
    }
}
