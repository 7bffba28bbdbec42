use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Phrase, Tables};

// ── Annotation cleanup ─────────────────────────────────────────────
//
// After a block is cut out of
//   "Also known as: Snake Plant. Tough and upright."
// the remainder may carry doubled or leading punctuation and spacing.

// ". ." left at the cut; an ellipsis has no gap and is kept
static RE_DOUBLE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:\s+\.)+").unwrap());
static RE_DOUBLE_FULL_STOP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"。(?:\s*。)+").unwrap());
static RE_LEADING_STOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s.。]+").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Sentence endings that need no extra punctuation.
const TERMINALS: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Renders, finds and removes the "also known as" block of a description.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    /// Lowercased abbreviations whose trailing period does not end a block
    abbreviations: HashSet<String>,
}

impl Codec {
    pub fn new(tables: &Tables) -> Self {
        let abbreviations = tables
            .rank_markers
            .iter()
            .filter_map(|m| m.strip_suffix('.'))
            .map(str::to_lowercase)
            .collect();
        Self { abbreviations }
    }

    pub fn encode(&self, value: &str, phrase: &Phrase) -> String {
        format!("{}{}{}", phrase.prefix, value, phrase.suffix)
    }

    /// Value of the first block in `description`, `None` when there is no block.
    pub fn decode(&self, description: &str, phrase: &Phrase) -> Option<String> {
        let start = description.find(&phrase.prefix)? + phrase.prefix.len();
        let rest = &description[start..];
        let value = match self.block_end(rest, phrase) {
            Some(end) => &rest[..end],
            None => rest,
        };
        Some(value.trim().to_string())
    }

    /// Remove the block that renders exactly `value`, joining the text on
    /// either side. `None` unless that block is the first one in
    /// `description`, so a stale or foreign block still goes through
    /// [`Codec::strip`].
    pub fn strip_exact(&self, description: &str, value: &str, phrase: &Phrase) -> Option<String> {
        let block = self.encode(value, phrase);
        let idx = description.find(&block)?;
        if description.find(&phrase.prefix) != Some(idx) {
            return None;
        }
        let after = &description[idx + block.len()..];

        // "Foo.bar" continues the value past the period
        if phrase.suffix == "." && after.chars().next().is_some_and(char::is_alphanumeric) {
            return None;
        }

        let before = description[..idx].trim_end();
        let after = after.trim_start();
        Some(match (before.is_empty(), after.is_empty()) {
            (true, _) => after.to_string(),
            (false, true) => before.to_string(),
            (false, false) => format!("{before} {after}"),
        })
    }

    /// Remove the first block and tidy what is left.
    /// A description without a block is returned unchanged.
    pub fn strip(&self, description: &str, phrase: &Phrase) -> String {
        let Some(idx) = description.find(&phrase.prefix) else {
            return description.to_string();
        };
        let start = idx + phrase.prefix.len();
        let rest = &description[start..];

        // An unterminated block runs to the end of the text
        let cut_to = match self.block_end(rest, phrase) {
            Some(end) => start + end + phrase.suffix.len(),
            None => description.len(),
        };

        let mut remainder = String::with_capacity(description.len());
        remainder.push_str(&description[..idx]);
        remainder.push(' ');
        remainder.push_str(&description[cut_to..]);
        tidy(&remainder)
    }

    /// Byte offset in `rest` of the suffix that closes the block.
    ///
    /// A full-width suffix closes at its first occurrence. A period only
    /// closes when it is not part of an abbreviation such as `var.` or the
    /// `S.` of `S. trifasciata`.
    fn block_end(&self, rest: &str, phrase: &Phrase) -> Option<usize> {
        if phrase.suffix != "." {
            return rest.find(&phrase.suffix);
        }

        rest.match_indices('.').map(|(i, _)| i).find(|&i| {
            let after = &rest[i + 1..];
            if after.chars().next().is_some_and(char::is_alphanumeric) {
                return false;
            }
            let word = rest[..i]
                .rsplit(char::is_whitespace)
                .next()
                .unwrap_or("")
                .trim_start_matches(|c: char| !c.is_alphanumeric());
            let next = after.trim_start().chars().next();
            !self.is_abbreviation(word, next)
        })
    }

    /// `var.` and friends always; a lone capital only before a lowercase
    /// epithet, so "Plan B. Grows fast." still closes after "B".
    fn is_abbreviation(&self, word: &str, next: Option<char>) -> bool {
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.is_uppercase() && next.is_some_and(char::is_lowercase),
            (Some(_), Some(_)) => self.abbreviations.contains(&word.to_lowercase()),
            _ => false,
        }
    }
}

/// Collapse doubled and leading sentence stops and runs of whitespace.
pub fn tidy(text: &str) -> String {
    let text = RE_DOUBLE_PERIOD.replace_all(text, ".");
    let text = RE_DOUBLE_FULL_STOP.replace_all(&text, "。");
    let text = RE_LEADING_STOP.replace(&text, "");
    let text = RE_WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Append the locale's sentence stop unless `text` already ends a sentence.
pub fn ensure_terminal(text: &str, phrase: &Phrase) -> String {
    if text.is_empty() || text.ends_with(TERMINALS) {
        text.to_string()
    } else {
        format!("{text}{}", phrase.suffix)
    }
}
