use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::tables;

// ── Curated tables ───────────────────────────────────────────────────────

/// The curated word lists and phrase table the engine runs on.
///
/// Defaults come from [`crate::tables`]. A JSON file passed with `--tables`
/// replaces whichever fields it names and keeps the rest.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tables {
    pub stopwords: Vec<String>,
    pub common_first_words: Vec<String>,
    pub known_genera: Vec<String>,
    pub synonym_markers: Vec<String>,
    pub rank_markers: Vec<String>,
    pub phrases: Vec<Phrase>,
    pub default_locale: String,
    pub category_limit: usize,
}

impl Default for Tables {
    fn default() -> Self {
        fn owned(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            stopwords: owned(tables::STOPWORDS),
            common_first_words: owned(tables::COMMON_FIRST_WORDS),
            known_genera: owned(tables::KNOWN_GENERA),
            synonym_markers: owned(tables::SYNONYM_MARKERS),
            rank_markers: owned(tables::RANK_MARKERS),
            phrases: tables::AKA_PHRASES
                .iter()
                .map(|(locale, prefix, suffix)| Phrase {
                    locale: locale.to_string(),
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                })
                .collect(),
            default_locale: tables::DEFAULT_LOCALE.to_string(),
            category_limit: tables::CATEGORY_SEGMENT_LIMIT,
        }
    }
}

impl Tables {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lowercased stopword set, for whole-token comparisons.
    pub fn stopword_set(&self) -> Stopwords {
        Stopwords(self.stopwords.iter().map(|s| s.to_lowercase()).collect())
    }

    pub fn phrase_book(&self) -> PhraseBook {
        PhraseBook::new(&self.phrases, &self.default_locale)
    }
}

/// Case-insensitive set of generic alias tokens.
#[derive(Debug, Clone, Default)]
pub struct Stopwords(std::collections::HashSet<String>);

impl Stopwords {
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(&token.trim().to_lowercase())
    }
}

// ── Annotation phrases ───────────────────────────────────────────────────

/// Prefix and terminal punctuation of the annotation for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Phrase {
    pub locale: String,
    pub prefix: String,
    pub suffix: String,
}

/// Phrase lookup with an explicit fallback locale.
#[derive(Debug, Clone)]
pub struct PhraseBook {
    by_locale: HashMap<String, Phrase>,
    fallback: Phrase,
}

impl PhraseBook {
    pub fn new(phrases: &[Phrase], default_locale: &str) -> Self {
        let by_locale: HashMap<String, Phrase> = phrases
            .iter()
            .map(|p| (p.locale.clone(), p.clone()))
            .collect();

        // A table without the default locale still needs something to fall back on
        let fallback = by_locale
            .get(default_locale)
            .or_else(|| phrases.first())
            .cloned()
            .unwrap_or_else(|| Phrase {
                locale: tables::DEFAULT_LOCALE.to_string(),
                prefix: "Also known as: ".to_string(),
                suffix: ".".to_string(),
            });

        Self { by_locale, fallback }
    }

    /// Phrase for `locale`, or the default locale's phrase when unknown.
    /// The flag is `true` when the fallback was used.
    pub fn lookup(&self, locale: &str) -> (&Phrase, bool) {
        match self.by_locale.get(locale) {
            Some(p) => (p, false),
            None => (&self.fallback, true),
        }
    }

    /// Known locale codes, default locale first, the rest sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.by_locale.keys().map(String::as_str).collect();
        codes.sort();
        if let Some(idx) = codes.iter().position(|c| *c == self.fallback.locale) {
            let default = codes.remove(idx);
            codes.insert(0, default);
        }
        codes
    }
}
