use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Tables;
use crate::error::Result;
use crate::tables::build_rank_regex;

// ── Scientific-name shapes ─────────────────────────────────────────
//
//   Sedum morganianum          Genus species
//   Epipremnum aureum 'Marble' cultivar in quotes
//   Aloe vera var. chinensis   rank marker
//   S. trifasciata             abbreviated genus

static RE_SYNONYM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsyn\.").unwrap());

// {Genus} {species}[ {epithet}]
static RE_BINOMIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<genus>[A-Z][a-z]+)\s+(?P<species>[a-z]+(?:\s+[a-z]+)?)\b").unwrap()
});

static RE_CULTIVAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"](?P<cultivar>[^'"]+)['"]"#).unwrap());

static RE_ABBREVIATED_GENUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]\.\s*[a-z]+").unwrap());

/// The rule that marked a token as scientific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Synonym,
    Binomial,
    Cultivar,
    RankMarker,
    Genus,
    AbbreviatedGenus,
}

/// Heuristic scientific-vs-common name filter over curated word lists.
#[derive(Debug, Clone)]
pub struct Classifier {
    common_first_words: HashSet<String>,
    known_genera: HashSet<String>,
    synonym_markers: Vec<String>,
    rank_markers: Regex,
}

impl Classifier {
    pub fn new(tables: &Tables) -> Result<Self> {
        let lower = |list: &[String]| -> HashSet<String> {
            list.iter().map(|s| s.to_lowercase()).collect()
        };
        Ok(Self {
            common_first_words: lower(&tables.common_first_words),
            known_genera: lower(&tables.known_genera),
            synonym_markers: tables.synonym_markers.clone(),
            rank_markers: Regex::new(&build_rank_regex(&tables.rank_markers))?,
        })
    }

    pub fn looks_scientific(&self, token: &str) -> bool {
        self.verdict(token).is_some()
    }

    /// First rule that classifies `token` as scientific, if any.
    pub fn verdict(&self, token: &str) -> Option<Rule> {
        let val = token.trim();
        if val.is_empty() {
            return None;
        }

        if RE_SYNONYM.is_match(val)
            || self.synonym_markers.iter().any(|m| val.contains(m.as_str()))
        {
            return Some(Rule::Synonym);
        }

        // "Chinese evergreen" shapes like a binomial but starts with a common word
        let binomial = RE_BINOMIAL.captures_iter(val).any(|caps| {
            caps.name("genus")
                .is_some_and(|g| !self.common_first_words.contains(&g.as_str().to_lowercase()))
        });
        if binomial {
            return Some(Rule::Binomial);
        }

        if RE_CULTIVAR.is_match(val) && val.chars().any(char::is_lowercase) {
            return Some(Rule::Cultivar);
        }

        if self.rank_markers.is_match(val) {
            return Some(Rule::RankMarker);
        }

        let mut words = val.split_whitespace();
        if let (Some(word), None) = (words.next(), words.next()) {
            if self.known_genera.contains(&word.to_lowercase()) {
                return Some(Rule::Genus);
            }
        }

        if RE_ABBREVIATED_GENUS.is_match(val) {
            return Some(Rule::AbbreviatedGenus);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&Tables::default()).unwrap()
    }

    #[test]
    fn test_binomial() {
        let c = classifier();
        assert_eq!(c.verdict("Sedum morganianum"), Some(Rule::Binomial));
        assert_eq!(c.verdict("Ficus elastica robusta"), Some(Rule::Binomial));
    }

    #[test]
    fn test_common_first_word_is_not_binomial() {
        let c = classifier();
        assert_eq!(c.verdict("Chinese evergreen"), None);
        assert_eq!(c.verdict("String of pearls"), None);
        assert_eq!(c.verdict("Planta de jade"), None);
    }

    #[test]
    fn test_title_case_common_names() {
        let c = classifier();
        assert!(!c.looks_scientific("Snake Plant"));
        assert!(!c.looks_scientific("Donkey's Tail"));
        assert!(!c.looks_scientific("Burro's Tail"));
        assert!(!c.looks_scientific("spider plant"));
        assert!(!c.looks_scientific("玉树"));
    }

    #[test]
    fn test_synonym_markers() {
        let c = classifier();
        assert_eq!(c.verdict("syn. Sansevieria"), Some(Rule::Synonym));
        assert_eq!(c.verdict("SYN. Sansevieria"), Some(Rule::Synonym));
        assert_eq!(c.verdict("同义名虎尾兰"), Some(Rule::Synonym));
    }

    #[test]
    fn test_cultivar_needs_lowercase() {
        let c = classifier();
        assert_eq!(c.verdict("'Marble Queen'"), Some(Rule::Cultivar));
        assert_eq!(c.verdict("'ABC'"), None);
    }

    #[test]
    fn test_rank_markers() {
        let c = classifier();
        assert_eq!(c.verdict("Tillandsia × Xerographica"), Some(Rule::RankMarker));
        assert_eq!(c.verdict("Aloe Vera Subsp. Barbadensis"), Some(Rule::RankMarker));
    }

    #[test]
    fn test_single_word_genus() {
        let c = classifier();
        assert_eq!(c.verdict("Echeveria"), Some(Rule::Genus));
        assert_eq!(c.verdict("aloe"), Some(Rule::Genus));
        assert_eq!(c.verdict("Aloe Plant"), None);
    }

    #[test]
    fn test_abbreviated_genus() {
        let c = classifier();
        assert_eq!(c.verdict("S. trifasciata"), Some(Rule::AbbreviatedGenus));
        assert_eq!(c.verdict("S.trifasciata"), Some(Rule::AbbreviatedGenus));
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(classifier().verdict("   "), None);
    }

    #[test]
    fn test_injected_tables() {
        let tables = Tables {
            known_genera: vec!["Hoya".to_string()],
            ..Tables::default()
        };
        let c = Classifier::new(&tables).unwrap();
        assert_eq!(c.verdict("hoya"), Some(Rule::Genus));
        assert_eq!(c.verdict("Echeveria"), None);
    }
}
