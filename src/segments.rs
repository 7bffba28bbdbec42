use regex::Regex;
use std::sync::LazyLock;

use crate::config::Stopwords;

// ── commonExamples mini-language ───────────────────────────────────
//
// Real data examples:
//   Sedum morganianum (Donkey's Tail, Burro's Tail)
//   Dracaena trifasciata (syn. Sansevieria trifasciata; Snake Plant, Mother-in-law's Tongue)
//   Crassula ovata (Jade Plant); Crassula arborescens (Silver Jade)
//   Chlorophytum comosum (Spider Plant, variety)
//
// Each `{formal} ({aliases})` group is one segment. A `;` inside the
// parentheses separates a synonym clause from the alias list.

// {Formal} ( {Aliases} )
static RE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<formal>[^(]+)\((?P<aliases>[^)]+)\)").unwrap());

/// Separators left over in front of a formal name by the previous segment.
const LIST_SEPARATORS: &[char] = &[';', ',', '；', '，', '、'];

/// One `formal (alias, alias)` group of a `commonExamples` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub formal_name: String,
    pub aliases: Vec<String>,
}

/// Parse a `commonExamples` field into its segments, in source order.
///
/// Segments without a formal name or without any usable alias are dropped.
/// Unbalanced parentheses simply produce no segment for that region.
pub fn parse_segments(raw: &str, stopwords: &Stopwords) -> Vec<NameSegment> {
    let mut segments = Vec::new();

    for caps in RE_SEGMENT.captures_iter(raw) {
        let formal = caps
            .name("formal")
            .map(|m| {
                m.as_str()
                    .trim_start_matches(|c: char| c.is_whitespace() || LIST_SEPARATORS.contains(&c))
                    .trim_end()
            })
            .unwrap_or("");

        let mut paren = caps.name("aliases").map(|m| m.as_str().trim()).unwrap_or("");

        // "syn. X; alias1, alias2" → only the part after the last ';'
        if let Some(idx) = paren.rfind(';') {
            paren = paren[idx + 1..].trim();
        }

        let aliases: Vec<String> = paren
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .filter(|a| !stopwords.contains(a))
            .filter(|a| !a.to_lowercase().starts_with("syn."))
            .map(str::to_string)
            .collect();

        if formal.is_empty() || aliases.is_empty() {
            continue;
        }

        segments.push(NameSegment {
            formal_name: formal.to_string(),
            aliases,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tables;

    fn parse(raw: &str) -> Vec<NameSegment> {
        parse_segments(raw, &Tables::default().stopword_set())
    }

    fn seg(formal: &str, aliases: &[&str]) -> NameSegment {
        NameSegment {
            formal_name: formal.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(
            parse("Sedum morganianum (Donkey's Tail, Burro's Tail)"),
            vec![seg("Sedum morganianum", &["Donkey's Tail", "Burro's Tail"])]
        );
    }

    #[test]
    fn test_multiple_segments_keep_order() {
        assert_eq!(
            parse("A (x, y); B (z, w)"),
            vec![seg("A", &["x", "y"]), seg("B", &["z", "w"])]
        );
    }

    #[test]
    fn test_synonym_clause_discarded() {
        assert_eq!(
            parse("Dracaena trifasciata (syn. Sansevieria trifasciata; Snake Plant, Mother-in-law's Tongue)"),
            vec![seg(
                "Dracaena trifasciata",
                &["Snake Plant", "Mother-in-law's Tongue"]
            )]
        );
    }

    #[test]
    fn test_syn_token_and_stopwords_dropped() {
        assert_eq!(
            parse("Chlorophytum comosum (Spider Plant, variety,  Hybrid , syn. Anthericum)"),
            vec![seg("Chlorophytum comosum", &["Spider Plant"])]
        );
    }

    #[test]
    fn test_segment_with_only_stopwords_discarded() {
        assert!(parse("Begonia (various, hybrid)").is_empty());
    }

    #[test]
    fn test_empty_and_plain_input() {
        assert!(parse("").is_empty());
        assert!(parse("Just a plain sentence").is_empty());
    }

    #[test]
    fn test_unbalanced_parens_degrade() {
        assert!(parse("Aloe vera (Burn Plant").is_empty());
        assert!(parse("Stray ) text ()").is_empty());
    }

    #[test]
    fn test_chinese_segments() {
        assert_eq!(
            parse("Crassula ovata (玉树, 燕子掌)；Sedum (佛甲草, 杂交)"),
            vec![
                seg("Crassula ovata", &["玉树", "燕子掌"]),
                seg("Sedum", &["佛甲草"]),
            ]
        );
    }
}
