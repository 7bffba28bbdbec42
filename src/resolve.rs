use plant_types::AkaKind;

use crate::classify::Classifier;
use crate::config::{Stopwords, Tables};
use crate::error::Result;
use crate::segments::{parse_segments, NameSegment};

/// Which segments feed the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Only the primary segment, for records naming one specific plant.
    pub first_segment_only: bool,
}

/// The complementary name(s) to show as "also known as".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub kind: AkaKind,
}

/// Picks the annotation value for a plant from its display name and segments.
#[derive(Debug, Clone)]
pub struct Resolver {
    classifier: Classifier,
    stopwords: Stopwords,
}

impl Resolver {
    pub fn new(tables: &Tables) -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new(tables)?,
            stopwords: tables.stopword_set(),
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn parse(&self, common_examples: &str) -> Vec<NameSegment> {
        parse_segments(common_examples, &self.stopwords)
    }

    /// Complementary value for `display_name`.
    ///
    /// A display name that is one of the aliases is a nickname, so the formal
    /// name(s) are returned. Otherwise the aliases are returned, minus those
    /// that repeat the display name, look scientific or are generic.
    pub fn resolve(
        &self,
        display_name: &str,
        segments: &[NameSegment],
        scope: Scope,
    ) -> Option<Resolved> {
        let considered = if scope.first_segment_only {
            segments.get(..1)?
        } else {
            segments
        };
        if considered.is_empty() {
            return None;
        }

        let formals: Vec<&str> = considered.iter().map(|s| s.formal_name.as_str()).collect();

        let mut aliases: Vec<&str> = Vec::new();
        for alias in considered.iter().flat_map(|s| &s.aliases) {
            let lower = alias.to_lowercase();
            if !aliases.iter().any(|a| a.to_lowercase() == lower) {
                aliases.push(alias);
            }
        }

        let display_lower = display_name.trim().to_lowercase();

        if aliases.iter().any(|a| a.to_lowercase() == display_lower) {
            return Some(Resolved {
                value: formals.join(", "),
                kind: AkaKind::Formal,
            });
        }

        let kept: Vec<&str> = aliases
            .into_iter()
            .filter(|a| !is_redundant(a, &display_lower))
            .filter(|a| !self.classifier.looks_scientific(a))
            .filter(|a| !self.stopwords.contains(a))
            .collect();

        if kept.is_empty() {
            return None;
        }

        Some(Resolved {
            value: kept.join(", "),
            kind: AkaKind::Aliases,
        })
    }
}

/// Literal substring test in both directions, case-insensitive.
/// "Aloe" is redundant with "Aloe Vera", and so is "Rose" with "Primrose".
fn is_redundant(alias: &str, display_lower: &str) -> bool {
    let al = alias.to_lowercase();
    al == display_lower || display_lower.contains(&al) || al.contains(display_lower)
}
