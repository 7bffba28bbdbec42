use plant_types::PlantEntry;

use crate::codec::{ensure_terminal, Codec};
use crate::config::{Phrase, PhraseBook, Tables};
use crate::error::Result;
use crate::resolve::{Resolved, Resolver, Scope};

/// Per-run knobs of the applier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    pub scope: Scope,
    /// Records with more segments than this are left alone.
    pub category_limit: Option<usize>,
}

/// Why a record was left untouched before any text was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    NoSegments,
    /// Segment count of a category record
    Category(usize),
    NoValue,
}

/// Result of applying the annotation to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub description: String,
    pub changed: bool,
    pub resolved: Option<Resolved>,
    pub skip: Option<Skip>,
}

impl Applied {
    fn skipped(entry: &PlantEntry, skip: Skip) -> Self {
        Self {
            description: entry.description().to_string(),
            changed: false,
            resolved: None,
            skip: Some(skip),
        }
    }
}

/// Parser, resolver and codec wired to one set of curated tables.
#[derive(Debug, Clone)]
pub struct AkaEngine {
    resolver: Resolver,
    codec: Codec,
    phrases: PhraseBook,
    category_limit: usize,
}

impl AkaEngine {
    pub fn new(tables: &Tables) -> Result<Self> {
        Ok(Self {
            resolver: Resolver::new(tables)?,
            codec: Codec::new(tables),
            phrases: tables.phrase_book(),
            category_limit: tables.category_limit,
        })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn phrases(&self) -> &PhraseBook {
        &self.phrases
    }

    /// Options for records naming one specific plant.
    pub fn primary_options(&self) -> ApplyOptions {
        ApplyOptions {
            scope: Scope {
                first_segment_only: true,
            },
            category_limit: Some(self.category_limit),
        }
    }

    /// Compute the annotated description of `entry`.
    ///
    /// Any existing block is stripped before the new one is prepended, so
    /// the output never carries two blocks and a second run reports no change.
    pub fn apply(&self, entry: &PlantEntry, phrase: &Phrase, options: ApplyOptions) -> Applied {
        let segments = self.resolver.parse(entry.common_examples());
        if segments.is_empty() {
            return Applied::skipped(entry, Skip::NoSegments);
        }

        if let Some(limit) = options.category_limit {
            if segments.len() > limit {
                return Applied::skipped(entry, Skip::Category(segments.len()));
            }
        }

        let Some(resolved) = self.resolver.resolve(entry.type_name(), &segments, options.scope)
        else {
            return Applied::skipped(entry, Skip::NoValue);
        };

        let description = entry.description();
        let description = self.annotate(description, &resolved.value, phrase);
        let changed = description != entry.description();

        Applied {
            description,
            changed,
            resolved: Some(resolved),
            skip: None,
        }
    }

    /// Replace whatever block `description` carries with one for `value`.
    ///
    /// A block already rendering `value` is cut as an exact span, so periods
    /// inside the value never decide where the block ends.
    pub fn annotate(&self, description: &str, value: &str, phrase: &Phrase) -> String {
        let block = self.codec.encode(value, phrase);
        let base = match self.codec.strip_exact(description, value, phrase) {
            Some(rest) => ensure_terminal(&rest, phrase),
            None => self.base_text(description, phrase),
        };
        if base.is_empty() {
            block
        } else {
            format!("{block} {base}")
        }
    }

    /// Description without its block, ending in a sentence stop.
    /// Text around a removed block is tidied; text without one is only trimmed.
    pub fn base_text(&self, description: &str, phrase: &Phrase) -> String {
        let base = if self.codec.decode(description, phrase).is_some() {
            self.codec.strip(description, phrase)
        } else {
            description.trim().to_string()
        };
        ensure_terminal(&base, phrase)
    }
}
