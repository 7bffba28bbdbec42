use serde::{Deserialize, Serialize};

// ── Language file entry ──────────────────────────────────────────────────

/// One plant record of a `common_plants_language_<code>.json` file.
///
/// Every field is optional on read; a missing or `null` field behaves like
/// an empty string through the accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_examples: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_tips: Option<String>,
}

impl PlantEntry {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// The locale-specific name shown to users.
    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn common_examples(&self) -> &str {
        self.common_examples.as_deref().unwrap_or("")
    }
}

// ── Resolved "also known as" value ───────────────────────────────────────

/// Which side of the naming pair ended up in the annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AkaKind {
    /// Type name is a nickname, so the formal name is shown.
    Formal,
    /// Type name is the formal identity, so the nicknames are shown.
    Aliases,
}

impl AkaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Aliases => "nickname",
        }
    }
}

/// A description rewrite computed by a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AkaChange {
    pub id: String,
    pub locale: String,
    pub kind: AkaKind,
    pub value: String,
}

// ── Audit findings ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditKind {
    /// Latin binomials, cultivars or rank markers inside the annotation
    Scientific,
    /// Annotation repeats or shortens the type name
    #[serde(rename = "duplicate-typename")]
    DuplicateTypeName,
    /// Annotation lists aliases of a non-primary segment
    Subspecies,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scientific => "scientific",
            Self::DuplicateTypeName => "duplicate-typename",
            Self::Subspecies => "subspecies",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Scientific => "Scientific names in 'also known as'",
            Self::DuplicateTypeName => "typeName same as / redundant with also known as",
            Self::Subspecies => "Subspecies in also known as (use first-segment only)",
        }
    }
}

/// One offending annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFinding {
    pub kind: AuditKind,
    pub id: String,
    pub type_name: String,
    pub locale: String,
    /// Current annotation value
    pub aka: String,
    /// Parts of the value that triggered the finding
    pub offending: Vec<String>,
    /// Value a fix would write; `None` removes the annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}
