use std::collections::HashSet;
use std::path::Path;

use plant_types::{AuditFinding, AuditKind, PlantEntry};
use serde::Serialize;

use crate::apply::AkaEngine;
use crate::batch::{file_name, missing_files};
use crate::config::Phrase;
use crate::segments::NameSegment;
use crate::store::{scan_sources, LanguageFile};

/// Checks in the order they are reported and fixed.
pub const CHECKS: [AuditKind; 3] = [
    AuditKind::Scientific,
    AuditKind::DuplicateTypeName,
    AuditKind::Subspecies,
];

/// Most aliases a fix pulls in from `commonExamples`.
const MAX_REPLACEMENT_ALIASES: usize = 3;

/// Descriptions rewritten by one check in one file.
#[derive(Debug, Clone, Serialize)]
pub struct FixCount {
    pub file: String,
    pub locale: String,
    pub kind: AuditKind,
    pub fixed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub findings: Vec<AuditFinding>,
    pub fixes: Vec<FixCount>,
    pub missing: Vec<String>,
}

impl AuditReport {
    pub fn total_fixed(&self) -> usize {
        self.fixes.iter().map(|f| f.fixed).sum()
    }

    pub fn of_kind(&self, kind: AuditKind) -> impl Iterator<Item = &AuditFinding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

/// Read-only checks over existing annotations, and their fixes.
pub struct Auditor<'a> {
    engine: &'a AkaEngine,
}

impl<'a> Auditor<'a> {
    pub fn new(engine: &'a AkaEngine) -> Self {
        Self { engine }
    }

    /// Run one check against `entry`'s current annotation.
    pub fn check(
        &self,
        kind: AuditKind,
        entry: &PlantEntry,
        locale: &str,
        phrase: &Phrase,
    ) -> Option<AuditFinding> {
        let aka = self.engine.codec().decode(entry.description(), phrase)?;
        if aka.is_empty() {
            return None;
        }
        let parts: Vec<&str> = aka
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        let segments = self.engine.resolver().parse(entry.common_examples());

        let type_name = entry.type_name();

        let (offending, replacement) = match kind {
            AuditKind::Scientific => self.scientific(type_name, &parts, &segments)?,
            AuditKind::DuplicateTypeName => duplicate_type_name(type_name, &parts, &segments)?,
            AuditKind::Subspecies => subspecies(type_name, &parts, &segments)?,
        };

        Some(AuditFinding {
            kind,
            id: entry.id().to_string(),
            type_name: type_name.to_string(),
            locale: locale.to_string(),
            aka,
            offending,
            replacement,
        })
    }

    /// Description after applying `finding`'s fix.
    pub fn fixed_description(
        &self,
        description: &str,
        finding: &AuditFinding,
        phrase: &Phrase,
    ) -> String {
        match &finding.replacement {
            Some(value) => self.engine.annotate(description, value, phrase),
            None => self.engine.base_text(description, phrase),
        }
    }

    /// Every check against every plant, without touching the file.
    pub fn audit_file(&self, file: &LanguageFile, phrase: &Phrase) -> Vec<AuditFinding> {
        let plants = file.plants();
        let mut findings = Vec::new();
        for kind in CHECKS {
            for plant in &plants {
                findings.extend(self.check(kind, &plant.entry, &file.locale, phrase));
            }
        }
        findings
    }

    /// Apply each check's fix in turn; later checks see earlier rewrites.
    /// Returns every finding and the number of rewrites per check.
    pub fn fix_file(
        &self,
        file: &mut LanguageFile,
        phrase: &Phrase,
    ) -> (Vec<AuditFinding>, Vec<(AuditKind, usize)>) {
        let mut plants = file.plants();
        let mut findings = Vec::new();
        let mut counts = Vec::new();

        for kind in CHECKS {
            let mut fixed = 0;
            for plant in &mut plants {
                let Some(finding) = self.check(kind, &plant.entry, &file.locale, phrase) else {
                    continue;
                };
                let before = plant.entry.description();
                let after = self.fixed_description(before, &finding, phrase);
                if after != before {
                    tracing::debug!(id = %finding.id, ?kind, "fixed annotation");
                    file.set_description(plant.index, &after);
                    plant.entry.description = Some(after);
                    fixed += 1;
                }
                findings.push(finding);
            }
            counts.push((kind, fixed));
        }

        (findings, counts)
    }

    /// Parts that classify as scientific. The formal name is allowed when the
    /// type name is one of its aliases, since that is what a batch run writes.
    fn scientific(
        &self,
        type_name: &str,
        parts: &[&str],
        segments: &[NameSegment],
    ) -> Option<(Vec<String>, Option<String>)> {
        let classifier = self.engine.resolver().classifier();
        let type_lower = type_name.to_lowercase();
        let allowed = segments
            .iter()
            .find(|s| s.aliases.iter().any(|a| a.to_lowercase() == type_lower))
            .map(|s| s.formal_name.as_str());
        let is_scientific = |p: &str| Some(p) != allowed && classifier.looks_scientific(p);

        let offending = collect(parts.iter().copied().filter(|p| is_scientific(*p)));
        if offending.is_empty() {
            return None;
        }

        let alternatives: Vec<&str> = segments
            .iter()
            .flat_map(|s| &s.aliases)
            .map(String::as_str)
            .filter(|a| a.to_lowercase() != type_lower && !classifier.looks_scientific(a))
            .take(MAX_REPLACEMENT_ALIASES)
            .collect();
        let valid: Vec<&str> = parts.iter().copied().filter(|p| !is_scientific(*p)).collect();

        Some((offending, join_nonempty(&alternatives).or_else(|| join_nonempty(&valid))))
    }
}

/// Parts equal to, or contained in, the type name.
fn duplicate_type_name(
    type_name: &str,
    parts: &[&str],
    segments: &[NameSegment],
) -> Option<(Vec<String>, Option<String>)> {
    let type_norm = normalize(type_name);
    let redundant = |p: &str| type_norm.contains(&normalize(p));

    let offending = collect(parts.iter().copied().filter(|p| redundant(*p)));
    if offending.is_empty() {
        return None;
    }

    let kept: Vec<&str> = parts.iter().copied().filter(|p| !redundant(*p)).collect();
    if !kept.is_empty() {
        return Some((offending, join_nonempty(&kept)));
    }

    let current: HashSet<String> = parts.iter().map(|p| normalize(p)).collect();
    let alternatives: Vec<&str> = segments
        .first()
        .map(|s| s.aliases.as_slice())
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|a| !redundant(*a))
        .filter(|a| !current.contains(&normalize(a)))
        .filter(|a| !is_bare_capitalized(a))
        .take(MAX_REPLACEMENT_ALIASES)
        .collect();

    Some((offending, join_nonempty(&alternatives)))
}

/// Parts that are aliases of a non-primary segment.
fn subspecies(
    type_name: &str,
    parts: &[&str],
    segments: &[NameSegment],
) -> Option<(Vec<String>, Option<String>)> {
    let (first, rest) = segments.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let others: HashSet<String> = rest
        .iter()
        .flat_map(|s| &s.aliases)
        .map(|a| normalize(a))
        .collect();
    let is_other = |p: &str| others.contains(&normalize(p));

    let offending = collect(parts.iter().copied().filter(|p| is_other(*p)));
    if offending.is_empty() {
        return None;
    }

    let valid: Vec<&str> = parts.iter().copied().filter(|p| !is_other(*p)).collect();
    if !valid.is_empty() {
        return Some((offending, join_nonempty(&valid)));
    }

    let type_norm = normalize(type_name);
    let first_valid: Vec<&str> = first
        .aliases
        .iter()
        .map(String::as_str)
        .filter(|a| !type_norm.contains(&normalize(a)))
        .take(MAX_REPLACEMENT_ALIASES)
        .collect();

    Some((offending, join_nonempty(&first_valid)))
}

/// Audit (and optionally fix) every language file under `root`.
pub fn run_audit(root: &Path, engine: &AkaEngine, fix: bool) -> AuditReport {
    let locales = engine.phrases().locales();
    let sources = scan_sources(root, &locales);
    let auditor = Auditor::new(engine);
    let mut report = AuditReport {
        missing: missing_files(root, &locales, &sources),
        ..AuditReport::default()
    };

    for source in &sources {
        let (phrase, _) = engine.phrases().lookup(&source.locale);
        let mut file = match LanguageFile::load(source) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("{e}");
                continue;
            }
        };

        if !fix {
            report.findings.extend(auditor.audit_file(&file, phrase));
            continue;
        }

        let (findings, counts) = auditor.fix_file(&mut file, phrase);
        report.findings.extend(findings);
        let changed: usize = counts.iter().map(|(_, n)| n).sum();
        for (kind, fixed) in counts {
            if fixed > 0 {
                report.fixes.push(FixCount {
                    file: file_name(&source.path),
                    locale: source.locale.clone(),
                    kind,
                    fixed,
                });
            }
        }
        if changed > 0 {
            if let Err(e) = file.save() {
                tracing::warn!("{e}");
            }
        }
    }

    report
}

/// Lowercase with whitespace runs collapsed.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A single capitalized word such as a bare genus.
fn is_bare_capitalized(name: &str) -> bool {
    let mut chars = name.trim().chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.clone().next().is_some()
        && chars.all(|c| c.is_ascii_lowercase())
}

fn collect<'s>(parts: impl Iterator<Item = &'s str>) -> Vec<String> {
    parts.map(str::to_string).collect()
}

fn join_nonempty(parts: &[&str]) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
