use std::path::Path;

use plant_types::AkaChange;
use serde::Serialize;

use crate::apply::{AkaEngine, Skip};
use crate::config::Phrase;
use crate::species::SpeciesMap;
use crate::store::{scan_sources, source_path, LanguageFile, LanguageSource};

/// Which records a batch run annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the plant that owns its primary species (see [`SpeciesMap`]).
    Add,
    /// Every plant with a primary segment.
    Ensure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub mode: Mode,
    /// Compute and report, never write.
    pub dry_run: bool,
}

/// Outcome for one language file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub locale: String,
    pub updated: usize,
    /// Locale missing from the phrase table, default phrase used
    pub phrase_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    /// Expected language files that were not found
    pub missing: Vec<String>,
    pub changes: Vec<AkaChange>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.updated).sum()
    }
}

/// Apply the annotation to every plant of every language file under `root`.
///
/// Files are independent: a file that cannot be read or written is
/// reported and the run moves on.
pub fn run_batch(root: &Path, engine: &AkaEngine, options: BatchOptions) -> BatchReport {
    let locales = engine.phrases().locales();
    let sources = scan_sources(root, &locales);
    let mut report = BatchReport {
        missing: missing_files(root, &locales, &sources),
        ..BatchReport::default()
    };

    let species = match options.mode {
        Mode::Add => Some(build_species_map(root, engine, locales.first().copied())),
        Mode::Ensure => None,
    };

    for source in &sources {
        let (phrase, phrase_fallback) = engine.phrases().lookup(&source.locale);
        if phrase_fallback {
            tracing::warn!(
                locale = %source.locale,
                fallback = %phrase.locale,
                "no annotation phrase for locale, using default"
            );
        }

        let mut file_report = FileReport {
            file: file_name(&source.path),
            locale: source.locale.clone(),
            updated: 0,
            phrase_fallback,
            error: None,
        };

        let mut file = match LanguageFile::load(source) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("{e}");
                file_report.error = Some(e.to_string());
                report.files.push(file_report);
                continue;
            }
        };

        let changes = process_file(&mut file, engine, phrase, species.as_ref());
        file_report.updated = changes.len();

        if !options.dry_run && !changes.is_empty() {
            if let Err(e) = file.save() {
                tracing::warn!("{e}");
                file_report.error = Some(e.to_string());
            }
        }

        tracing::info!(file = %file_report.file, updated = file_report.updated, "processed");
        report.changes.extend(changes);
        report.files.push(file_report);
    }

    report
}

/// Rewrite descriptions in memory and return what changed.
fn process_file(
    file: &mut LanguageFile,
    engine: &AkaEngine,
    phrase: &Phrase,
    species: Option<&SpeciesMap>,
) -> Vec<AkaChange> {
    let options = engine.primary_options();
    let mut changes = Vec::new();

    for plant in file.plants() {
        let id = plant.entry.id();
        if id.is_empty() {
            tracing::debug!(index = plant.index, "entry without id");
            continue;
        }

        if let Some(species) = species {
            let segments = engine.resolver().parse(plant.entry.common_examples());
            let owns = segments
                .first()
                .is_some_and(|s| species.is_owner(&s.formal_name, id));
            if !owns {
                tracing::debug!(id, "primary species belongs to another plant");
                continue;
            }
        }

        let applied = engine.apply(&plant.entry, phrase, options);
        match applied.skip {
            Some(Skip::Category(segments)) => {
                tracing::debug!(id, segments, "category record skipped")
            }
            Some(skip) => tracing::debug!(id, ?skip, "skipped"),
            None => {}
        }
        if !applied.changed {
            continue;
        }
        let Some(resolved) = applied.resolved else {
            continue;
        };

        file.set_description(plant.index, &applied.description);
        changes.push(AkaChange {
            id: id.to_string(),
            locale: file.locale.clone(),
            kind: resolved.kind,
            value: resolved.value,
        });
    }

    changes
}

/// Species ownership is decided once, from the default locale's file.
fn build_species_map(root: &Path, engine: &AkaEngine, locale: Option<&str>) -> SpeciesMap {
    let Some(locale) = locale else {
        return SpeciesMap::default();
    };
    let source = LanguageSource {
        locale: locale.to_string(),
        path: source_path(root, locale),
    };
    match LanguageFile::load(&source) {
        Ok(file) => {
            let map = SpeciesMap::build(&file, engine.resolver());
            tracing::debug!(species = map.len(), "built species map");
            map
        }
        Err(e) => {
            tracing::warn!("species map unavailable, no plant is eligible: {e}");
            SpeciesMap::default()
        }
    }
}

/// File names of known locales with no language file under `root`.
pub(crate) fn missing_files(
    root: &Path,
    locales: &[&str],
    sources: &[LanguageSource],
) -> Vec<String> {
    let mut missing = Vec::new();
    for locale in locales {
        if !sources.iter().any(|s| s.locale == *locale) {
            let path = source_path(root, locale);
            tracing::warn!(file = %path.display(), "language file not found");
            missing.push(file_name(&path));
        }
    }
    missing
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tables;
    use plant_types::AkaKind;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("plant_aka_batch_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(dir: &Path, locale: &str, items: Value) {
        let json = serde_json::to_string_pretty(&items).unwrap();
        std::fs::write(source_path(dir, locale), json).unwrap();
    }

    fn read(dir: &Path, locale: &str) -> Value {
        let json = std::fs::read_to_string(source_path(dir, locale)).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    fn seed(dir: &Path) {
        write(
            dir,
            "en",
            json!([
                { "_metadata": { "plantCount": 3 } },
                {
                    "id": "burros_tail",
                    "typeName": "Donkey's Tail",
                    "description": "A trailing succulent.",
                    "commonExamples": "Sedum morganianum (Donkey's Tail, Burro's Tail)"
                },
                {
                    "id": "succulents",
                    "typeName": "Succulents",
                    "description": "Many kinds.",
                    "commonExamples": "Sedum morganianum (Burro's Tail); Echeveria elegans (Mexican Snowball)"
                },
                {
                    "id": "pothos",
                    "typeName": "Pothos",
                    "description": "Easy vine.",
                    "commonExamples": ""
                }
            ]),
        );
        write(
            dir,
            "es",
            json!([
                { "_metadata": { "plantCount": 3 } },
                {
                    "id": "burros_tail",
                    "typeName": "Cola de burro",
                    "description": "Suculenta colgante.",
                    "commonExamples": "Sedum morganianum (Cola de burro, Cola de caballo)"
                }
            ]),
        );
    }

    fn engine() -> AkaEngine {
        AkaEngine::new(&Tables::default()).unwrap()
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let dir = scratch("dry_run");
        seed(&dir);
        let before = std::fs::read_to_string(source_path(&dir, "en")).unwrap();

        let report = run_batch(
            &dir,
            &engine(),
            BatchOptions {
                mode: Mode::Add,
                dry_run: true,
            },
        );

        assert_eq!(report.total(), 2);
        assert_eq!(
            report.missing,
            vec!["common_plants_language_zh-Hans.json".to_string()]
        );
        let en = &report.changes[0];
        assert_eq!((en.id.as_str(), en.locale.as_str()), ("burros_tail", "en"));
        assert_eq!(en.kind, AkaKind::Formal);
        assert_eq!(en.value, "Sedum morganianum");
        assert_eq!(std::fs::read_to_string(source_path(&dir, "en")).unwrap(), before);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_commit_writes_and_second_run_is_noop() {
        let dir = scratch("commit");
        seed(&dir);
        let options = BatchOptions {
            mode: Mode::Add,
            dry_run: false,
        };

        let first = run_batch(&dir, &engine(), options);
        assert_eq!(first.total(), 2);

        let en = read(&dir, "en");
        assert_eq!(en[0], json!({ "_metadata": { "plantCount": 3 } }));
        assert_eq!(
            en[1]["description"],
            "Also known as: Sedum morganianum. A trailing succulent."
        );
        // category grouping is not the species owner
        assert_eq!(en[2]["description"], "Many kinds.");
        assert_eq!(
            read(&dir, "es")[1]["description"],
            "También conocida como: Sedum morganianum. Suculenta colgante."
        );

        let second = run_batch(&dir, &engine(), options);
        assert_eq!(second.total(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_ensure_mode_ignores_species_owner() {
        let dir = scratch("ensure");
        seed(&dir);

        let report = run_batch(
            &dir,
            &engine(),
            BatchOptions {
                mode: Mode::Ensure,
                dry_run: true,
            },
        );

        let ids: Vec<&str> = report.changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["burros_tail", "succulents", "burros_tail"]);
        assert_eq!(report.changes[1].value, "Burro's Tail");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unreadable_file_does_not_stop_batch() {
        let dir = scratch("broken");
        seed(&dir);
        std::fs::write(source_path(&dir, "zh-Hans"), "{ not json").unwrap();

        let report = run_batch(
            &dir,
            &engine(),
            BatchOptions {
                mode: Mode::Ensure,
                dry_run: true,
            },
        );

        let zh = report.files.iter().find(|f| f.locale == "zh-Hans").unwrap();
        assert!(zh.error.is_some());
        assert_eq!(report.files.len(), 3);
        assert!(report.total() > 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unknown_locale_uses_default_phrase() {
        let dir = scratch("fallback");
        write(
            &dir,
            "fr",
            json!([{
                "id": "basil",
                "typeName": "Basilic",
                "description": "Herbe aromatique.",
                "commonExamples": "Ocimum basilicum (Basilic, Herbe royale)"
            }]),
        );

        let report = run_batch(
            &dir,
            &engine(),
            BatchOptions {
                mode: Mode::Ensure,
                dry_run: false,
            },
        );

        assert!(report.files[0].phrase_fallback);
        assert_eq!(
            read(&dir, "fr")[0]["description"],
            "Also known as: Ocimum basilicum. Herbe aromatique."
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
