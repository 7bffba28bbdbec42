use std::path::{Path, PathBuf};

use plant_types::PlantEntry;
use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File name shape of a language file: `{prefix}{locale}.json`.
pub const FILE_PREFIX: &str = "common_plants_language_";

/// Key of the file-level sentinel element.
const METADATA_KEY: &str = "_metadata";

/// A language file discovered in the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSource {
    pub locale: String,
    pub path: PathBuf,
}

/// Discover all language files directly inside `root`.
///
/// Locales listed in `preferred` come first in that order, any others
/// follow alphabetically.
pub fn scan_sources(root: &Path, preferred: &[&str]) -> Vec<LanguageSource> {
    let mut found: Vec<LanguageSource> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?;
            let locale = name.strip_prefix(FILE_PREFIX)?.strip_suffix(".json")?;
            if locale.is_empty() {
                return None;
            }
            Some(LanguageSource {
                locale: locale.to_string(),
                path: e.path().to_path_buf(),
            })
        })
        .collect();

    let rank = |locale: &str| {
        preferred
            .iter()
            .position(|p| *p == locale)
            .unwrap_or(preferred.len())
    };
    found.sort_by(|a, b| {
        rank(&a.locale)
            .cmp(&rank(&b.locale))
            .then_with(|| a.locale.cmp(&b.locale))
    });
    found
}

/// Path of the language file for `locale` under `root`.
pub fn source_path(root: &Path, locale: &str) -> PathBuf {
    root.join(format!("{FILE_PREFIX}{locale}.json"))
}

/// A plant element of a language file with its position in the array.
#[derive(Debug, Clone)]
pub struct PlantRef {
    pub index: usize,
    pub entry: PlantEntry,
}

/// One language file held as raw JSON so untouched elements round-trip as-is.
#[derive(Debug, Clone)]
pub struct LanguageFile {
    pub path: PathBuf,
    pub locale: String,
    items: Vec<Value>,
}

impl LanguageFile {
    pub fn load(source: &LanguageSource) -> Result<Self> {
        let path = &source.path;
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&json).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        let Value::Array(items) = value else {
            return Err(Error::Shape {
                path: path.clone(),
                reason: "top level is not an array".to_string(),
            });
        };

        Ok(Self {
            path: path.clone(),
            locale: source.locale.clone(),
            items,
        })
    }

    #[cfg(test)]
    pub fn from_items(locale: &str, items: Vec<Value>) -> Self {
        Self {
            path: PathBuf::from(format!("{FILE_PREFIX}{locale}.json")),
            locale: locale.to_string(),
            items,
        }
    }

    /// Typed view of every plant element, skipping the metadata sentinel.
    /// Elements whose fields do not fit [`PlantEntry`] are logged and skipped.
    pub fn plants(&self) -> Vec<PlantRef> {
        let mut plants = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if is_metadata(item) {
                continue;
            }
            match PlantEntry::deserialize(item) {
                Ok(entry) => plants.push(PlantRef { index, entry }),
                Err(e) => tracing::warn!(
                    file = %self.path.display(),
                    index,
                    "skipping malformed entry: {e}"
                ),
            }
        }
        plants
    }

    /// Overwrite the `description` of the element at `index`.
    pub fn set_description(&mut self, index: usize, description: &str) {
        if let Some(obj) = self.items.get_mut(index).and_then(Value::as_object_mut) {
            obj.insert(
                "description".to_string(),
                Value::String(description.to_string()),
            );
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.items).map_err(|source| Error::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the whole file back in place.
    pub fn save(&self) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(&self.path, &json).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(file = %self.path.display(), bytes = json.len(), "wrote language file");
        Ok(())
    }
}

fn is_metadata(item: &Value) -> bool {
    item.as_object()
        .is_some_and(|obj| obj.contains_key(METADATA_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LanguageFile {
        LanguageFile::from_items(
            "en",
            vec![
                json!({ "_metadata": { "categories": ["Herbs"], "plantCount": 2 } }),
                json!({
                    "id": "basil",
                    "typeName": "Basil",
                    "description": "Fragrant herb.",
                    "commonExamples": "Ocimum basilicum (Sweet Basil)",
                    "careTips": "Pinch flowers."
                }),
                json!({ "id": "broken", "description": 42 }),
                json!({ "id": "mint", "typeName": null }),
            ],
        )
    }

    #[test]
    fn test_plants_skip_sentinel_and_malformed() {
        let file = sample();
        let plants = file.plants();
        let ids: Vec<(usize, &str)> = plants.iter().map(|p| (p.index, p.entry.id())).collect();
        assert_eq!(ids, vec![(1, "basil"), (3, "mint")]);
        assert_eq!(plants[1].entry.type_name(), "");
    }

    #[test]
    fn test_set_description_keeps_key_order() {
        let mut file = sample();
        file.set_description(1, "Also known as: Sweet Basil. Fragrant herb.");
        let json = file.to_json().unwrap();
        let id = json.find("\"id\": \"basil\"").unwrap();
        let type_name = json.find("\"typeName\": \"Basil\"").unwrap();
        let description = json.find("Also known as: Sweet Basil").unwrap();
        let examples = json.find("\"commonExamples\"").unwrap();
        assert!(id < type_name && type_name < description && description < examples);
        assert!(json.contains("\"plantCount\": 2"));
        assert!(json.contains("\"description\": 42"));
    }

    #[test]
    fn test_non_ascii_written_verbatim() {
        let file = LanguageFile::from_items("zh-Hans", vec![json!({ "id": "a", "description": "也称：虎尾兰。" })]);
        assert!(file.to_json().unwrap().contains("也称：虎尾兰。"));
    }

    #[test]
    fn test_scan_sources_order() {
        let dir = std::env::temp_dir().join(format!("plant_aka_scan_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in [
            "common_plants_language_zh-Hans.json",
            "common_plants_language_fr.json",
            "common_plants_language_en.json",
            "common_plants_language_es.json",
            "common_plants_metadata.json",
        ] {
            std::fs::write(dir.join(name), "[]").unwrap();
        }

        let locales: Vec<String> = scan_sources(&dir, &["en", "es", "zh-Hans"])
            .into_iter()
            .map(|s| s.locale)
            .collect();
        assert_eq!(locales, vec!["en", "es", "zh-Hans", "fr"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_non_array() {
        let dir = std::env::temp_dir().join(format!("plant_aka_shape_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = source_path(&dir, "en");
        std::fs::write(&path, r#"{ "id": "x" }"#).unwrap();

        let source = LanguageSource {
            locale: "en".into(),
            path,
        };
        assert!(matches!(LanguageFile::load(&source), Err(Error::Shape { .. })));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
