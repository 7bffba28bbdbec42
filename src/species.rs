use std::collections::HashMap;

use crate::resolve::Resolver;
use crate::store::LanguageFile;

/// Primary-segment formal name → id of the plant that owns that species.
///
/// Several records may list the same species first; the one with the
/// fewest segments wins, so a specific plant beats a category grouping it.
/// Ties keep file order.
#[derive(Debug, Clone, Default)]
pub struct SpeciesMap {
    owners: HashMap<String, String>,
}

impl SpeciesMap {
    pub fn build(file: &LanguageFile, resolver: &Resolver) -> Self {
        let mut candidates: Vec<(String, String, usize)> = Vec::new();
        for plant in file.plants() {
            let id = plant.entry.id();
            if id.is_empty() {
                continue;
            }
            let segments = resolver.parse(plant.entry.common_examples());
            if let Some(first) = segments.first() {
                candidates.push((first.formal_name.clone(), id.to_string(), segments.len()));
            }
        }

        // Stable: equal keys stay in file order
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(a.2.cmp(&b.2)));

        let mut owners = HashMap::new();
        for (formal, id, _) in candidates {
            owners.entry(formal).or_insert(id);
        }
        Self { owners }
    }

    pub fn owner(&self, formal_name: &str) -> Option<&str> {
        self.owners.get(formal_name).map(String::as_str)
    }

    /// Whether `id` owns the species named by `formal_name`.
    pub fn is_owner(&self, formal_name: &str, id: &str) -> bool {
        self.owner(formal_name) == Some(id)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }
}
