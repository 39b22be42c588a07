//! The sorted, immutable dataset and its persisted JSON artifact.
//!
//! Elements are ordered by `(tier, name)`; the UI's grouped view relies on
//! that order. The artifact is written to a temporary sibling file and renamed
//! into place, so a reader never observes a half-written file.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::error::DatasetError;
use super::model::{Element, tier_label};
use super::reverse_index::ReverseIndex;

/// The complete element dataset plus its derived "used-in" index.
///
/// Read-only once built; a new run produces a new `Dataset`.
#[derive(Debug, Clone)]
pub struct Dataset {
    elements: Vec<Element>,
    used_in: ReverseIndex,
    by_id: HashMap<String, usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactRef<'a> {
    total: usize,
    elements: &'a [Element],
    used_in: &'a ReverseIndex,
    tier_names: BTreeMap<i32, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactOwned {
    elements: Vec<Element>,
    used_in: ReverseIndex,
}

/// Orders elements by tier, then case-insensitive name, then id.
fn persisted_order(a: &Element, b: &Element) -> Ordering {
    a.tier
        .cmp(&b.tier)
        .then_with(|| folded(&a.name).cmp(folded(&b.name)))
        .then_with(|| a.id.cmp(&b.id))
}

fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

fn index_by_id(elements: &[Element]) -> Result<HashMap<String, usize>, DatasetError> {
    let mut by_id = HashMap::with_capacity(elements.len());
    for (position, element) in elements.iter().enumerate() {
        if by_id.insert(element.id.clone(), position).is_some() {
            return Err(DatasetError::DuplicateId {
                id: element.id.clone(),
            });
        }
    }
    Ok(by_id)
}

impl Dataset {
    /// Sorts `elements`, derives the reverse index and builds the lookup table.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Empty`] when `elements` is empty
    /// - [`DatasetError::DuplicateId`] when two elements share an id
    #[instrument(skip(elements), fields(elements = elements.len()))]
    pub fn build(mut elements: Vec<Element>) -> Result<Self, DatasetError> {
        if elements.is_empty() {
            return Err(DatasetError::Empty);
        }

        elements.sort_by(persisted_order);
        let by_id = index_by_id(&elements)?;
        let used_in = ReverseIndex::build(&elements);
        debug!(ingredients = used_in.len(), "reverse index built");

        Ok(Self {
            elements,
            used_in,
            by_id,
        })
    }

    /// Every element in persisted order.
    #[must_use]
    pub fn all(&self) -> &[Element] {
        &self.elements
    }

    /// Looks up an element by id.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Element> {
        self.by_id.get(id).map(|&position| &self.elements[position])
    }

    /// Ids of the elements whose recipes use `id`.
    ///
    /// May be empty, and may name ids that have no element in this dataset.
    #[must_use]
    pub fn used_in(&self, id: &str) -> &[String] {
        self.used_in.used_in(id)
    }

    #[must_use]
    pub fn reverse_index(&self) -> &ReverseIndex {
        &self.used_in
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.elements.len()
    }

    /// Elements grouped by tier, each group in persisted order.
    #[must_use]
    pub fn by_tier(&self) -> BTreeMap<i32, Vec<&Element>> {
        let mut groups: BTreeMap<i32, Vec<&Element>> = BTreeMap::new();
        for element in &self.elements {
            groups.entry(element.tier).or_default().push(element);
        }
        groups
    }

    /// Labels for every tier present in the dataset.
    #[must_use]
    pub fn tier_names(&self) -> BTreeMap<i32, String> {
        self.elements
            .iter()
            .map(|element| (element.tier, tier_label(element.tier)))
            .collect()
    }

    /// Encodes the artifact as pretty-printed JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, DatasetError> {
        let artifact = ArtifactRef {
            total: self.total(),
            elements: &self.elements,
            used_in: &self.used_in,
            tier_names: self.tier_names(),
        };
        let mut json = serde_json::to_string_pretty(&artifact)?;
        json.push('\n');
        Ok(json)
    }

    /// Decodes an artifact produced by [`Dataset::to_json`].
    ///
    /// The persisted element order and reverse index are taken as-is.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Json`] for malformed input
    /// - [`DatasetError::DuplicateId`] when the artifact repeats an id
    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let artifact: ArtifactOwned = serde_json::from_str(raw)?;
        let by_id = index_by_id(&artifact.elements)?;
        Ok(Self {
            elements: artifact.elements,
            used_in: artifact.used_in,
            by_id,
        })
    }

    /// Reads an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Dataset::from_json`].
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        Self::from_json(&raw)
    }

    /// Writes the artifact to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] for any file system failure.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn write(&self, path: &Path) -> Result<(), DatasetError> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DatasetError::io(parent, e))?;
        }

        let temp = temp_path(path);
        tokio::fs::write(&temp, json.as_bytes())
            .await
            .map_err(|e| DatasetError::io(temp.clone(), e))?;
        if let Err(e) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(DatasetError::io(path, e));
        }

        info!(elements = self.total(), bytes = json.len(), "dataset written");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dataset::model::Recipe;
    use tempfile::TempDir;

    fn sample_elements() -> Vec<Element> {
        vec![
            Element::new("Steam", 2, vec![Recipe::new("Water", "Fire")], None),
            Element::new("Water", 0, Vec::new(), None),
            Element::new("Time", -1, Vec::new(), None),
            Element::new("Fire", 0, Vec::new(), None),
            Element::new(
                "Mud",
                1,
                vec![Recipe::new("Water", "Earth")],
                Some("https://img.example/mud.svg/revision/latest".to_string()),
            ),
        ]
    }

    #[test]
    fn test_build_sorts_by_tier_then_name() {
        let dataset = Dataset::build(sample_elements()).unwrap();
        let order: Vec<_> = dataset.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, ["Time", "Fire", "Water", "Mud", "Steam"]);
    }

    #[test]
    fn test_build_sorts_names_case_insensitively() {
        let dataset = Dataset::build(vec![
            Element::new("Tea", 3, Vec::new(), None),
            Element::new("TV", 3, Vec::new(), None),
            Element::new("bat", 3, Vec::new(), None),
            Element::new("Zombie", 3, Vec::new(), None),
        ])
        .unwrap();

        let order: Vec<_> = dataset.all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, ["bat", "Tea", "TV", "Zombie"]);
    }

    #[test]
    fn test_build_empty_is_fatal() {
        assert!(matches!(Dataset::build(Vec::new()), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let elements = vec![
            Element::new("Ice Cream", 4, Vec::new(), None),
            Element::new("Ice-Cream", 4, Vec::new(), None),
        ];
        assert!(matches!(
            Dataset::build(elements),
            Err(DatasetError::DuplicateId { id }) if id == "ice-cream"
        ));
    }

    #[test]
    fn test_lookup_api() {
        let dataset = Dataset::build(sample_elements()).unwrap();

        assert_eq!(dataset.get_by_id("mud").unwrap().name, "Mud");
        assert!(dataset.get_by_id("lava").is_none());
        assert_eq!(dataset.used_in("water"), ["mud", "steam"]);
        assert_eq!(dataset.used_in("earth"), ["mud"]);
        assert!(dataset.get_by_id("earth").is_none(), "index may name unknown ids");
        assert!(dataset.used_in("time").is_empty());
        assert_eq!(dataset.total(), 5);
    }

    #[test]
    fn test_by_tier_groups_in_persisted_order() {
        let dataset = Dataset::build(sample_elements()).unwrap();
        let groups = dataset.by_tier();

        let tiers: Vec<_> = groups.keys().copied().collect();
        assert_eq!(tiers, [-1, 0, 1, 2]);
        let starting: Vec<_> = groups[&0].iter().map(|e| e.name.as_str()).collect();
        assert_eq!(starting, ["Fire", "Water"]);
    }

    #[test]
    fn test_json_is_deterministic_regardless_of_input_order() {
        let forward = Dataset::build(sample_elements()).unwrap().to_json().unwrap();
        let mut reversed = sample_elements();
        reversed.reverse();
        let backward = Dataset::build(reversed).unwrap().to_json().unwrap();
        assert_eq!(forward, backward);
        assert!(forward.ends_with('\n'));
    }

    #[test]
    fn test_json_layout() {
        let dataset = Dataset::build(vec![
            Element::new("Air", 0, Vec::new(), None),
            Element::new("Dust", 1, vec![Recipe::new("Earth", "Air")], None),
        ])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&dataset.to_json().unwrap()).unwrap();

        assert_eq!(value["total"], 2);
        assert_eq!(value["elements"][1]["id"], "dust");
        assert_eq!(value["elements"][0]["iconRef"], serde_json::Value::Null);
        assert_eq!(value["usedIn"]["air"][0], "dust");
        assert_eq!(value["tierNames"]["0"], "Starting Elements");
        assert_eq!(value["tierNames"]["1"], "Tier 1");
    }

    #[test]
    fn test_from_json_restores_lookup_api() {
        let original = Dataset::build(sample_elements()).unwrap();
        let restored = Dataset::from_json(&original.to_json().unwrap()).unwrap();

        assert_eq!(restored.all(), original.all());
        assert_eq!(restored.reverse_index(), original.reverse_index());
        assert_eq!(restored.get_by_id("steam").unwrap().tier, 2);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Dataset::from_json("{\"elements\": 3}"),
            Err(DatasetError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_write_creates_parents_and_load_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("elements.json");
        let dataset = Dataset::build(sample_elements()).unwrap();

        dataset.write(&path).await.unwrap();

        assert!(!temp_path(&path).exists());
        let loaded = Dataset::load(&path).unwrap();
        assert_eq!(loaded.all(), dataset.all());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            dataset.to_json().unwrap()
        );
    }
}
