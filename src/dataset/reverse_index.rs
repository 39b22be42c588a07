//! The "used-in" index: ingredient id to the ids of elements consuming it.
//!
//! Rebuilt from scratch from the element recipes on every run. Keys are not
//! guaranteed to name a known element (ingredient synonyms, elements the
//! scrape did not reach), so lookups are best-effort.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::model::Element;

/// Mapping from ingredient id to the sorted ids of elements that use it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReverseIndex(BTreeMap<String, Vec<String>>);

impl ReverseIndex {
    /// Builds the index from every recipe of every element.
    ///
    /// Each entry is sorted by id and free of duplicates, independent of the
    /// order of `elements`.
    #[must_use]
    #[instrument(skip(elements), fields(elements = elements.len()))]
    pub fn build(elements: &[Element]) -> Self {
        let mut accumulator: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();

        for element in elements {
            for recipe in &element.recipes {
                for ingredient_id in recipe.ingredient_ids() {
                    accumulator
                        .entry(ingredient_id)
                        .or_default()
                        .insert(element.id.as_str());
                }
            }
        }

        Self(
            accumulator
                .into_iter()
                .map(|(ingredient, users)| {
                    (ingredient, users.into_iter().map(str::to_string).collect())
                })
                .collect(),
        )
    }

    /// Ids of the elements whose recipes use `ingredient_id`; empty if none.
    #[must_use]
    pub fn used_in(&self, ingredient_id: &str) -> &[String] {
        self.0.get(ingredient_id).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct ingredient ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ingredient-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
