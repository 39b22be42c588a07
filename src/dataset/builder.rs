//! Accumulates discovered elements in document order.
//!
//! The builder is owned by a single pipeline run and handed along by value;
//! it enforces id uniqueness and the no-recipes rule for base tiers as
//! elements arrive.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::model::Element;

/// Two distinct display names that normalize to the same id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdConflict {
    /// The shared identifier.
    pub id: String,
    /// Name of the element that was kept.
    pub kept: String,
    /// Name of the element that was dropped.
    pub dropped: String,
}

/// What happened to an element passed to [`DatasetBuilder::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The element was added.
    Added,
    /// The same name was already present; the later row was ignored.
    Duplicate,
    /// A different name with the same id was already present.
    Conflict(IdConflict),
    /// The name normalizes to an empty id and cannot be keyed.
    EmptyId,
}

/// Ordered, id-unique collection of discovered elements.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    elements: Vec<Element>,
    positions: HashMap<String, usize>,
    conflicts: Vec<IdConflict>,
    duplicates: usize,
}

impl DatasetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element unless its id is already taken.
    ///
    /// Starting and special elements lose any recipes they arrive with.
    pub fn insert(&mut self, mut element: Element) -> InsertOutcome {
        if element.id.is_empty() {
            warn!(name = %element.name, "element name has no identifier characters; skipping");
            return InsertOutcome::EmptyId;
        }

        if let Some(&position) = self.positions.get(&element.id) {
            let existing = &self.elements[position];
            if existing.name == element.name {
                debug!(id = %element.id, "element listed more than once; keeping first");
                self.duplicates += 1;
                return InsertOutcome::Duplicate;
            }
            let conflict = IdConflict {
                id: element.id.clone(),
                kept: existing.name.clone(),
                dropped: element.name,
            };
            warn!(
                id = %conflict.id,
                kept = %conflict.kept,
                dropped = %conflict.dropped,
                "distinct names share an id; keeping first"
            );
            self.conflicts.push(conflict.clone());
            return InsertOutcome::Conflict(conflict);
        }

        if element.is_base_tier() && !element.recipes.is_empty() {
            warn!(
                id = %element.id,
                tier = element.tier,
                recipes = element.recipes.len(),
                "base-tier element listed with recipes; dropping them"
            );
            element.recipes.clear();
        }

        self.positions
            .insert(element.id.clone(), self.elements.len());
        self.elements.push(element);
        InsertOutcome::Added
    }

    /// Number of distinct elements collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Finishes collection, returning elements in discovery order.
    #[must_use]
    pub fn finish(self) -> Discovered {
        Discovered {
            elements: self.elements,
            conflicts: self.conflicts,
            duplicates: self.duplicates,
        }
    }
}

/// Result of the discovery stages, before sorting.
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    /// Elements in source-document order.
    pub elements: Vec<Element>,
    /// Id conflicts encountered.
    pub conflicts: Vec<IdConflict>,
    /// Rows ignored because their element was already listed.
    pub duplicates: usize,
}
