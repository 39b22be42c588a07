//! Typed records of the element dataset.

use serde::{Deserialize, Serialize};

use super::normalize::normalize_id;

/// Tier of the elements available from the start.
pub const STARTING_TIER: i32 = 0;

/// Tier of elements outside the unlock progression.
pub const SPECIAL_TIER: i32 = -1;

/// Two ingredient names that combine into an element.
///
/// Names are kept as authored in the source document; resolve them with
/// [`Recipe::ingredient_ids`]. Order is preserved but carries no meaning, and
/// `a + b` and `b + a` are not merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: [String; 2],
}

impl Recipe {
    /// Creates a recipe from two ingredient names.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            ingredients: [first.into(), second.into()],
        }
    }

    /// Canonical identifiers of both ingredients.
    #[must_use]
    pub fn ingredient_ids(&self) -> [String; 2] {
        [
            normalize_id(&self.ingredients[0]),
            normalize_id(&self.ingredients[1]),
        ]
    }
}

/// One element of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Canonical identifier, always `normalize_id(name)`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tier; see [`STARTING_TIER`] and [`SPECIAL_TIER`].
    pub tier: i32,
    /// Recipes producing this element, in source order.
    pub recipes: Vec<Recipe>,
    /// Canonical (un-scaled) icon URL, when the row had one.
    pub icon_ref: Option<String>,
}

impl Element {
    /// Creates an element, deriving its id from `name`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        tier: i32,
        recipes: Vec<Recipe>,
        icon_ref: Option<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: normalize_id(&name),
            name,
            tier,
            recipes,
            icon_ref,
        }
    }

    /// Whether this element belongs to a tier that never has recipes.
    #[must_use]
    pub fn is_base_tier(&self) -> bool {
        is_base_tier(self.tier)
    }
}

/// Whether `tier` is the starting or special tier.
#[must_use]
pub fn is_base_tier(tier: i32) -> bool {
    tier == STARTING_TIER || tier == SPECIAL_TIER
}

/// Display label for a tier, as used by the grouped element view.
#[must_use]
pub fn tier_label(tier: i32) -> String {
    match tier {
        STARTING_TIER => "Starting Elements".to_string(),
        SPECIAL_TIER => "Special Element".to_string(),
        n => format!("Tier {n}"),
    }
}
