//! Typed, cross-referenced element dataset.
//!
//! - [`normalize_id`] turns display names into keys
//! - [`DatasetBuilder`] collects discovered elements in document order
//! - [`ReverseIndex`] maps each ingredient to the elements that use it
//! - [`Dataset`] is the sorted artifact and the read-only lookup API
//!
//! # Example
//!
//! ```
//! use alchemy_core::dataset::{Dataset, Element, Recipe};
//!
//! let dataset = Dataset::build(vec![
//!     Element::new("Earth", 0, Vec::new(), None),
//!     Element::new("Dust", 1, vec![Recipe::new("Earth", "Air")], None),
//! ])
//! .unwrap();
//!
//! assert_eq!(dataset.get_by_id("dust").map(|e| e.tier), Some(1));
//! assert_eq!(dataset.used_in("air"), ["dust"]);
//! ```

mod artifact;
mod builder;
mod error;
mod model;
mod normalize;
mod reverse_index;

pub use artifact::Dataset;
pub use builder::{DatasetBuilder, Discovered, IdConflict, InsertOutcome};
pub use error::DatasetError;
pub use model::{Element, Recipe, SPECIAL_TIER, STARTING_TIER, is_base_tier, tier_label};
pub use normalize::{ID_SEPARATOR, normalize_id};
pub use reverse_index::ReverseIndex;
