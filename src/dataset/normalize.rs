//! Canonical identifiers for element and ingredient names.
//!
//! [`normalize_id`] is the only place a display name becomes a key. The
//! element table, recipe ingredient resolution and the reverse index all go
//! through it.

/// Separator placed between alphanumeric runs.
pub const ID_SEPARATOR: char = '-';

/// Derives the canonical, URL-safe identifier for a display name.
///
/// Normalization steps:
/// 1. Lower-case ASCII letters
/// 2. Collapse every run of characters outside `[a-z0-9]` into one `-`
/// 3. Trim leading and trailing separators
///
/// The function is idempotent: `normalize_id(&normalize_id(n)) == normalize_id(n)`.
///
/// # Example
///
/// ```
/// use alchemy_core::dataset::normalize_id;
///
/// assert_eq!(normalize_id("Philosopher's Stone"), "philosopher-s-stone");
/// assert_eq!(normalize_id("  Big  Bang!! "), "big-bang");
/// ```
#[must_use]
pub fn normalize_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
            if pending_separator && !id.is_empty() {
                id.push(ID_SEPARATOR);
            }
            pending_separator = false;
            id.push(lower);
        } else {
            pending_separator = true;
        }
    }

    id
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_is_idempotent(name in "\\PC{0,40}") {
            let once = normalize_id(&name);
            prop_assert_eq!(normalize_id(&once), once);
        }

        #[test]
        fn normalized_ids_are_url_safe(name in "\\PC{0,40}") {
            let id = normalize_id(&name);
            prop_assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ID_SEPARATOR));
            prop_assert!(!id.starts_with(ID_SEPARATOR));
            prop_assert!(!id.ends_with(ID_SEPARATOR));
            prop_assert!(!id.contains("--"));
        }

        #[test]
        fn case_does_not_change_id(name in "[A-Za-z0-9 ']{0,30}") {
            prop_assert_eq!(normalize_id(&name.to_uppercase()), normalize_id(&name.to_lowercase()));
        }
    }
}
