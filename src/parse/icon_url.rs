//! Canonical icon references.
//!
//! Wiki image URLs arrive protocol-relative, scaled and pinned to a revision,
//! e.g. `//static.example/images/a/ab/Air.svg/revision/latest/scale-to-width-down/40?cb=2019`.
//! The stored form is the un-scaled asset at its latest revision, so consumers
//! can apply their own scaling.

use std::sync::LazyLock;

use regex::Regex;

/// Marker separating the asset path from its revision/scaling suffix.
const REVISION_MARKER: &str = "/revision/";

#[allow(clippy::expect_used)]
static SCALE_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/scale-to-width-down/\d+").expect("scale regex is valid") // Static pattern, safe to panic
});

/// Rewrites a raw `src`/`data-src` value into its canonical form.
///
/// Returns `None` for empty values and inline `data:` URIs (lazy-load
/// placeholders), which are not icon references.
#[must_use]
pub fn canonical_icon_ref(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }

    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    };

    let canonical = match absolute.split_once(REVISION_MARKER) {
        Some((asset, _)) => format!("{asset}{REVISION_MARKER}latest"),
        None => SCALE_SEGMENT.replace_all(&absolute, "").into_owned(),
    };

    Some(canonical)
}
