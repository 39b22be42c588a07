//! Tier sections: headings, their tier, and the table each one introduces.
//!
//! Association is done in two passes. The first walks the document once and
//! records a flat, ordered list of heading and table markers. The second pairs
//! each table with the nearest preceding heading that has not yet claimed a
//! table. Any heading of the section level closes the previous section, so a
//! table is never attributed across a heading.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::element_text;
use crate::dataset::{SPECIAL_TIER, STARTING_TIER};

/// Heading element that opens a tier section.
pub const SECTION_HEADING_TAG: &str = "h3";

/// Selector for the element list tables.
pub const ELEMENT_TABLE_SELECTOR: &str = "table.list-table";

#[allow(clippy::expect_used)]
static MARKER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("{SECTION_HEADING_TAG}, {ELEMENT_TABLE_SELECTOR}"))
        .expect("marker selector is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static HEADLINE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".mw-headline").expect("headline selector is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static TIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tier\s*(\d+)").expect("tier regex is valid") // Static pattern, safe to panic
});

/// Classifies heading text into a tier.
///
/// Rules, first match wins (case-insensitive):
/// 1. contains `starting` → 0
/// 2. contains `special` → -1
/// 3. contains `tier <n>` → `n`
/// 4. anything else → 0
///
/// The last rule is deliberately permissive: an unrecognized heading is
/// treated as the starting tier instead of being rejected.
#[must_use]
pub fn classify_tier(heading: &str) -> i32 {
    let lower = heading.to_lowercase();
    if lower.contains("starting") {
        return STARTING_TIER;
    }
    if lower.contains("special") {
        return SPECIAL_TIER;
    }
    if let Some(digits) = TIER_PATTERN.captures(&lower).and_then(|c| c.get(1)) {
        match digits.as_str().parse::<i32>() {
            Ok(tier) => return tier,
            Err(_) => warn!(heading, "tier number out of range; using starting tier"),
        }
    } else {
        debug!(heading, "heading matches no tier pattern; using starting tier");
    }
    STARTING_TIER
}

/// One entry of the flat document-order marker list.
#[derive(Debug, Clone)]
pub(crate) enum Marker<'a> {
    /// A section heading with non-empty text.
    Heading { text: String, tier: i32 },
    /// A section-level heading without text; ends the open section only.
    Boundary,
    /// An element list table.
    Table(ElementRef<'a>),
}

/// A heading paired with the table it introduces, if any.
#[derive(Debug, Clone)]
pub(crate) struct SectionPlan<'a> {
    pub heading: String,
    pub tier: i32,
    pub table: Option<ElementRef<'a>>,
}

/// First pass: headings and tables in document order.
pub(crate) fn collect_markers(document: &Html) -> Vec<Marker<'_>> {
    document
        .select(&MARKER_SELECTOR)
        .map(|node| {
            if node.value().name() == SECTION_HEADING_TAG {
                let text = heading_text(node);
                if text.is_empty() {
                    Marker::Boundary
                } else {
                    let tier = classify_tier(&text);
                    Marker::Heading { text, tier }
                }
            } else {
                Marker::Table(node)
            }
        })
        .collect()
}

/// Second pass: pair each table with the nearest preceding unclaimed heading.
pub(crate) fn associate(markers: Vec<Marker<'_>>) -> Vec<SectionPlan<'_>> {
    let mut sections: Vec<SectionPlan<'_>> = Vec::new();
    let mut open: Option<usize> = None;

    for marker in markers {
        match marker {
            Marker::Heading { text, tier } => {
                open = Some(sections.len());
                sections.push(SectionPlan {
                    heading: text,
                    tier,
                    table: None,
                });
            }
            Marker::Boundary => open = None,
            Marker::Table(table) => match open.take() {
                Some(index) => sections[index].table = Some(table),
                None => debug!("element table without an open section heading; ignoring"),
            },
        }
    }

    sections
}

/// Prefers the `.mw-headline` span; falls back to the heading's own text.
fn heading_text(heading: ElementRef<'_>) -> String {
    heading
        .select(&HEADLINE_SELECTOR)
        .next()
        .map_or_else(|| element_text(heading), element_text)
}
