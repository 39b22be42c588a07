//! Parsing of the wiki element page.
//!
//! [`parse_document`] turns the raw page into tier sections of element rows.
//! It never fails: sections without a table, rows without a name and recipe
//! items without two ingredients are skipped and counted.
//!
//! # Example
//!
//! ```
//! use alchemy_core::parse::parse_document;
//!
//! let page = parse_document(
//!     r#"<h3><span class="mw-headline">Tier 1 elements</span></h3>
//!        <table class="list-table"><tr>
//!          <td><a title="Dust">Dust</a></td>
//!          <td><ul><li><a title="Earth">Earth</a> + <a title="Air">Air</a></li></ul></td>
//!        </tr></table>"#,
//! );
//!
//! assert_eq!(page.sections[0].tier, 1);
//! assert_eq!(page.sections[0].rows[0].name, "Dust");
//! ```

mod extract;
mod icon_url;
mod sections;

use scraper::{ElementRef, Html};
use tracing::{info, instrument, warn};

pub use extract::{ElementRow, ExtractStats, STARTING_MARKER};
pub use icon_url::canonical_icon_ref;
pub use sections::{ELEMENT_TABLE_SELECTOR, SECTION_HEADING_TAG, classify_tier};

/// A tier heading and the element rows of its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text, whitespace-collapsed.
    pub heading: String,
    /// Tier the heading classified into.
    pub tier: i32,
    /// Whether an element table was associated with the heading.
    pub table_found: bool,
    /// Data rows in document order.
    pub rows: Vec<ElementRow>,
}

/// Everything extracted from one page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub sections: Vec<Section>,
    pub stats: ExtractStats,
}

impl ParsedPage {
    /// Number of headings that had no element table.
    #[must_use]
    pub fn missing_tables(&self) -> usize {
        self.sections.iter().filter(|s| !s.table_found).count()
    }
}

/// Parses the page into tier sections.
#[must_use]
#[instrument(skip(html), fields(bytes = html.len()))]
pub fn parse_document(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    let plans = sections::associate(sections::collect_markers(&document));

    let mut stats = ExtractStats::default();
    let mut parsed = Vec::with_capacity(plans.len());

    for plan in plans {
        info!(heading = %plan.heading, tier = plan.tier, "Processing section");
        let rows = match plan.table {
            Some(table) => extract::extract_rows(table, &mut stats),
            None => {
                warn!(heading = %plan.heading, "No table found for section");
                Vec::new()
            }
        };
        parsed.push(Section {
            heading: plan.heading,
            tier: plan.tier,
            table_found: plan.table.is_some(),
            rows,
        });
    }

    ParsedPage {
        sections: parsed,
        stats,
    }
}

/// Text content of `element` with whitespace runs collapsed and trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body>
        <h2>Elements</h2>
        <h3><span class="mw-headline">Starting elements</span></h3>
        <table class="list-table">
          <tr><th>Element</th><th>Recipes</th></tr>
          <tr><td><a title="Air">Air</a></td><td>Available from the start</td></tr>
          <tr><td><a title="Earth">Earth</a></td><td>Available from the start</td></tr>
        </table>
        <h3><span class="mw-headline">Tier 1 elements</span></h3>
        <table class="list-table">
          <tr><td><a title="Dust">Dust</a></td>
              <td><ul><li><a title="Earth">Earth</a> + <a title="Air">Air</a></li>
                      <li>decorative</li></ul></td></tr>
        </table>
        <h3><span class="mw-headline">Tier 2 elements</span></h3>
        <p>Coming soon</p>
      </body></html>"#;

    #[test]
    fn test_parse_document_sections_and_rows() {
        let page = parse_document(PAGE);

        let summary: Vec<_> = page
            .sections
            .iter()
            .map(|s| (s.heading.as_str(), s.tier, s.rows.len()))
            .collect();
        assert_eq!(
            summary,
            [
                ("Starting elements", 0, 2),
                ("Tier 1 elements", 1, 1),
                ("Tier 2 elements", 2, 0),
            ]
        );
        assert_eq!(page.missing_tables(), 1);
        assert_eq!(page.stats.rows_skipped, 1);
        assert_eq!(page.stats.recipe_items_skipped, 1);
    }

    #[test]
    fn test_parse_document_without_sections_is_empty() {
        let page = parse_document("<html><body><p>Page moved</p></body></html>");
        assert!(page.sections.is_empty());
        assert_eq!(page.missing_tables(), 0);
    }

    #[test]
    fn test_parse_document_is_deterministic() {
        assert_eq!(parse_document(PAGE), parse_document(PAGE));
    }
}
