//! Element rows and their recipes.
//!
//! Row layout of an element table:
//! - cell 1: icon `<img>` and a link naming the element
//! - cell 2: either the starting marker text or a `<ul>` with one recipe per
//!   `<li>`, each naming its two ingredients through links

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::debug;

use super::element_text;
use super::icon_url::canonical_icon_ref;
use crate::dataset::Recipe;

/// Text marking an element as available from the start (no recipes).
pub const STARTING_MARKER: &str = "Available from the start";

#[allow(clippy::expect_used)]
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("row selector is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("anchor selector is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static TITLED_ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[title]").expect("titled anchor selector is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("image selector is valid")); // Static pattern, safe to panic

#[allow(clippy::expect_used)]
static LIST_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("list item selector is valid")); // Static pattern, safe to panic

/// One data row of an element table, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRow {
    /// Display name as authored.
    pub name: String,
    /// Canonical icon URL, if the row has a usable image.
    pub icon_ref: Option<String>,
    /// Recipes in source order.
    pub recipes: Vec<Recipe>,
}

/// Counters for content skipped while extracting rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Rows with fewer than two cells or without a name.
    pub rows_skipped: usize,
    /// Recipe list items without two identifiable ingredients.
    pub recipe_items_skipped: usize,
}

/// Extracts every data row of `table`.
pub(crate) fn extract_rows(table: ElementRef<'_>, stats: &mut ExtractStats) -> Vec<ElementRow> {
    let mut rows = Vec::new();

    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();

        let [name_cell, recipe_cell, ..] = cells.as_slice() else {
            stats.rows_skipped += 1;
            continue;
        };

        let Some(name) = element_name(*name_cell) else {
            debug!("row without element name; skipping");
            stats.rows_skipped += 1;
            continue;
        };

        rows.push(ElementRow {
            icon_ref: icon_ref(*name_cell),
            recipes: recipes(*recipe_cell, stats),
            name,
        });
    }

    rows
}

/// First link naming something, preferring its `title` over its visible text.
fn element_name(cell: ElementRef<'_>) -> Option<String> {
    cell.select(&ANCHOR_SELECTOR).find_map(link_name)
}

fn link_name(anchor: ElementRef<'_>) -> Option<String> {
    anchor
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .or_else(|| Some(element_text(anchor)).filter(|text| !text.is_empty()))
}

/// Icon from the first image, preferring the lazy-load source.
fn icon_ref(cell: ElementRef<'_>) -> Option<String> {
    let image = cell.select(&IMAGE_SELECTOR).next()?;
    let attrs = image.value();
    attrs
        .attr("data-src")
        .and_then(canonical_icon_ref)
        .or_else(|| attrs.attr("src").and_then(canonical_icon_ref))
}

fn recipes(cell: ElementRef<'_>, stats: &mut ExtractStats) -> Vec<Recipe> {
    if is_starting_cell(cell) {
        return Vec::new();
    }

    let mut recipes = Vec::new();
    for item in cell.select(&LIST_ITEM_SELECTOR) {
        let mut names = item.select(&TITLED_ANCHOR_SELECTOR).filter_map(link_name);
        match (names.next(), names.next()) {
            (Some(first), Some(second)) => recipes.push(Recipe::new(first, second)),
            _ => {
                debug!(item = %element_text(item), "recipe item without two ingredients; skipping");
                stats.recipe_items_skipped += 1;
            }
        }
    }
    recipes
}

fn is_starting_cell(cell: ElementRef<'_>) -> bool {
    element_text(cell)
        .to_lowercase()
        .contains(&STARTING_MARKER.to_lowercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scraper::Html;

    fn rows_of(table_html: &str) -> (Vec<ElementRow>, ExtractStats) {
        let document = Html::parse_document(table_html);
        let selector = Selector::parse("table").unwrap();
        let table = document.select(&selector).next().unwrap();
        let mut stats = ExtractStats::default();
        let rows = extract_rows(table, &mut stats);
        (rows, stats)
    }

    #[test]
    fn test_row_with_recipes_and_lazy_icon() {
        let (rows, stats) = rows_of(
            r#"<table class="list-table">
                <tr><th>Element</th><th>Recipes</th></tr>
                <tr>
                  <td><a href="/wiki/Dust" class="image"><img src="data:image/gif;base64,R0lGOD"
                        data-src="https://img.example/d/d1/Dust.svg/revision/latest/scale-to-width-down/40?cb=1"></a>
                      <a href="/wiki/Dust" title="Dust">Dust</a></td>
                  <td><ul>
                      <li><a href="/wiki/Earth" title="Earth">Earth</a> + <a href="/wiki/Air" title="Air">Air</a></li>
                  </ul></td>
                </tr>
            </table>"#,
        );

        assert_eq!(
            rows,
            [ElementRow {
                name: "Dust".to_string(),
                icon_ref: Some("https://img.example/d/d1/Dust.svg/revision/latest".to_string()),
                recipes: vec![Recipe::new("Earth", "Air")],
            }]
        );
        assert_eq!(stats.rows_skipped, 1, "header row is skipped");
    }

    #[test]
    fn test_title_preferred_over_truncated_text() {
        let (rows, _) = rows_of(
            r#"<table><tr>
                <td><a href="/wiki/Philosopher%27s_stone" title="Philosopher's stone">Philosopher's st…</a></td>
                <td><ul><li><a title="Stone">St…</a><a title="Philosophy">Ph…</a></li></ul></td>
            </tr></table>"#,
        );
        assert_eq!(rows[0].name, "Philosopher's stone");
        assert_eq!(rows[0].recipes, [Recipe::new("Stone", "Philosophy")]);
    }

    #[test]
    fn test_link_text_used_when_no_title() {
        let (rows, _) = rows_of(
            r#"<table><tr><td><a href="/wiki/Lava">Lava</a></td><td></td></tr></table>"#,
        );
        assert_eq!(rows[0].name, "Lava");
        assert!(rows[0].recipes.is_empty());
        assert_eq!(rows[0].icon_ref, None);
    }

    #[test]
    fn test_starting_marker_wins_over_list_markup() {
        let (rows, stats) = rows_of(
            r#"<table><tr>
                <td><a title="Water">Water</a></td>
                <td>Available from the start
                    <ul><li><a title="Rain">Rain</a> + <a title="Sea">Sea</a></li></ul></td>
            </tr></table>"#,
        );
        assert!(rows[0].recipes.is_empty());
        assert_eq!(stats.recipe_items_skipped, 0);
    }

    #[test]
    fn test_only_first_two_ingredients_form_a_recipe() {
        let (rows, _) = rows_of(
            r#"<table><tr>
                <td><a title="Mud">Mud</a></td>
                <td><ul><li><a title="Water">W</a> + <a title="Earth">E</a> (<a title="Soil">S</a>)</li></ul></td>
            </tr></table>"#,
        );
        assert_eq!(rows[0].recipes, [Recipe::new("Water", "Earth")]);
    }

    #[test]
    fn test_items_with_fewer_than_two_ingredients_are_skipped() {
        let (rows, stats) = rows_of(
            r#"<table><tr>
                <td><a title="Steam">Steam</a></td>
                <td><ul>
                    <li><a title="Water">Water</a> + <a title="Fire">Fire</a></li>
                    <li>see also <a title="Cloud">Cloud</a></li>
                    <li><a href="/wiki/Energy">Energy</a> + <a href="/wiki/Water">Water</a></li>
                    <li><a title="Fire">Fire</a> + <a title="Water">Water</a></li>
                </ul></td>
            </tr></table>"#,
        );
        assert_eq!(
            rows[0].recipes,
            [Recipe::new("Water", "Fire"), Recipe::new("Fire", "Water")],
            "symmetric recipes are kept as authored"
        );
        assert_eq!(stats.recipe_items_skipped, 2);
    }

    #[test]
    fn test_rows_without_name_or_second_cell_are_skipped() {
        let (rows, stats) = rows_of(
            r#"<table>
                <tr><td><a title="Air">Air</a></td></tr>
                <tr><td><img src="x.svg"></td><td>Available from the start</td></tr>
                <tr><td><a title="Fire">Fire</a></td><td>Available from the start</td></tr>
            </table>"#,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Fire");
        assert_eq!(stats.rows_skipped, 2);
    }

    #[test]
    fn test_eager_src_used_without_lazy_source() {
        let (rows, _) = rows_of(
            r#"<table><tr>
                <td><img src="//img.example/e/e1/Earth.svg/revision/latest?cb=2"><a title="Earth">Earth</a></td>
                <td>Available from the start</td>
            </tr></table>"#,
        );
        assert_eq!(
            rows[0].icon_ref.as_deref(),
            Some("https://img.example/e/e1/Earth.svg/revision/latest")
        );
    }
}
