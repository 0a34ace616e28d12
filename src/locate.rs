//! Finding the active grid widget in a page snapshot.
//!
//! Heuristics are tried strictly in order and the first one that yields an id wins.

use scraper::Html;

use crate::dom::{exists, id_of, select_all};
use crate::model::{id_selector, GridHandle};

/// Prefix jqGrid puts on the outer container of a grid: `gbox_<grid id>`.
const CONTAINER_PREFIX: &str = "gbox_";

pub type Strategy = fn(&Html) -> Option<GridHandle>;

/// Named detection strategies in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("data table class", by_table_class),
    ("grid container", by_container),
    ("grid role", by_role),
];

/// Runs the strategies against `doc`. `None` means no grid was found.
pub fn locate(doc: &Html) -> Option<GridHandle> {
    locate_with(doc, STRATEGIES)
}

pub fn locate_with(doc: &Html, strategies: &[(&str, Strategy)]) -> Option<GridHandle> {
    strategies.iter().find_map(|(name, strategy)| {
        let grid = strategy(doc)?;
        tracing::info!(strategy = *name, "Detected grid id: {grid}");
        Some(grid)
    })
}

fn by_table_class(doc: &Html) -> Option<GridHandle> {
    select_all(doc, "table.ui-jqgrid-btable")
        .into_iter()
        .next()
        .and_then(id_of)
        .map(GridHandle::new)
}

fn by_container(doc: &Html) -> Option<GridHandle> {
    select_all(doc, "div.ui-jqgrid")
        .into_iter()
        .filter_map(id_of)
        .filter_map(|id| id.strip_prefix(CONTAINER_PREFIX).map(String::from))
        .filter(|id| !id.is_empty())
        .find(|id| exists(doc, &id_selector(id)))
        .map(GridHandle::new)
}

fn by_role(doc: &Html) -> Option<GridHandle> {
    select_all(doc, r#"table[role="grid"]"#)
        .into_iter()
        .next()
        .and_then(id_of)
        .map(GridHandle::new)
}
