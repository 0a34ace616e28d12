//! Reading the rendered rows of a grid.
//!
//! Header cells without text are dropped before the leading checkbox column is
//! stripped. A multiselect header whose checkbox cell has no label therefore loses its
//! first real column name instead, and column reconciliation fills the tail with
//! `Column i` placeholders.

use scraper::{ElementRef, Html};

use crate::dom::{is_visible, select_all, select_within, text_of};
use crate::model::{id_selector, DataRow, Dataset, GridHandle, HeaderRow};

const HEADER_CELLS: &str = ".ui-jqgrid-htable th div.ui-jqgrid-sortable";
const DATA_ROWS: &str = "tr.jqgrow";

/// Reads the grid's currently rendered page and normalizes it.
/// Returns an empty dataset when the grid element isn't in the snapshot.
pub fn extract(doc: &Html, grid: &GridHandle) -> Dataset {
    let Some(table) = select_all(doc, &grid.selector()).into_iter().next() else {
        tracing::warn!("No element with id {grid} in the page");
        return Dataset::default();
    };

    let header = parse_header(doc, grid);
    let rows = parse_rows(table);
    tracing::debug!("Extracted {} header cells, {} rows", header.len(), rows.len());

    Dataset::new(header, rows).normalize()
}

/// Visible sortable header cells, scoped to the grid's view container when it has one.
fn parse_header(doc: &Html, grid: &GridHandle) -> HeaderRow {
    let view = select_all(doc, &id_selector(&format!("gview_{}", grid.id())))
        .into_iter()
        .next();
    let cells = match view {
        Some(view) if !select_within(view, HEADER_CELLS).is_empty() => {
            select_within(view, HEADER_CELLS)
        }
        _ => select_all(doc, HEADER_CELLS),
    };

    cells
        .into_iter()
        .filter(|el| is_visible(*el))
        .map(text_of)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Data rows (pager and footer rows carry other classes), keeping only rows with
/// some non-blank cell.
fn parse_rows(table: ElementRef<'_>) -> Vec<DataRow> {
    select_within(table, DATA_ROWS)
        .into_iter()
        .map(parse_row)
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect()
}

fn parse_row(row: ElementRef<'_>) -> DataRow {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td" && is_visible(*cell))
        .map(cell_value)
        .collect()
}

/// The grid truncates long values in the cell body and keeps the full text in `title`.
fn cell_value(cell: ElementRef<'_>) -> String {
    match cell.value().attr("title") {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => text_of(cell),
    }
}
