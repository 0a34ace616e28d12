//! Working out how many result pages a grid has.
//!
//! Absence of a pager is the common case (single page result), so nothing here fails:
//! every unreadable signal falls through to the next strategy and finally to one page.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::dom::{parse_count, select_all, select_within, text_of};
use crate::model::{id_selector, GridHandle, PageCount};

static TOTAL_RECORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"共\s*(\d[\d,]*)\s*条", r"(?i)\bof\s+(\d[\d,]*)"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

pub type Strategy = fn(&Html, &GridHandle) -> Option<PageCount>;

/// Named pagination signals in priority order.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("records summary", from_records_summary),
    ("page count span", from_page_span),
];

/// Total pages for `grid`, 1 when no signal can be read.
pub fn inspect(doc: &Html, grid: &GridHandle) -> PageCount {
    let found = STRATEGIES.iter().find_map(|(name, strategy)| {
        let pages = strategy(doc, grid)?;
        tracing::info!(strategy = *name, "Total pages: {pages}");
        Some(pages)
    });
    found.unwrap_or_else(|| {
        tracing::debug!("No pagination signal for grid {grid}, assuming a single page");
        PageCount::SINGLE
    })
}

/// Runs `sel_str` inside the grid's own pager when it exists, over the whole document otherwise.
fn pager_select<'a>(doc: &'a Html, grid: &GridHandle, sel_str: &str) -> Vec<ElementRef<'a>> {
    let pager = select_all(doc, &id_selector(&format!("pager_{}", grid.id())))
        .into_iter()
        .next();
    if let Some(pager) = pager {
        let found = select_within(pager, sel_str);
        if !found.is_empty() {
            return found;
        }
    }
    select_all(doc, sel_str)
}

fn from_records_summary(doc: &Html, grid: &GridHandle) -> Option<PageCount> {
    let summary = pager_select(doc, grid, r#"[id$="_right"] .ui-paging-info"#)
        .into_iter()
        .next()
        .map(text_of)?;
    let total = total_records(&summary)?;
    let per_page = pager_select(doc, grid, ".ui-pg-selbox")
        .into_iter()
        .next()
        .and_then(selected_value)
        .and_then(|v| parse_count(&v))
        .filter(|n| *n > 0)?;

    let pages = total.div_ceil(per_page);
    PageCount::new(u32::try_from(pages).ok()?)
}

fn from_page_span(doc: &Html, grid: &GridHandle) -> Option<PageCount> {
    let text = pager_select(doc, grid, r#"span[id^="sp_1_"]"#)
        .into_iter()
        .next()
        .map(text_of)?;
    let pages = parse_count(&text)?;
    PageCount::new(u32::try_from(pages).ok()?)
}

fn total_records(summary: &str) -> Option<u64> {
    TOTAL_RECORDS
        .iter()
        .find_map(|re| re.captures(summary))
        .and_then(|caps| parse_count(caps.get(1)?.as_str()))
}

/// Current value of a `<select>`: the `selected` option, else the first one.
fn selected_value(select: ElementRef<'_>) -> Option<String> {
    let options = select_within(select, "option");
    let option = options
        .iter()
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| options.first())?;
    Some(
        option
            .value()
            .attr("value")
            .map(String::from)
            .unwrap_or_else(|| text_of(*option)),
    )
}
