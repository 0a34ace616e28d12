//! Helpers for querying a parsed DOM snapshot.

use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

/// Attribute the browser driver stamps onto elements whose computed `display` is `none`.
pub const HIDDEN_MARKER: &str = "data-display";

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

/// All elements matching `sel_str`, in document order. An invalid selector matches nothing.
pub(crate) fn select_all<'a>(doc: &'a Html, sel_str: &str) -> Vec<ElementRef<'a>> {
    match create_selector(sel_str) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(err) => {
            tracing::debug!("{err}");
            Vec::new()
        }
    }
}

/// Descendants of `root` matching `sel_str`.
pub(crate) fn select_within<'a>(root: ElementRef<'a>, sel_str: &str) -> Vec<ElementRef<'a>> {
    match create_selector(sel_str) {
        Ok(sel) => root.select(&sel).collect(),
        Err(err) => {
            tracing::debug!("{err}");
            Vec::new()
        }
    }
}

pub(crate) fn exists(doc: &Html, sel_str: &str) -> bool {
    !select_all(doc, sel_str).is_empty()
}

/// Non-empty `id` attribute.
pub(crate) fn id_of(el: ElementRef<'_>) -> Option<String> {
    el.value()
        .attr("id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
}

pub(crate) fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Concatenated text content, trimmed.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Whether the element would be rendered: neither it nor any ancestor is hidden.
pub(crate) fn is_visible(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .all(|e| !hides_itself(e))
}

fn hides_itself(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if value.attr("hidden").is_some() {
        return true;
    }
    if value
        .attr(HIDDEN_MARKER)
        .is_some_and(|d| d.trim().eq_ignore_ascii_case("none"))
    {
        return true;
    }
    value.attr("style").is_some_and(style_hides)
}

/// Inline `display: none`, ignoring case, spacing and `!important`.
fn style_hides(style: &str) -> bool {
    style.split(';').any(|decl| {
        let Some((prop, val)) = decl.split_once(':') else {
            return false;
        };
        prop.trim().eq_ignore_ascii_case("display")
            && val
                .trim()
                .trim_end_matches("!important")
                .trim()
                .eq_ignore_ascii_case("none")
    })
}

/// Parses the leading integer of `text`, ignoring thousands separators and whitespace.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '，' | ' ' | '\u{a0}'))
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_by_ancestor_style() {
        let doc = Html::parse_document(
            r#"<table><tr><th style="width:10px; DISPLAY : none !important"><div id="x">A</div></th></tr></table>"#,
        );
        let el = select_all(&doc, "#x")[0];
        assert!(!is_visible(el));
    }

    #[test]
    fn hidden_by_marker_and_attribute() {
        let doc = Html::parse_document(
            r#"<div><span id="a" data-display="none">a</span><span id="b" hidden>b</span><span id="c" style="display:block">c</span></div>"#,
        );
        assert!(!is_visible(select_all(&doc, "#a")[0]));
        assert!(!is_visible(select_all(&doc, "#b")[0]));
        assert!(is_visible(select_all(&doc, "#c")[0]));
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let doc = Html::parse_document("<p>hi</p>");
        assert!(select_all(&doc, "p[").is_empty());
        assert!(matches!(create_selector("p["), Err(Error::InvalidSelector(_))));
    }

    #[test]
    fn counts_with_separators() {
        assert_eq!(parse_count(" 1,234 "), Some(1234));
        assert_eq!(parse_count("12 页"), Some(12));
        assert_eq!(parse_count("页"), None);
    }
}
