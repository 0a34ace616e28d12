use std::fmt;

/// Identifier of the located grid widget in the current page's DOM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridHandle(String);

impl GridHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Attribute selector for the grid element. Avoids `#id` so ids that aren't valid
    /// CSS identifiers still match.
    pub fn selector(&self) -> String {
        id_selector(&self.0)
    }
}

impl fmt::Display for GridHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds `[id="..."]` with the value quoted for CSS.
pub(crate) fn id_selector(id: &str) -> String {
    format!(r#"[id="{}"]"#, id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Total number of result pages. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageCount(u32);

impl PageCount {
    pub const SINGLE: PageCount = PageCount(1);

    /// Returns `None` for 0.
    pub fn new(pages: u32) -> Option<Self> {
        (pages >= 1).then_some(Self(pages))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageCount {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type HeaderRow = Vec<String>;
pub type DataRow = Vec<String>;

/// Header plus rows. Once normalized every row has exactly `header.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub header: HeaderRow,
    pub rows: Vec<DataRow>,
}

impl Dataset {
    pub fn new(header: HeaderRow, rows: Vec<DataRow>) -> Self {
        Self { header, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() || self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Drops the leading selection-checkbox column and reconciles the header and every row
    /// to the widest row. Without rows there is no width to reconcile to, so the raw
    /// dataset is returned.
    pub fn normalize(self) -> Self {
        let Dataset {
            mut header,
            mut rows,
        } = self;
        if rows.is_empty() {
            return Dataset { header, rows };
        }

        if header.len() > 1 {
            header.remove(0);
            for row in rows.iter_mut() {
                if !row.is_empty() {
                    row.remove(0);
                }
            }
        }

        let max_len = rows.iter().map(Vec::len).max().unwrap_or(0);
        if max_len == 0 {
            return Dataset { header, rows };
        }

        while header.len() < max_len {
            header.push(format!("Column {}", header.len() + 1));
        }
        header.truncate(max_len);
        for row in rows.iter_mut() {
            fit_row(row, max_len);
        }

        Dataset { header, rows }
    }

    /// Appends rows from a later page, fitting each to this dataset's width.
    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = DataRow>) {
        let width = self.width();
        self.rows.extend(rows.into_iter().map(|mut row| {
            fit_row(&mut row, width);
            row
        }));
    }
}

#[inline]
fn fit_row(row: &mut DataRow, width: usize) {
    row.resize(width, String::new());
}
