//! Writing a harvested [`Dataset`] to an `.xlsx` workbook.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use umya_spreadsheet::{new_file, writer};

use crate::model::Dataset;
use crate::{Error, Result, FILE_STEM};

const SHEET: &str = "Sheet1";

/// `<stem>_YYYYmmdd_HHMMSS.xlsx`
pub fn default_file_name(now: DateTime<Local>) -> String {
    format!("{FILE_STEM}_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

/// Joins the explicit file name, or the timestamped default, onto `dir`.
pub fn resolve_path(dir: &Path, file_name: Option<&str>, now: DateTime<Local>) -> PathBuf {
    match file_name {
        Some(name) if !name.trim().is_empty() => dir.join(name.trim()),
        _ => dir.join(default_file_name(now)),
    }
}

/// Header in row 1, one row per data row, every cell as a string.
/// Creates missing parent directories and returns the written path.
pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut book = new_file();
    let sheet = book
        .get_sheet_by_name_mut(SHEET)
        .ok_or_else(|| Error::Export(format!("workbook has no {SHEET}")))?;

    // Excel uses 1-based indexing
    for (col_idx, name) in dataset.header.iter().enumerate() {
        sheet
            .get_cell_mut((col_idx as u32 + 1, 1u32))
            .set_value_string(name.as_str());
    }
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let row_num = row_idx as u32 + 2;
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .get_cell_mut((col_idx as u32 + 1, row_num))
                .set_value_string(value.as_str());
        }
    }

    writer::xlsx::write(&book, path)
        .map_err(|e| Error::Export(format!("Failed to write {}: {e}", path.display())))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_name_is_timestamped() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(default_file_name(now), "课表查询结果_20240305_140709.xlsx");
    }

    #[test]
    fn override_wins_over_default() {
        let now = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let dir = Path::new("out");
        assert_eq!(
            resolve_path(dir, Some("courses.xlsx"), now),
            dir.join("courses.xlsx")
        );
        assert_eq!(
            resolve_path(dir, Some("  "), now),
            dir.join("课表查询结果_20240305_140709.xlsx")
        );
    }
}
