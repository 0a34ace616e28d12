use std::path::PathBuf;

use chrono::Local;
use scraper::Html;

use crate::browser::ChromiumDriver;
use crate::config::Config;
use crate::driver::Driver;
use crate::locate::locate;
use crate::model::Dataset;
use crate::navigate::PageNavigator;
use crate::paginate::inspect;
use crate::parse::extract;
use crate::settle::{fingerprint, wait_for_rows, SettleOptions, Settled};
use crate::{export, info_time, portal, Error, Result};

#[derive(Debug, Clone, Default)]
pub struct HarvestOptions {
    pub settle: SettleOptions,
}

/// Why a later page contributed no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NavigationFailed,
    ExtractionEmpty,
    /// The grid still showed the previous page's rows.
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub pages_total: u32,
    pub pages_read: u32,
    pub skipped: Vec<(u32, SkipReason)>,
}

#[derive(Debug, Clone)]
pub struct Harvest {
    pub dataset: Dataset,
    pub report: HarvestReport,
}

/// Locates the grid, reads page 1 and then walks pages `2..=N`, accumulating rows.
///
/// An unreadable page 1 aborts the harvest before any navigation. Later pages that
/// can't be reached or read are logged, recorded in the report and skipped. The grid
/// id found up front is used for every page.
pub async fn harvest(driver: &dyn Driver, opts: &HarvestOptions) -> Result<Harvest> {
    let start_time = Local::now();
    let html = driver.snapshot().await?;
    let (grid, pages, first, mut before) = {
        let doc = Html::parse_document(&html);
        let grid = locate(&doc).ok_or(Error::GridNotFound)?;
        let pages = inspect(&doc, &grid);
        let first = extract(&doc, &grid);
        let before = fingerprint(&doc, &grid);
        (grid, pages, first, before)
    };
    info_time!("Using grid {grid}, {pages} page(s)");

    if first.is_empty() {
        return Err(Error::FirstPageEmpty);
    }
    info_time!("Page 1: {} rows", first.rows.len());

    let mut dataset = first;
    let mut report = HarvestReport {
        pages_total: pages.get(),
        pages_read: 1,
        skipped: Vec::new(),
    };
    let mut navigator = PageNavigator::new(grid.clone());

    for page in 2..=pages.get() {
        let shown = navigator.current();
        if !navigator.goto(driver, page).await {
            tracing::warn!("Couldn't navigate to page {page}, skipping");
            report.skipped.push((page, SkipReason::NavigationFailed));
            continue;
        }

        match wait_for_rows(driver, &grid, Some(before), &opts.settle).await {
            Settled::Stable(rows) => tracing::debug!("Page {page} settled with {rows} rows"),
            Settled::TimedOut => tracing::debug!("Page {page} didn't settle in time, reading anyway"),
            Settled::Unchanged => {
                tracing::warn!("Grid still shows page {shown} instead of page {page}, skipping");
                navigator.reset(shown);
                report.skipped.push((page, SkipReason::Unchanged));
                continue;
            }
        }

        let page_data = match driver.snapshot().await {
            Ok(html) => {
                let doc = Html::parse_document(&html);
                before = fingerprint(&doc, &grid);
                extract(&doc, &grid)
            }
            Err(err) => {
                tracing::warn!("Couldn't snapshot page {page}: {err}");
                Dataset::default()
            }
        };

        if page_data.rows.is_empty() {
            tracing::warn!("Couldn't read any rows from page {page}");
            report.skipped.push((page, SkipReason::ExtractionEmpty));
            continue;
        }
        info_time!("Page {page}: {} rows", page_data.rows.len());
        dataset.extend_rows(page_data.rows);
        report.pages_read += 1;
    }

    info_time!(
        start_time,
        "Harvested {} rows from {}/{} pages",
        dataset.rows.len(),
        report.pages_read,
        report.pages_total
    );
    Ok(Harvest { dataset, report })
}

/// Full run: launch Chrome, let the operator log in, harvest, export. The browser is
/// closed whatever the outcome. Returns the path of the written spreadsheet.
pub async fn process_site(config: &Config) -> Result<PathBuf> {
    let driver = ChromiumDriver::launch(&config.launch).await?;
    let result = process_with(&driver, config).await;
    if let Err(err) = driver.close().await {
        tracing::warn!("Couldn't close the browser cleanly: {err}");
    }
    result
}

/// Everything after the browser is up, against any [`Driver`].
pub async fn process_with(driver: &dyn Driver, config: &Config) -> Result<PathBuf> {
    portal::open(driver, &config.url).await?;
    if config.wait_for_operator {
        portal::await_operator().await?;
    }
    tokio::time::sleep(config.initial_delay).await;

    let Harvest { dataset, report } = harvest(driver, &config.harvest).await?;
    if !report.skipped.is_empty() {
        tracing::warn!("Skipped pages: {:?}", report.skipped);
    }

    let path = export::resolve_path(&config.out_dir, config.file_name.as_deref(), Local::now());
    let start_time = Local::now();
    let (width, height) = (dataset.width(), dataset.rows.len());
    let written =
        tokio::task::spawn_blocking(move || export::write_xlsx(&dataset, &path)).await??;
    info_time!(
        start_time,
        "Wrote {width} columns, {height} rows to {}",
        written.display()
    );

    Ok(written)
}

