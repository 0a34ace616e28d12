//! Waiting for the grid to finish re-rendering after a pager move.
//!
//! The grid gives no "loading done" signal, so the rows are sampled until two consecutive
//! snapshots agree and differ from what was shown before the move.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use scraper::Html;
use tokio::time::{sleep, Instant};

use crate::dom::{select_all, select_within, text_of};
use crate::driver::Driver;
use crate::model::GridHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleOptions {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(crate::SETTLE_TIMEOUT_MS),
            poll: Duration::from_millis(crate::POLL_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Rows present and unchanged across two samples.
    Stable(usize),
    /// Still showing exactly what was there before the move when time ran out.
    Unchanged,
    TimedOut,
}

/// Row count and a hash of the rows' text for the grid in `doc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub rows: usize,
    pub hash: u64,
}

pub fn fingerprint(doc: &Html, grid: &GridHandle) -> Fingerprint {
    let mut hasher = DefaultHasher::new();
    let mut rows = 0;
    if let Some(table) = select_all(doc, &grid.selector()).into_iter().next() {
        for row in select_within(table, "tr.jqgrow") {
            text_of(row).hash(&mut hasher);
            rows += 1;
        }
    }
    Fingerprint {
        rows,
        hash: hasher.finish(),
    }
}

/// Reads the grid's current fingerprint. Snapshot errors read as an empty grid.
pub async fn sample(driver: &dyn Driver, grid: &GridHandle) -> Fingerprint {
    match driver.snapshot().await {
        Ok(html) => fingerprint(&Html::parse_document(&html), grid),
        Err(err) => {
            tracing::debug!("Snapshot failed while settling: {err}");
            Fingerprint { rows: 0, hash: 0 }
        }
    }
}

/// Polls until the grid's rows are non-empty, stable across two samples and different
/// from `before`, or until the timeout. Dropping the future cancels the wait.
pub async fn wait_for_rows(
    driver: &dyn Driver,
    grid: &GridHandle,
    before: Option<Fingerprint>,
    opts: &SettleOptions,
) -> Settled {
    let deadline = Instant::now() + opts.timeout;
    let mut last: Option<Fingerprint> = None;

    loop {
        let current = sample(driver, grid).await;
        let moved = before.map_or(true, |b| b.hash != current.hash || b.rows != current.rows);
        if current.rows > 0 && moved && last == Some(current) {
            return Settled::Stable(current.rows);
        }
        last = Some(current);

        if Instant::now() >= deadline {
            return if moved {
                Settled::TimedOut
            } else {
                Settled::Unchanged
            };
        }
        sleep(opts.poll).await;
    }
}
