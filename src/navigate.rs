//! Driving the grid's pager to a given page.

use scraper::Html;

use crate::dom::{has_class, is_visible, select_all, text_of};
use crate::driver::{Driver, Target};
use crate::model::GridHandle;

const PAGE_INPUT: &str = ".ui-pg-input";
const NEXT_BUTTON: &str = r#"a[role="button"][id^="next_"], td[id^="next_"]"#;
const PAGE_BUTTON: &str = ".ui-pg-button";
const DISABLED: &str = "ui-state-disabled";

/// A concrete pager interaction picked from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Type the page number into the jump box and press Enter.
    Jump(Target),
    /// Click "next page" this many times.
    Next(Target, u32),
    /// Click the button labelled with the page number.
    Button(Target),
}

/// Picks the first applicable interaction for going from `current` to `target`.
pub fn plan(doc: &Html, current: u32, target: u32) -> Option<Move> {
    let inputs = select_all(doc, PAGE_INPUT);
    if let Some(idx) = inputs.iter().position(|el| is_visible(*el)) {
        return Some(Move::Jump(Target::new(PAGE_INPUT, idx)));
    }

    if target > current {
        let next = select_all(doc, NEXT_BUTTON)
            .iter()
            .position(|el| is_visible(*el) && !has_class(*el, DISABLED));
        if let Some(idx) = next {
            return Some(Move::Next(Target::new(NEXT_BUTTON, idx), target - current));
        }
    }

    let label = target.to_string();
    select_all(doc, PAGE_BUTTON)
        .iter()
        .position(|el| text_of(*el) == label)
        .map(|idx| Move::Button(Target::new(PAGE_BUTTON, idx)))
}

/// Moves a grid through its pages, remembering which page it is on.
#[derive(Debug)]
pub struct PageNavigator {
    grid: GridHandle,
    current: u32,
}

impl PageNavigator {
    /// The grid is assumed to show page 1 when harvesting starts.
    pub fn new(grid: GridHandle) -> Self {
        Self { grid, current: 1 }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn grid(&self) -> &GridHandle {
        &self.grid
    }

    /// Records that the grid is actually showing `page`, e.g. after a move the grid ignored.
    pub fn reset(&mut self, page: u32) {
        self.current = page;
    }

    /// Asks the grid to show `page`. Driver faults are logged and reported as `false`;
    /// nothing here checks that the visible rows actually changed.
    pub async fn goto(&mut self, driver: &dyn Driver, page: u32) -> bool {
        if page == self.current {
            return true;
        }
        match self.try_goto(driver, page).await {
            Ok(true) => {
                tracing::info!("Navigated grid {} to page {page}", self.grid);
                self.current = page;
                true
            }
            Ok(false) => {
                tracing::warn!("No pager control could move grid {} to page {page}", self.grid);
                false
            }
            Err(err) => {
                tracing::warn!("Navigating to page {page} failed: {err}");
                false
            }
        }
    }

    async fn try_goto(&self, driver: &dyn Driver, page: u32) -> crate::Result<bool> {
        let html = driver.snapshot().await?;
        let step = plan(&Html::parse_document(&html), self.current, page);
        tracing::debug!(?step, "Pager move for page {page}");
        match step {
            Some(Move::Jump(target)) => driver.fill_and_submit(&target, &page.to_string()).await,
            Some(Move::Next(target, times)) => driver.click(&target, times).await,
            Some(Move::Button(target)) => driver.click(&target, 1).await,
            None => Ok(false),
        }
    }
}
