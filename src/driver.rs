//! Browser automation primitives the harvest depends on.
//!
//! The core only ever reads the page through [`Driver::snapshot`] and acts on it through
//! [`Driver::fill_and_submit`] and [`Driver::click`], so it doesn't care which automation
//! technology is behind the trait.

use std::fmt;

use async_trait::async_trait;

use crate::Result;

/// The `index`-th element matching a CSS selector, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub selector: String,
    pub index: usize,
}

impl Target {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.selector, self.index)
    }
}

#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate the page to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Serialized DOM of the current page, with live form values and computed
    /// `display: none` stamped onto the markup.
    async fn snapshot(&self) -> Result<String>;

    /// Sets the target's value and dispatches an Enter keypress on it.
    /// `false` when the target doesn't exist.
    async fn fill_and_submit(&self, target: &Target, value: &str) -> Result<bool>;

    /// Clicks the target `times` times. `false` when the target doesn't exist.
    async fn click(&self, target: &Target, times: u32) -> Result<bool>;

    /// Releases the browser session. Calling it twice is harmless.
    async fn close(&self) -> Result<()>;
}
