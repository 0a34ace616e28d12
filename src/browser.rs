//! Chromium-backed [`Driver`] using chromiumoxide.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::driver::{Driver, Target};
use crate::{Error, Result};

/// Elements whose computed visibility the extraction heuristics care about.
const STAMPED: &str = r#"th, td, tr, .ui-jqgrid, .ui-jqgrid-sortable, .ui-jqgrid-pager, .ui-pg-input, .ui-pg-button, .ui-pg-selbox, [id^="next_"]"#;

/// Find a Chrome/Chromium binary on `PATH`.
pub fn find_chrome() -> Option<PathBuf> {
    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
}

pub struct ChromiumDriver {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launches Chrome with a single blank tab. Headful unless asked otherwise, since the
    /// operator has to log in through the window.
    pub async fn launch(opts: &LaunchOptions) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--start-maximized");
        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(exe) = opts.executable.clone().or_else(find_chrome) {
            tracing::debug!("Using Chrome at {}", exe.display());
            builder = builder.chrome_executable(exe);
        }
        let config = builder.build().map_err(|err| {
            tracing::debug!("Browser config: {err}");
            Error::ChromeNotFound
        })?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!("CDP handler stopped: {err}");
                    break;
                }
            }
        });
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
        })
    }

    async fn eval_bool(&self, script: String) -> Result<bool> {
        let value: serde_json::Value = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| Error::Browser(e.to_string()))?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

/// JSON-quotes `s` so it can be spliced into a script as a string literal.
fn js_str(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn snapshot_script() -> String {
    format!(
        r#"(() => {{
    document.querySelectorAll('select').forEach(s => {{
        Array.from(s.options).forEach((o, i) => {{
            if (i === s.selectedIndex) o.setAttribute('selected', '');
            else o.removeAttribute('selected');
        }});
    }});
    document.querySelectorAll('input:not([type="password"])').forEach(i => i.setAttribute('value', i.value));
    document.querySelectorAll('[data-display]').forEach(e => e.removeAttribute('data-display'));
    document.querySelectorAll({stamped}).forEach(e => {{
        if (window.getComputedStyle(e).display === 'none') e.setAttribute('data-display', 'none');
    }});
    return document.documentElement.outerHTML;
}})()"#,
        stamped = js_str(STAMPED)
    )
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<String> {
        self.page
            .evaluate(snapshot_script())
            .await?
            .into_value::<String>()
            .map_err(|e| Error::Browser(e.to_string()))
    }

    async fn fill_and_submit(&self, target: &Target, value: &str) -> Result<bool> {
        // jqGrid binds its page-jump handler through jQuery and reads `which`, which a
        // native KeyboardEvent leaves at 0.
        let script = format!(
            r#"((sel, idx, val) => {{
    const el = document.querySelectorAll(sel)[idx];
    if (!el) return false;
    el.value = val;
    if (window.jQuery) {{
        window.jQuery(el).trigger(window.jQuery.Event('keypress', {{ which: 13, keyCode: 13 }}));
    }} else {{
        el.dispatchEvent(new KeyboardEvent('keypress', {{
            key: 'Enter', code: 'Enter', keyCode: 13, which: 13, bubbles: true
        }}));
    }}
    return true;
}})({}, {}, {})"#,
            js_str(&target.selector),
            target.index,
            js_str(value)
        );
        self.eval_bool(script).await
    }

    async fn click(&self, target: &Target, times: u32) -> Result<bool> {
        let script = format!(
            r#"((sel, idx, times) => {{
    const el = document.querySelectorAll(sel)[idx];
    if (!el) return false;
    for (let i = 0; i < times; i++) el.click();
    return true;
}})({}, {}, {})"#,
            js_str(&target.selector),
            target.index,
            times
        );
        self.eval_bool(script).await
    }

    async fn close(&self) -> Result<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        let closed = browser.close().await;
        let _ = browser.wait().await;
        self.handler.abort();
        closed?;
        tracing::debug!("Browser closed");
        Ok(())
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
