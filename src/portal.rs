//! Opening the portal and handing over to the operator for login and filtering.

use std::time::Duration;

use scraper::Html;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, Instant};

use crate::dom::{select_all, text_of};
use crate::driver::{Driver, Target};
use crate::{Result, LOGIN_WAIT_MS, POLL_MS};

const LOGIN_ID: &str = "#tysfyzdl";
const LOGIN_CLASSES: &str = ".btn.btn-primary.btn-block.rzdl";
const LOGIN_TEXT: &str = "统一身份认证登录";

/// The unified-identity login button, tried by id, then classes, then label.
pub fn login_target(doc: &Html) -> Option<Target> {
    if !select_all(doc, LOGIN_ID).is_empty() {
        return Some(Target::new(LOGIN_ID, 0));
    }
    if !select_all(doc, LOGIN_CLASSES).is_empty() {
        return Some(Target::new(LOGIN_CLASSES, 0));
    }
    select_all(doc, "button")
        .into_iter()
        .position(|b| text_of(b).contains(LOGIN_TEXT))
        .map(|idx| Target::new("button", idx))
}

/// Navigates to `url` and switches the login form to unified identity when the
/// button shows up. A missing button is logged and otherwise ignored.
pub async fn open(driver: &dyn Driver, url: &str) -> Result<()> {
    driver.goto(url).await?;
    if !click_login(driver, Duration::from_millis(LOGIN_WAIT_MS)).await {
        tracing::info!("Login button not found or not clickable, continuing");
    }
    Ok(())
}

async fn click_login(driver: &dyn Driver, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    loop {
        let target = match driver.snapshot().await {
            Ok(html) => login_target(&Html::parse_document(&html)),
            Err(err) => {
                tracing::debug!("Snapshot failed while looking for login button: {err}");
                None
            }
        };
        if let Some(target) = target {
            match driver.click(&target, 1).await {
                Ok(true) => {
                    tracing::info!("Clicked login button {target}");
                    return true;
                }
                Ok(false) => {}
                Err(err) => tracing::debug!("Clicking {target} failed: {err}"),
            }
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(Duration::from_millis(POLL_MS)).await;
    }
}

/// Blocks until the operator presses Enter.
pub async fn await_operator() -> Result<()> {
    println!("Log in and choose the query filters in the browser window.");
    println!("Press Enter once the results have loaded...");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(())
}
