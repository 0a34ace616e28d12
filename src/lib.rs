//! GRID HARVESTER
//! Walks every page of a jqGrid query result in a live browser session and exports the
//! rows to a spreadsheet. The operator logs in and sets the filters by hand first.

pub mod browser;
pub mod config;
mod dom;
pub mod driver;
mod error;
pub mod export;
pub mod locate;
mod macros;
pub mod model;
pub mod navigate;
pub mod paginate;
pub mod parse;
pub mod portal;
pub mod process;
pub mod settle;

pub use error::{Error, Result};

pub const PORTAL_URL: &str =
    "https://jwgl.whu.edu.cn/design/viewFunc_cxDesignFuncPageIndex.html?gnmkdm=N214599&layout=default";
const FILE_STEM: &str = "课表查询结果";
const SETTLE_TIMEOUT_MS: u64 = 8_000;
const POLL_MS: u64 = 250;
const INITIAL_DELAY_MS: u64 = 3_000;
const LOGIN_WAIT_MS: u64 = 5_000;
