use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::browser::LaunchOptions;
use crate::process::HarvestOptions;
use crate::settle::SettleOptions;
use crate::{INITIAL_DELAY_MS, POLL_MS, PORTAL_URL, SETTLE_TIMEOUT_MS};

#[derive(Debug, Parser)]
#[command(
    name = "gridharvest",
    version,
    about = "Harvest every page of a course-schedule query grid into a spreadsheet"
)]
pub struct Args {
    /// Page hosting the query grid
    #[arg(default_value = PORTAL_URL)]
    pub url: String,

    /// Spreadsheet file name (default: timestamped)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Directory the spreadsheet is written to
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Run Chrome without a window
    #[arg(long)]
    pub headless: bool,

    /// Chrome/Chromium executable
    #[arg(long)]
    pub chrome: Option<PathBuf>,

    /// Start harvesting without waiting for Enter
    #[arg(long)]
    pub no_wait: bool,

    /// How long to wait for the grid to settle after each page move
    #[arg(long, default_value_t = SETTLE_TIMEOUT_MS)]
    pub settle_timeout_ms: u64,

    /// Interval between settle samples
    #[arg(long, default_value_t = POLL_MS)]
    pub poll_ms: u64,

    /// Pause between the operator's go-ahead and the first read
    #[arg(long, default_value_t = INITIAL_DELAY_MS)]
    pub initial_delay_ms: u64,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub out_dir: PathBuf,
    pub file_name: Option<String>,
    pub launch: LaunchOptions,
    pub wait_for_operator: bool,
    pub initial_delay: Duration,
    pub harvest: HarvestOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: PORTAL_URL.to_string(),
            out_dir: PathBuf::from("."),
            file_name: None,
            launch: LaunchOptions::default(),
            wait_for_operator: true,
            initial_delay: Duration::from_millis(INITIAL_DELAY_MS),
            harvest: HarvestOptions::default(),
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            url: args.url,
            out_dir: args.dir,
            file_name: args.output,
            launch: LaunchOptions {
                headless: args.headless,
                executable: args.chrome,
            },
            wait_for_operator: !args.no_wait,
            initial_delay: Duration::from_millis(args.initial_delay_ms),
            harvest: HarvestOptions {
                settle: SettleOptions {
                    timeout: Duration::from_millis(args.settle_timeout_ms),
                    poll: Duration::from_millis(args.poll_ms.max(1)),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_default() {
        let config = Config::from(Args::parse_from(["gridharvest"]));
        let default = Config::default();
        assert_eq!(config.url, default.url);
        assert_eq!(config.initial_delay, default.initial_delay);
        assert_eq!(config.harvest.settle, default.harvest.settle);
        assert!(config.wait_for_operator);
        assert!(!config.launch.headless);
    }

    #[test]
    fn flags_are_applied() {
        let config = Config::from(Args::parse_from([
            "gridharvest",
            "https://example.test/grid",
            "-o",
            "out.xlsx",
            "--headless",
            "--no-wait",
            "--settle-timeout-ms",
            "500",
        ]));
        assert_eq!(config.url, "https://example.test/grid");
        assert_eq!(config.file_name.as_deref(), Some("out.xlsx"));
        assert!(config.launch.headless);
        assert!(!config.wait_for_operator);
        assert_eq!(config.harvest.settle.timeout, Duration::from_millis(500));
    }
}
