use std::error::Error as _;

use chrono::Local;
use clap::Parser;
use gridharvest::{config::Args, config::Config, info_time, process::process_site};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> gridharvest::Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose {
            "gridharvest=debug"
        } else {
            "gridharvest=info"
        })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let start_time = Local::now();
    let result = process_site(&Config::from(args)).await;
    info_time!(start_time, "Full program time:");

    match result {
        Ok(path) => {
            println!("Saved to {}", path.display());
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err:?}");
            let mut source = err.source();
            while let Some(cause) = source {
                tracing::error!("caused by: {cause}");
                source = cause.source();
            }
            Err(err)
        }
    }
}
