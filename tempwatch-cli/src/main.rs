//! Binary crate for the `tempwatch` command-line tool.
//!
//! This crate focuses on:
//! - Reading the coordinate and the API key
//! - Driving fetch, table building, analysis and charting in order
//! - Showing the chart to the user

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod pipeline;
mod prompt;
mod viewer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
