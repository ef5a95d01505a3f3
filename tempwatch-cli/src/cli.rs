use std::io;

use clap::Parser;
use tempwatch_core::{Credential, Settings};
use tracing::debug;

use crate::{pipeline, prompt, viewer::SystemViewer};

/// Top-level CLI struct. There are no flags: everything is asked for interactively.
#[derive(Debug, Parser)]
#[command(
    name = "tempwatch",
    version,
    about = "Chart the last week of air temperature at a point"
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let coordinate = prompt::read_coordinate()?;
        let credential = Credential::from_lookup(|key| std::env::var(key).ok());

        let settings = Settings::load()?;
        debug!(?settings, "settings loaded");

        let viewer = SystemViewer::new(settings.chart_path.clone());
        let mut stdout = io::stdout().lock();

        let outcome =
            pipeline::execute(&settings, credential, coordinate, &viewer, &mut stdout).await?;
        debug!(?outcome, "run finished");

        Ok(())
    }
}
