mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod output;
mod pipeline;
mod state;
mod ui;

use anyhow::Context;

use config::AnalysisConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = AnalysisConfig::discover(&cwd).context("loading configuration")?;
    let results = pipeline::run(&config).with_context(|| {
        format!("processing NEMD output in {}", config.run_dir.display())
    })?;

    if config.show_plot {
        // All files are on disk by now; a missing display is not fatal.
        if let Err(e) = app::show(results) {
            log::warn!("Could not open the plot window: {e}");
        }
    }
    Ok(())
}
