use std::io;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::config::{self, MakitConfig};
use crate::materialize::Materializer;
use crate::options::MaterializeOptions;

pub fn run(cli: Cli) -> Result<()> {
    let defaults = config::load(cli.config.as_deref(), !cli.no_config)?;
    let options = resolve_options(&cli, &defaults)?;
    debug!(?options, paths = cli.paths.len(), "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = Materializer::new(options)
        .run(&cli.paths, &mut out)
        .context("writing status output")?;

    // Per-path creation failures are reported inline and do not change the exit status.
    let failures = report.failures();
    if failures > 0 {
        warn!(failures, total = report.entries().len(), "some paths were not created");
    }
    Ok(())
}

/// Merge flags over file defaults and parse once, before any path is touched.
fn resolve_options(cli: &Cli, defaults: &MakitConfig) -> Result<MaterializeOptions> {
    let mode = cli.mode.as_deref().or(defaults.mode.as_deref());
    let options = MaterializeOptions::from_raw(
        mode,
        cli.date.as_deref(),
        cli.no_create || defaults.no_create,
        cli.verbose || defaults.verbose,
    )?;
    Ok(options)
}
