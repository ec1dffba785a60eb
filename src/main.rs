mod cli;
mod config;
mod logging;
mod materialize;
mod options;
mod runner;
mod util;

fn main() -> anyhow::Result<()> {
    logging::init();
    let app = cli::parse();
    runner::run(app)
}
