mod checkpoint;
mod config;
mod depth_chart;
mod display;
mod draft_order;
mod engine;
mod error;
mod keepers;
mod ledger;
mod player;
mod prompt;
mod results;
mod source;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::checkpoint::CheckpointStore;
use crate::config::DraftConfig;
use crate::display::ConsoleViewer;
use crate::engine::DraftEngine;
use crate::error::Result;
use crate::prompt::StdinPrompter;
use crate::results::CsvResultsSink;
use crate::source::CsvPoolSource;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cfg = match DraftConfig::from_env(args.get(1).map(String::as_str)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they never interleave with the prompts on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cfg) {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

fn run(cfg: DraftConfig) -> Result<()> {
    info!(format = %cfg.format, year = cfg.year, data_dir = %cfg.data_dir.display(), "Starting draft");

    let source = CsvPoolSource::new(&cfg);
    let store = CheckpointStore::new(&cfg);
    let sink = CsvResultsSink::new(&cfg);

    let mut engine = DraftEngine::new(cfg, &source, store, StdinPrompter::stdin(), ConsoleViewer, sink)?;
    engine.run(&mut rand::thread_rng())?;
    Ok(())
}
