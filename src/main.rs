use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use sorcle::config;
use sorcle::control::MarkerDir;
use sorcle::engine::Engine;
use sorcle::gui::app::AppModel;
use sorcle::source::{RowSource, TableFile};
use sorcle::sys::runtime;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Spinning prize wheel driven by marker files", long_about = None)]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.init_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = config::load_config(args.config.as_deref()).context("Failed to load config")?;
    let source_path = config
        .source_path()
        .ok_or(config::ConfigError::MissingSource)?;
    let source: Arc<dyn RowSource> = Arc::new(TableFile::new(source_path));

    let control_dir = config.control_dir();
    let commands = MarkerDir::open(&control_dir)
        .with_context(|| format!("Failed to open control directory {}", control_dir.display()))?;
    let results = commands.clone();

    let engine = Engine::start(config, source.as_ref(), Box::new(commands), Box::new(results))
        .context("Failed to build the initial wheel")?;

    let (fetch_tx, fetch_rx) = async_channel::bounded(1);
    let (tx, rx) = async_channel::bounded(8);

    // Start Background Services
    let _fetcher = runtime::start_background_services(source, fetch_rx, tx)
        .context("Failed to start fetch service")?;

    let app = RelmApp::new("org.sorcle.sorcle").with_args(Vec::new());
    app.run::<AppModel>((engine, fetch_tx, rx));

    Ok(())
}
