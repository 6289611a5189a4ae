use anyhow::Context;
use clap::{Parser, Subcommand};
use sorcle::config;
use sorcle::control::Marker;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Send commands to a running sorcle wheel", long_about = None)]
struct Args {
    /// Control directory the wheel watches (defaults to the configured one)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Config file used to find the control directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Spin the wheel
    Spin,
    /// Reload the wheel from the spreadsheet export
    Import,
}

impl From<Command> for Marker {
    fn from(command: Command) -> Self {
        match command {
            Command::Spin => Marker::Spin,
            Command::Import => Marker::Import,
        }
    }
}

fn control_dir(args: &Args) -> PathBuf {
    if let Some(dir) = &args.dir {
        return dir.clone();
    }
    match config::load_config(args.config.as_deref()) {
        Ok(config) => config.control_dir(),
        Err(e) => {
            log::warn!("Could not load config ({}), using current directory", e);
            PathBuf::from(".")
        }
    }
}

fn send(dir: &Path, marker: Marker) -> anyhow::Result<PathBuf> {
    let path = marker.path_in(dir);
    fs_err::write(&path, "").with_context(|| format!("Failed to send '{}'", marker))?;
    Ok(path)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dir = control_dir(&args);
    let path = send(&dir, args.command.into())?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
