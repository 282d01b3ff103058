use std::path::PathBuf;

use anyhow::Result;
use chaos_points::{ProgramSettings, SETTINGS_FILE};

fn run() -> Result<()> {
    env_logger::init();

    let settings = ProgramSettings::load_or_default(SETTINGS_FILE);
    let file = std::env::args_os().nth(1).map(PathBuf::from);
    if let Some(path) = &file {
        log::info!("Loading {}", path.display());
    }

    chaos_points::run(settings, file)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
