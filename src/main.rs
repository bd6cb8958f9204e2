#![windows_subsystem = "windows"]

use anyhow::{Context, Result};
use env_logger::Env;

use snappath::hotkey;
use snappath::Settings;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env();
    log::info!("saving screenshots to {}", settings.save_dir.display());

    hotkey::listen(settings).context("hotkey listener failed")?;
    Ok(())
}
