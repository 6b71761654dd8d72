//! Config command handlers.

use anyhow::Result;
use perch_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = paths::config_path();
    Config::init_to(&path)?;
    println!("Created config at {}", path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    Config::save_base_url(url)?;
    println!("Set base_url to {url}");
    Ok(())
}
