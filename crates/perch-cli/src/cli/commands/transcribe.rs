//! Transcription command handler.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use perch_core::api::transcribe;
use perch_core::config::Config;
use perch_core::session::Session;

pub async fn run(config: &Config, file: &Path) -> Result<()> {
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a usable file path: {}", file.display()))?
        .to_string();

    let bytes =
        fs::read(file).with_context(|| format!("Failed to read audio from {}", file.display()))?;

    let client = super::session_client(config)?;

    if let Session::Active(text) = transcribe::transcribe(&client, bytes, &filename).await? {
        println!("{text}");
    }
    Ok(())
}
