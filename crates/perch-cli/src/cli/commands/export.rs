//! PDF export command handler.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use perch_core::api::export;
use perch_core::config::Config;
use perch_core::session::Session;

pub async fn run(config: &Config, conversation_id: i64, output: Option<PathBuf>) -> Result<()> {
    let client = super::session_client(config)?;

    let Session::Active(pdf) = export::conversation_pdf(&client, conversation_id).await? else {
        return Ok(());
    };

    let path = output.unwrap_or_else(|| PathBuf::from(&pdf.filename));
    fs::write(&path, &pdf.bytes)
        .with_context(|| format!("Failed to write PDF to {}", path.display()))?;

    println!("Wrote {} ({} bytes)", path.display(), pdf.bytes.len());
    Ok(())
}
