//! Conversation PDF export.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::expect_success;
use crate::session::{Session, SessionClient};

/// Filename used when the server does not name the attachment.
const FALLBACK_FILENAME: &str = "conversation.pdf";

#[derive(Debug, Serialize)]
struct ExportRequest {
    conversation_id: i64,
}

/// A rendered conversation export.
#[derive(Debug)]
pub struct PdfExport {
    /// Server-suggested filename (from `Content-Disposition`).
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Downloads one conversation rendered as a PDF.
pub async fn conversation_pdf(
    client: &SessionClient,
    conversation_id: i64,
) -> Result<Session<PdfExport>> {
    let body = ExportRequest { conversation_id };

    let Session::Active(response) = client
        .execute(client.post("/api/pdf_conversation").json(&body))
        .await?
    else {
        return Ok(Session::Expired);
    };

    let response = expect_success(response).await?;

    let filename = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(attachment_filename)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

    let bytes = response
        .bytes()
        .await
        .context("Failed to read PDF body")?
        .to_vec();

    Ok(Session::Active(PdfExport { filename, bytes }))
}

/// Extracts the filename from a `Content-Disposition: attachment` header.
///
/// The result is used as a local write path, so any path components the
/// server smuggles in are stripped down to the final name.
fn attachment_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .find_map(|part| part.trim().strip_prefix("filename="))
        .map(|name| name.trim_matches('"'))
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .filter(|name| !name.is_empty())
}
