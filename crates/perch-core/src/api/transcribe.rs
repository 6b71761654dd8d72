//! Audio transcription upload.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::expect_success;
use crate::session::{Session, SessionClient};

/// Extensions the backend's transcription route accepts.
const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "m4a"];

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Returns true if the filename carries an accepted audio extension.
pub fn allowed_audio_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Uploads an audio file and returns the transcribed text.
///
/// Rejects anything other than mp3/m4a before any bytes leave the machine,
/// matching the server-side check.
pub async fn transcribe(
    client: &SessionClient,
    bytes: Vec<u8>,
    filename: &str,
) -> Result<Session<String>> {
    anyhow::ensure!(
        allowed_audio_file(filename),
        "Invalid file type for {filename}: only mp3 and m4a are accepted"
    );

    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new().part("file", part);

    let Session::Active(response) = client
        .execute(client.post("/transcribe").multipart(form))
        .await?
    else {
        return Ok(Session::Expired);
    };

    let payload: TranscriptionResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode transcription response")?;

    Ok(Session::Active(payload.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: extension gate mirrors the backend's allowlist.
    #[test]
    fn test_allowed_audio_file() {
        assert!(allowed_audio_file("memo.mp3"));
        assert!(allowed_audio_file("memo.M4A"));
        assert!(allowed_audio_file("dir/voice note.mp3"));
        assert!(!allowed_audio_file("memo.wav"));
        assert!(!allowed_audio_file("memo"));
        assert!(!allowed_audio_file("mp3"));
    }
}
