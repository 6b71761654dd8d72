//! Typed bindings for the persona-chat backend API.
//!
//! Every call goes through the session interceptor and returns
//! `Result<Session<T>>`: transport failures are errors, an expired session
//! is the tagged `Session::Expired`, and non-2xx statuses other than 401
//! surface as errors carrying the status and body text.

pub mod chat;
pub mod export;
pub mod personas;
pub mod transcribe;

use anyhow::Result;
use reqwest::Response;

/// Turns an ordinary HTTP failure into an error with status and body.
pub(crate) async fn expect_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("Request failed (HTTP {status}): {body}")
}
