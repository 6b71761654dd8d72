//! Login flow against the backend's Google OAuth endpoints.
//!
//! The backend owns the OAuth client secrets and performs the code
//! exchange; this side fetches the authorization URL, relays the callback
//! query and stores the resulting bearer token. Storing that token is the
//! only `Anonymous -> Authenticated` transition in the system.

use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde::Deserialize;

use crate::api::expect_success;
use crate::session::store::CredentialStore;
use crate::session::{Session, SessionClient};

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    authorization_url: String,
}

#[derive(Debug, Deserialize)]
struct CallbackResponse {
    access_token: String,
}

/// Fetches the Google authorization URL from the backend.
///
/// Issued while anonymous: no `Authorization` header is attached, the
/// request still goes out.
pub async fn authorization_url(client: &SessionClient) -> Result<String> {
    let request = client
        .get("/auth/google/authorize")
        .header(ACCEPT, "application/json");

    let Session::Active(response) = client.execute(request).await? else {
        // The authorize endpoint is anonymous; a 401 here means the backend
        // is misconfigured.
        anyhow::bail!("Authorization endpoint rejected the request");
    };

    let payload: AuthorizeResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode authorization response")?;

    Ok(payload.authorization_url)
}

/// Completes a login from the OAuth callback redirect and stores the token.
///
/// `input` may be the full redirect URL the browser landed on, or just its
/// query string. Returns the stored token.
pub async fn complete_login(client: &SessionClient, input: &str) -> Result<String> {
    let query = callback_query(input)?;
    let path = format!("/auth/google/callback?{query}");

    let Session::Active(response) = client.execute(client.get(&path)).await? else {
        anyhow::bail!("Callback was rejected as unauthorized");
    };

    let payload: CallbackResponse = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode callback response")?;

    client
        .store()
        .set_session_token(&payload.access_token)
        .context("Failed to store session token")?;

    Ok(payload.access_token)
}

/// Probes the authenticated route with the stored credential.
pub async fn verify(client: &SessionClient) -> Result<Session<serde_json::Value>> {
    let request = client
        .get("/authenticated-route")
        .header(ACCEPT, "application/json");

    let Session::Active(response) = client.execute(request).await? else {
        return Ok(Session::Expired);
    };

    let payload = expect_success(response)
        .await?
        .json()
        .await
        .context("Failed to decode authenticated-route response")?;

    Ok(Session::Active(payload))
}

/// Discards the stored session. Idempotent.
pub fn logout(store: &dyn CredentialStore) -> Result<()> {
    store.clear_session()
}

/// Extracts the query string from a pasted callback redirect.
fn callback_query(input: &str) -> Result<String> {
    let value = input.trim();

    if let Ok(url) = url::Url::parse(value) {
        let query = url.query().unwrap_or_default();
        anyhow::ensure!(
            !query.is_empty(),
            "Callback URL carries no query parameters"
        );
        return Ok(query.to_string());
    }

    // checked after stripping so a bare "?" is rejected like a
    // query-less URL
    let query = value.trim_start_matches('?');
    anyhow::ensure!(!query.is_empty(), "Empty callback input");
    Ok(query.to_string())
}
