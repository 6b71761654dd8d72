//! CLI command handlers.

pub mod auth;
pub mod chat;
pub mod config;
pub mod export;
pub mod personas;
pub mod transcribe;

use std::sync::Arc;

use anyhow::Result;
use perch_core::config::Config;
use perch_core::session::store::FileCredentialStore;
use perch_core::session::{Navigator, SessionClient};

/// Prints the landing hint when a session is torn down.
///
/// The terminal counterpart of the original UI's redirect to the landing
/// route; printing the hint again on a racing 401 is harmless.
struct LandingHint {
    message: String,
}

impl Navigator for LandingHint {
    fn redirect_to_landing(&self) {
        eprintln!("{}", self.message);
    }
}

/// Builds the session client from config plus the on-disk credential store.
pub(crate) fn session_client(config: &Config) -> Result<SessionClient> {
    SessionClient::new(
        &config.base_url,
        config.accept_invalid_certs,
        Arc::new(FileCredentialStore::open_default()),
        Arc::new(LandingHint {
            message: config.landing_hint.clone(),
        }),
    )
}
