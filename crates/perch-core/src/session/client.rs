//! The session-aware request interceptor.
//!
//! Wraps outgoing HTTP requests, attaches the stored bearer token and
//! centralizes session-expiry handling: a 401 clears the credential store,
//! signals the navigator and surfaces as [`Session::Expired`] instead of a
//! response. Every other status (200-599) passes through untouched, and
//! transport failures (DNS, TLS, timeout) propagate as errors so they are
//! never mistaken for an expired session.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};

use super::store::CredentialStore;

/// Outcome of an intercepted call.
///
/// `Expired` means the 401 was already handled: the credential store has
/// been cleared and the navigator signalled. Callers must treat it as
/// "nothing further to do", never as a response still awaiting error
/// handling.
#[must_use]
#[derive(Debug)]
pub enum Session<T> {
    Active(T),
    Expired,
}

impl<T> Session<T> {
    /// Maps the active value, preserving `Expired`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Session<U> {
        match self {
            Session::Active(value) => Session::Active(f(value)),
            Session::Expired => Session::Expired,
        }
    }

    /// Returns the active value, discarding the expiry tag.
    pub fn into_active(self) -> Option<T> {
        match self {
            Session::Active(value) => Some(value),
            Session::Expired => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Session::Expired)
    }
}

/// Landing-route navigation, invoked once per call when a session is torn
/// down. Implementations must tolerate repeated invocations: concurrent
/// in-flight calls that each observe a 401 will each trigger it.
pub trait Navigator: Send + Sync {
    fn redirect_to_landing(&self);
}

/// HTTP client bound to a credential store and a navigator.
pub struct SessionClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionClient {
    /// Creates a client for the given backend.
    ///
    /// The underlying client keeps a cookie jar so same-origin cookies
    /// accompany every request. `accept_invalid_certs` exists for local
    /// backends serving a self-signed certificate.
    pub fn new(
        base_url: &str,
        accept_invalid_certs: bool,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential store this client reads its token from.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Starts a request against a backend path (leading `/`).
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Issues the request with the stored credential attached.
    ///
    /// Reads the token at call time; when absent the request still goes out,
    /// just without an `Authorization` header. Caller-supplied headers are
    /// preserved, only `Authorization` is set by the interceptor.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Session<Response>> {
        let builder = match self.store.session_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .context("Request failed before a response was received")?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "session rejected by backend, clearing credentials");
            self.store
                .clear_session()
                .context("Failed to clear session after 401")?;
            self.navigator.redirect_to_landing();
            return Ok(Session::Expired);
        }

        tracing::debug!(url = %response.url(), status = %response.status(), "response received");
        Ok(Session::Active(response))
    }
}
