//! Session-aware request plumbing.
//!
//! Every call to the backend goes through [`SessionClient`], which attaches
//! the stored bearer token and owns the 401 teardown so callers never
//! duplicate logout/redirect logic.

mod client;
pub mod store;

pub use client::{Navigator, Session, SessionClient};
