//! Core perch library (session interceptor, auth flow, API bindings, config).

pub mod api;
pub mod auth;
pub mod config;
pub mod session;
