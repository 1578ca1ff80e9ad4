//! Remote user source (JSONPlaceholder-compatible REST API).
//!
//! This module provides:
//! - [`PlaceholderClient`] for listing users, fetching one user, and the
//!   simulated create
//! - [`PlaceholderError`] describing transport, status, and decode failures
//!
//! # Contract
//!
//! ```text
//! GET  {base}/users        - JSON array of users
//! GET  {base}/users/{id}   - Single user, 404 when unknown
//! POST {base}/users        - Echoes the payload with a server id; nothing is persisted
//! ```

mod client;
mod error;

pub use client::PlaceholderClient;
pub use error::PlaceholderError;
