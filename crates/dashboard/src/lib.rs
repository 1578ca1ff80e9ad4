//! Roster Dashboard library.
//!
//! This crate provides the dashboard functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` only adds
//! process concerns (configuration, logging, Sentry, signal handling).
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = DashboardConfig::from_env()?;
//! let state = AppState::new(config)?;
//! state.load().await.ok();
//! axum::serve(listener, routes::app(state)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod placeholder;
pub mod routes;
pub mod state;

pub use config::DashboardConfig;
pub use state::AppState;
