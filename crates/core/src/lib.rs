//! Roster Core - user model and in-memory user store.
//!
//! This crate provides the types and state shared by the Roster components:
//! - `dashboard` - Server-rendered user management dashboard
//! - `integration-tests` - HTTP-level tests against the dashboard
//!
//! # Architecture
//!
//! The core crate contains only types and pure state - no I/O, no HTTP
//! clients, no async. The dashboard owns a [`UserStore`] and pairs it with the
//! remote placeholder client; everything here can be exercised synchronously.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses
//! - [`user`] - The `User` record (JSONPlaceholder wire shape) and `NewUser` candidate
//! - [`validation`] - Field-keyed validation errors for the add-user form
//! - [`store`] - The session-scoped collection with search, lookup, and add

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod store;
pub mod types;
pub mod user;
pub mod validation;

pub use store::UserStore;
pub use types::*;
pub use user::{Address, Company, Geo, NewUser, User};
pub use validation::{Field, FieldErrors};
