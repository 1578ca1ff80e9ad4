//! The session-scoped user collection.
//!
//! [`UserStore`] is plain owned state: callers decide where it lives and how
//! access to it is serialized. The dashboard keeps exactly one behind a lock
//! in its application state.
//!
//! # Ordering
//!
//! Users are kept in insertion order: the order the remote source returned
//! them, followed by local additions in the order they were made. Queries
//! never reorder.
//!
//! # Identifiers
//!
//! Identifiers are unique within the store. Local additions receive
//! `max(existing) + 1`, or `1` when the store is empty.

use std::collections::HashSet;

use crate::types::UserId;
use crate::user::{NewUser, User, ValidNewUser};
use crate::validation::{Field, FieldErrors};

/// In-memory collection of users for one session.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Vec<User>,
    local: HashSet<UserId>,
}

impl UserStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents entirely with `users`.
    ///
    /// Local additions are discarded. If `users` repeats an identifier, only
    /// the first record with that identifier is kept.
    ///
    /// Returns the number of records dropped as duplicates.
    pub fn replace(&mut self, users: Vec<User>) -> usize {
        let incoming = users.len();
        let mut seen = HashSet::with_capacity(incoming);

        self.users = users
            .into_iter()
            .filter(|user| seen.insert(user.id))
            .collect();
        self.local.clear();

        incoming - self.users.len()
    }

    /// Validate `candidate` and append it under the next local identifier.
    ///
    /// # Errors
    ///
    /// Returns the field errors when validation fails. Nothing is mutated in
    /// that case.
    pub fn add(&mut self, candidate: &NewUser) -> Result<User, FieldErrors> {
        let valid = candidate.validate()?;
        self.insert(valid)
    }

    /// Append an already validated user under the next local identifier.
    ///
    /// # Errors
    ///
    /// Returns a submission error if the identifier space is exhausted.
    pub fn insert(&mut self, valid: ValidNewUser) -> Result<User, FieldErrors> {
        let id = self.next_id().ok_or_else(|| {
            FieldErrors::single(Field::Submit, "No user identifiers are left")
        })?;

        let user = valid.into_user(id);
        self.users.push(user.clone());
        self.local.insert(id);
        Ok(user)
    }

    /// Users whose name, username, or email contains `query`, ignoring case.
    ///
    /// A blank or whitespace-only query returns every user. Otherwise the
    /// query is matched as given, surrounding whitespace included. Order
    /// follows the store.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&User> {
        if query.trim().is_empty() {
            return self.users.iter().collect();
        }

        let needle = query.to_lowercase();
        self.users
            .iter()
            .filter(|user| user.matches(&needle))
            .collect()
    }

    /// The user with identifier `id`, if present.
    #[must_use]
    pub fn find_by_id(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// The identifier the next local addition will receive.
    ///
    /// `None` only when the current maximum is `u32::MAX`.
    #[must_use]
    pub fn next_id(&self) -> Option<UserId> {
        match self.users.iter().map(|user| user.id).max() {
            Some(max) => max.next(),
            None => Some(UserId::FIRST),
        }
    }

    /// Whether `id` belongs to a local addition.
    #[must_use]
    pub fn is_local(&self, id: UserId) -> bool {
        self.local.contains(&id)
    }

    /// All users in store order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
