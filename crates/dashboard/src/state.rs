//! Application state shared across handlers.
//!
//! [`AppState`] is the single owner of the session's [`UserStore`]. Handlers
//! never reach the store directly; they go through the operations here, which
//! pair it with the remote [`PlaceholderClient`]:
//!
//! - [`AppState::load`] replaces the store from `GET /users`
//! - [`AppState::add`] validates, optionally echoes to `POST /users`, and appends
//! - [`AppState::search`] filters the store
//! - [`AppState::find`] looks in the store first, then `GET /users/{id}`

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use roster_core::{Field, FieldErrors, NewUser, User, UserId, UserStore};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::DashboardConfig;
use crate::placeholder::{PlaceholderClient, PlaceholderError};

/// Message shown when the initial or a retried load fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load users. Please try again later.";

/// Message shown when the remote echo of an addition fails.
pub const ADD_FAILED_MESSAGE: &str = "Failed to add user. Please try again.";

/// Where the store stands relative to the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load has completed yet.
    Loading,
    /// The last applied load succeeded.
    Ready,
    /// The last applied load failed; the message is safe to show.
    Failed(String),
}

/// Result of a [`AppState::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds `count` users.
    Loaded { count: usize, duplicates: usize },
    /// A later load started before this one finished; its result was ignored.
    Superseded,
}

/// A user as listed by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedUser {
    pub user: User,
    /// Added through the dashboard rather than fetched.
    pub local: bool,
}

/// Where [`AppState::find`] found the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Held by the store; `local` marks dashboard additions.
    Stored { user: User, local: bool },
    /// Not in the store; fetched from the remote source.
    Remote(User),
}

impl Lookup {
    #[must_use]
    pub const fn user(&self) -> &User {
        match self {
            Self::Stored { user, .. } | Self::Remote(user) => user,
        }
    }

    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Stored { user, .. } | Self::Remote(user) => user,
        }
    }
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    placeholder: PlaceholderClient,
    store: RwLock<UserStore>,
    status: RwLock<LoadStatus>,
    load_generation: AtomicU64,
}

impl AppState {
    /// Create a new application state with an empty store.
    ///
    /// Call [`AppState::load`] to populate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: DashboardConfig) -> Result<Self, PlaceholderError> {
        let placeholder = PlaceholderClient::new(&config.placeholder)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                placeholder,
                store: RwLock::new(UserStore::new()),
                status: RwLock::new(LoadStatus::Loading),
                load_generation: AtomicU64::new(0),
            }),
        })
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the remote user source client.
    #[must_use]
    pub fn placeholder(&self) -> &PlaceholderClient {
        &self.inner.placeholder
    }

    /// Current load status.
    pub async fn status(&self) -> LoadStatus {
        self.inner.status.read().await.clone()
    }

    /// Number of users in the store.
    pub async fn len(&self) -> usize {
        self.inner.store.read().await.len()
    }

    /// Populate the store from the remote source, replacing its contents.
    ///
    /// On failure the store keeps what it had and the status becomes
    /// [`LoadStatus::Failed`]. Calling this again is the retry.
    ///
    /// If another load starts while this one is in flight, whichever started
    /// last wins and this one reports [`LoadOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns the remote error when the fetch fails and this load was not
    /// superseded.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<LoadOutcome, PlaceholderError> {
        let generation = self.inner.load_generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut status = self.inner.status.write().await;
            if matches!(*status, LoadStatus::Failed(_)) {
                *status = LoadStatus::Loading;
            }
        }

        let fetched = self.placeholder().fetch_users().await;

        // Checked under the store lock so a newer load cannot apply in between.
        let mut store = self.inner.store.write().await;
        if self.inner.load_generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Ignoring superseded load");
            return Ok(LoadOutcome::Superseded);
        }

        match fetched {
            Ok(users) => {
                let duplicates = store.replace(users);
                let count = store.len();
                *self.inner.status.write().await = LoadStatus::Ready;

                if duplicates > 0 {
                    warn!(duplicates, "Remote source returned duplicate user ids");
                }
                info!(count, "Users loaded");
                Ok(LoadOutcome::Loaded { count, duplicates })
            }
            Err(e) => {
                *self.inner.status.write().await =
                    LoadStatus::Failed(LOAD_FAILED_MESSAGE.to_string());
                tracing::error!(error = %e, "Failed to load users");
                Err(e)
            }
        }
    }

    /// Validate `candidate` and append it under the next local identifier.
    ///
    /// With `simulate_remote_add` on, the candidate is first sent to the
    /// remote source; the identifier it assigns is discarded.
    ///
    /// # Errors
    ///
    /// Returns field errors on validation failure, or a `submit` error when
    /// the remote echo fails. The store is untouched in both cases.
    #[instrument(skip(self, candidate), fields(username = %candidate.username))]
    pub async fn add(&self, candidate: &NewUser) -> Result<User, FieldErrors> {
        let valid = candidate.validate()?;

        if self.config().placeholder.simulate_remote_add {
            match self.placeholder().create_user(&valid).await {
                Ok(remote_id) => debug!(%remote_id, "Discarding remote-assigned id"),
                Err(e) => {
                    warn!(error = %e, "Remote add failed");
                    return Err(FieldErrors::single(Field::Submit, ADD_FAILED_MESSAGE));
                }
            }
        }

        // The write lock makes id assignment and append one step.
        let user = self.inner.store.write().await.insert(valid)?;
        info!(user_id = %user.id, "User added");
        Ok(user)
    }

    /// Users matching `query` (name, username, or email; case-insensitive).
    ///
    /// A blank query lists everyone. Order follows the store.
    pub async fn search(&self, query: &str) -> Vec<ListedUser> {
        let store = self.inner.store.read().await;
        store
            .search(query)
            .into_iter()
            .map(|user| ListedUser {
                user: user.clone(),
                local: store.is_local(user.id),
            })
            .collect()
    }

    /// Find a user, preferring the store over the remote source.
    ///
    /// Local additions only exist in the store, so the remote source is
    /// consulted only when the store has no match. Remote results are not
    /// added to the store.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError::NotFound`] when neither knows the user,
    /// or another [`PlaceholderError`] when the remote lookup fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn find(&self, id: UserId) -> Result<Lookup, PlaceholderError> {
        {
            let store = self.inner.store.read().await;
            if let Some(user) = store.find_by_id(id) {
                return Ok(Lookup::Stored {
                    user: user.clone(),
                    local: store.is_local(id),
                });
            }
        }

        debug!("Not in store, asking remote source");
        self.placeholder().fetch_user(id).await.map(Lookup::Remote)
    }
}
