//! Integration test harness for the Roster dashboard.
//!
//! Each test runs two in-process servers on ephemeral ports:
//!
//! - [`StubRemote`] plays the JSONPlaceholder-style user source and counts
//!   the requests it receives
//! - [`TestDashboard`] is the real dashboard router pointed at the stub
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p roster-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use roster_core::{Address, Company, User, UserId};
use roster_dashboard::config::{DashboardConfig, PlaceholderConfig};
use roster_dashboard::routes;
use roster_dashboard::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

/// Identifier the stub assigns to every created user, as JSONPlaceholder does.
pub const STUB_CREATED_ID: u32 = 11;

/// Build a fixture user the way the remote source would return it.
#[must_use]
pub fn fixture_user(id: u32, name: &str, username: &str, email: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        phone: "1-770-736-8031".to_string(),
        address: Address {
            street: "Kulas Light".to_string(),
            suite: "Apt. 556".to_string(),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
            geo: None,
        },
        company: Company {
            name: "Romaguera-Crona".to_string(),
            catch_phrase: "Multi-layered client-server neural-net".to_string(),
            business: "harness real-time e-markets".to_string(),
        },
        website: Some("hildegard.org".to_string()),
    }
}

/// The users the stub lists by default: ids 1 and 3, leaving a gap.
#[must_use]
pub fn fixture_users() -> Vec<User> {
    vec![
        fixture_user(1, "Leanne Graham", "Bret", "Sincere@april.biz"),
        fixture_user(3, "Clementine Bauch", "Samantha", "Nathan@yesenia.net"),
    ]
}

// =============================================================================
// Stub remote source
// =============================================================================

#[derive(Default)]
struct StubState {
    list: Mutex<Vec<User>>,
    /// Served by `GET /users/{id}` but not listed.
    extra: Vec<User>,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    /// Held by the next `GET /users` until released.
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    list_hits: AtomicUsize,
    user_hits: AtomicUsize,
    create_hits: AtomicUsize,
    last_created: Mutex<Option<Value>>,
}

/// Releases a `GET /users` response held by [`StubRemote::hold_next_list`].
pub struct ListGate(oneshot::Sender<()>);

impl ListGate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

/// In-process stand-in for the remote user source.
pub struct StubRemote {
    base_url: Url,
    state: Arc<StubState>,
}

impl StubRemote {
    /// Serve `list` from `GET /users`, and `list` plus `extra` from
    /// `GET /users/{id}`.
    pub async fn spawn(list: Vec<User>, extra: Vec<User>) -> Self {
        let state = Arc::new(StubState {
            list: Mutex::new(list),
            extra,
            ..StubState::default()
        });

        let app = Router::new()
            .route("/users", get(stub_list).post(stub_create))
            .route("/users/{id}", get(stub_user))
            .with_state(Arc::clone(&state));

        let base_url = serve(app).await;
        Self { base_url, state }
    }

    /// Base URL to hand to the dashboard.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace what `GET /users` lists from now on.
    pub fn set_list(&self, list: Vec<User>) {
        *self.state.list.lock().unwrap() = list;
    }

    /// Hold the response to the next `GET /users` until the gate is released.
    ///
    /// The held request answers with the list and failure setting in effect
    /// when it arrived.
    #[must_use]
    pub fn hold_next_list(&self) -> ListGate {
        let (tx, rx) = oneshot::channel();
        *self.state.list_gate.lock().unwrap() = Some(rx);
        ListGate(tx)
    }

    /// Wait until `GET /users` has been requested `hits` times.
    pub async fn wait_for_list_hits(&self, hits: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.list_hits() < hits {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    /// Make `GET /users` answer 500 until turned off again.
    pub fn fail_list(&self, fail: bool) {
        self.state.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make `POST /users` answer 500 until turned off again.
    pub fn fail_create(&self, fail: bool) {
        self.state.fail_create.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn list_hits(&self) -> usize {
        self.state.list_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn user_hits(&self) -> usize {
        self.state.user_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn create_hits(&self) -> usize {
        self.state.create_hits.load(Ordering::SeqCst)
    }

    /// Body of the most recent `POST /users`.
    #[must_use]
    pub fn last_created(&self) -> Option<Value> {
        self.state.last_created.lock().unwrap().clone()
    }
}

async fn stub_list(State(state): State<Arc<StubState>>) -> Response {
    let fail = state.fail_list.load(Ordering::SeqCst);
    let list = state.list.lock().unwrap().clone();
    let gate = state.list_gate.lock().unwrap().take();
    state.list_hits.fetch_add(1, Ordering::SeqCst);

    if let Some(gate) = gate {
        let _ = gate.await;
    }

    if fail {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(list).into_response()
}

async fn stub_user(State(state): State<Arc<StubState>>, Path(id): Path<u32>) -> Response {
    state.user_hits.fetch_add(1, Ordering::SeqCst);
    let found = state
        .list
        .lock()
        .unwrap()
        .iter()
        .chain(&state.extra)
        .find(|user| user.id.as_u32() == id)
        .cloned();
    found.map_or_else(
        || (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
        |user| Json(user).into_response(),
    )
}

async fn stub_create(State(state): State<Arc<StubState>>, Json(mut body): Json<Value>) -> Response {
    state.create_hits.fetch_add(1, Ordering::SeqCst);
    *state.last_created.lock().unwrap() = Some(body.clone());
    if state.fail_create.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    body["id"] = json!(STUB_CREATED_ID);
    (StatusCode::CREATED, Json(body)).into_response()
}

// =============================================================================
// Dashboard under test
// =============================================================================

/// A running dashboard wired to a [`StubRemote`].
pub struct TestDashboard {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
}

impl TestDashboard {
    /// Start the dashboard without loading users.
    pub async fn spawn(remote: &StubRemote, simulate_remote_add: bool) -> Self {
        let mut placeholder = PlaceholderConfig::new(remote.base_url().clone());
        placeholder.simulate_remote_add = simulate_remote_add;

        let mut config = DashboardConfig::from_vars(|_| None).unwrap();
        config.placeholder = placeholder;

        let state = AppState::new(config).unwrap();
        let base_url = serve(routes::app(state.clone())).await;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            client,
            state,
        }
    }

    /// Start the dashboard and wait for the initial load to finish.
    pub async fn spawn_loaded(remote: &StubRemote, simulate_remote_add: bool) -> Self {
        let dashboard = Self::spawn(remote, simulate_remote_add).await;
        dashboard.state.load().await.unwrap();
        dashboard
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

/// Bind `app` to an ephemeral local port and return its base URL.
async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}
