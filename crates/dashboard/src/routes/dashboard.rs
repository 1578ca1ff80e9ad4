//! Dashboard (user list) route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    filters,
    state::{AppState, ListedUser, LoadOutcome, LoadStatus},
};

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// User card view for templates.
#[derive(Debug, Clone)]
pub struct UserCardView {
    pub id: u32,
    pub name: String,
    pub initial: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub company: Option<String>,
    pub local: bool,
}

impl From<&ListedUser> for UserCardView {
    fn from(listed: &ListedUser) -> Self {
        let user = &listed.user;
        Self {
            id: user.id.as_u32(),
            name: user.name.clone(),
            initial: user.initial().map(String::from).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            city: user.city().to_string(),
            company: user.company_name().map(String::from),
            local: listed.local,
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub loading: bool,
    pub load_error: Option<String>,
    pub users: Vec<UserCardView>,
    pub query: String,
    pub summary: String,
}

/// "3 users in total" / "1 user found for "ann"".
fn summary(count: usize, query: &str) -> String {
    let noun = if count == 1 { "user" } else { "users" };
    if query.trim().is_empty() {
        format!("{count} {noun} in total")
    } else {
        format!("{count} {noun} found for \"{query}\"")
    }
}

/// Dashboard page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> DashboardTemplate {
    // Matched as typed; only a blank query is special.
    let query = query.q;
    let status = state.status().await;

    let users: Vec<UserCardView> = match status {
        LoadStatus::Ready => state.search(&query).await.iter().map(UserCardView::from).collect(),
        LoadStatus::Loading | LoadStatus::Failed(_) => Vec::new(),
    };

    let (loading, load_error) = match status {
        LoadStatus::Loading => (true, None),
        LoadStatus::Ready => (false, None),
        LoadStatus::Failed(message) => (false, Some(message)),
    };

    DashboardTemplate {
        current_path: "/".to_string(),
        loading,
        load_error,
        summary: summary(users.len(), &query),
        users,
        query,
    }
}

/// Retry or refresh the remote load.
///
/// POST /reload
#[instrument(skip(state))]
pub async fn reload(State(state): State<AppState>) -> Redirect {
    crate::error::add_breadcrumb("users", "Reload requested");

    match state.load().await {
        Ok(LoadOutcome::Loaded { count, .. }) => tracing::info!(count, "Reload complete"),
        Ok(LoadOutcome::Superseded) => tracing::debug!("Reload superseded by a newer one"),
        // Already logged and recorded as the load status.
        Err(_) => {}
    }

    Redirect::to("/")
}
