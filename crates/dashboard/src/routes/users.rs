//! Add-user form and user detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use roster_core::{Field, FieldErrors, NewUser, User, UserId};
use tracing::instrument;

use crate::{
    filters,
    state::{AppState, Lookup},
};

/// Shown in place of a blank detail field.
const NOT_PROVIDED: &str = "Not provided";

/// Message shown when the remote lookup itself fails.
const LOOKUP_FAILED_MESSAGE: &str = "Failed to load user details. Please try again.";

// =============================================================================
// Add-user form
// =============================================================================

/// Static description of one form input.
struct FieldSpec {
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    input_type: &'static str,
    field: Option<Field>,
    value: fn(&NewUser) -> &str,
}

const FORM_FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        name: "name",
        label: "Full Name",
        placeholder: "Enter full name",
        input_type: "text",
        field: Some(Field::Name),
        value: |form| &form.name,
    },
    FieldSpec {
        name: "username",
        label: "Username",
        placeholder: "Enter username",
        input_type: "text",
        field: Some(Field::Username),
        value: |form| &form.username,
    },
    FieldSpec {
        name: "email",
        label: "Email",
        placeholder: "Enter email address",
        input_type: "email",
        field: Some(Field::Email),
        value: |form| &form.email,
    },
    FieldSpec {
        name: "phone",
        label: "Phone",
        placeholder: "Enter phone number",
        input_type: "tel",
        field: Some(Field::Phone),
        value: |form| &form.phone,
    },
    FieldSpec {
        name: "city",
        label: "City",
        placeholder: "Enter city",
        input_type: "text",
        field: None,
        value: |form| &form.city,
    },
    FieldSpec {
        name: "company",
        label: "Company",
        placeholder: "Enter company name",
        input_type: "text",
        field: None,
        value: |form| &form.company,
    },
];

/// One rendered form input.
#[derive(Debug, Clone)]
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input_type: &'static str,
    pub required: bool,
    pub value: String,
    pub error: Option<String>,
}

fn form_fields(form: &NewUser, errors: &FieldErrors) -> Vec<FormFieldView> {
    FORM_FIELDS
        .iter()
        .map(|spec| FormFieldView {
            name: spec.name,
            label: spec.label,
            placeholder: spec.placeholder,
            input_type: spec.input_type,
            required: spec.field.is_some(),
            value: (spec.value)(form).to_string(),
            error: spec
                .field
                .and_then(|field| errors.get(field))
                .map(String::from),
        })
        .collect()
}

/// Add-user form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/new.html")]
pub struct NewUserTemplate {
    pub current_path: String,
    pub fields: Vec<FormFieldView>,
    pub submit_error: Option<String>,
}

impl NewUserTemplate {
    fn render_form(form: &NewUser, errors: &FieldErrors) -> Self {
        Self {
            current_path: "/users/new".to_string(),
            fields: form_fields(form, errors),
            submit_error: errors.get(Field::Submit).map(String::from),
        }
    }
}

/// Empty add-user form.
pub async fn new_form() -> NewUserTemplate {
    NewUserTemplate::render_form(&NewUser::default(), &FieldErrors::new())
}

/// Submit the add-user form.
///
/// POST /users
///
/// Redirects to the dashboard on success. On failure the form is rendered
/// again with the submitted values and per-field messages.
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn create(State(state): State<AppState>, Form(form): Form<NewUser>) -> Response {
    match state.add(&form).await {
        Ok(user) => {
            crate::error::add_breadcrumb("users", "User added");
            tracing::info!(user_id = %user.id, "User added from form");
            Redirect::to("/").into_response()
        }
        Err(errors) => {
            tracing::debug!(%errors, "Add-user form rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                NewUserTemplate::render_form(&form, &errors),
            )
                .into_response()
        }
    }
}

// =============================================================================
// User detail
// =============================================================================

/// User detail view for templates.
#[derive(Debug, Clone)]
pub struct UserDetailView {
    pub id: u32,
    pub name: String,
    pub initial: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    /// Company name for the page header, only when the record has one.
    pub headline_company: Option<String>,
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub company_name: String,
    pub catch_phrase: String,
    pub business: String,
    /// "Local", "Stored", or "Remote"
    pub source: &'static str,
}

impl UserDetailView {
    fn new(user: &User, source: &'static str) -> Self {
        let address = &user.address;
        let company = &user.company;

        Self {
            id: user.id.as_u32(),
            name: user.name.clone(),
            initial: user.initial().map(String::from).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            website: user
                .website
                .as_deref()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from),
            headline_company: user.company_name().map(String::from),
            street: or_not_provided(&address.street),
            suite: or_not_provided(&address.suite),
            city: or_not_provided(&address.city),
            zipcode: or_not_provided(&address.zipcode),
            company_name: or_not_provided(&company.name),
            catch_phrase: or_not_provided(&company.catch_phrase),
            business: or_not_provided(&company.business),
            source,
        }
    }
}

fn or_not_provided(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() { NOT_PROVIDED } else { value }.to_string()
}

impl From<&Lookup> for UserDetailView {
    fn from(lookup: &Lookup) -> Self {
        let source = match lookup {
            Lookup::Stored { local: true, .. } => "Local",
            Lookup::Stored { local: false, .. } => "Stored",
            Lookup::Remote(_) => "Remote",
        };
        Self::new(lookup.user(), source)
    }
}

/// User detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserDetailTemplate {
    pub current_path: String,
    pub user: UserDetailView,
}

/// "User Not Found" page template, used for both kinds of lookup failure.
#[derive(Template, WebTemplate)]
#[template(path = "users/not_found.html")]
pub struct UserNotFoundTemplate {
    pub current_path: String,
    pub message: String,
    pub retry_path: Option<String>,
}

/// User detail page handler.
///
/// GET /users/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.parse::<UserId>() else {
        return not_found(
            format!("/users/{raw_id}"),
            "User not found.".to_string(),
            None,
        );
    };
    // Canonical form, so retry links never carry the raw segment.
    let current_path = format!("/users/{id}");

    match state.find(id).await {
        Ok(lookup) => UserDetailTemplate {
            current_path,
            user: UserDetailView::from(&lookup),
        }
        .into_response(),
        Err(e) if e.is_not_found() => {
            not_found(current_path, format!("No user with ID {id} exists."), None)
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id = %id, "User lookup failed");
            let retry_path = Some(current_path.clone());
            let mut response =
                not_found(current_path, LOOKUP_FAILED_MESSAGE.to_string(), retry_path);
            *response.status_mut() = StatusCode::BAD_GATEWAY;
            response
        }
    }
}

fn not_found(current_path: String, message: String, retry_path: Option<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        UserNotFoundTemplate {
            current_path,
            message,
            retry_path,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use roster_core::{Address, Company};

    use super::*;

    #[test]
    fn test_form_fields_carry_values_and_errors() {
        let form = NewUser {
            name: "Ada".to_string(),
            email: "bad".to_string(),
            city: "Lisbon".to_string(),
            ..NewUser::default()
        };
        let errors = form.validate().unwrap_err();
        let fields = form_fields(&form, &errors);

        assert_eq!(fields.len(), 6);
        let by_name = |name: &str| fields.iter().find(|f| f.name == name).unwrap();

        assert_eq!(by_name("name").value, "Ada");
        assert_eq!(by_name("name").error, None);
        assert_eq!(
            by_name("email").error.as_deref(),
            Some("Please enter a valid email address")
        );
        assert_eq!(by_name("username").error.as_deref(), Some("Username is required"));
        assert_eq!(by_name("city").value, "Lisbon");
        assert!(!by_name("city").required);
        assert!(by_name("phone").required);
    }

    #[test]
    fn test_submit_error_is_separate() {
        let errors = FieldErrors::single(Field::Submit, "Failed to add user. Please try again.");
        let template = NewUserTemplate::render_form(&NewUser::default(), &errors);
        assert!(template.fields.iter().all(|f| f.error.is_none()));
        assert_eq!(
            template.submit_error.as_deref(),
            Some("Failed to add user. Please try again.")
        );
    }

    #[test]
    fn test_detail_view_sections() {
        let user = User {
            id: UserId::new(12),
            name: "Ada".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "1".to_string(),
            address: Address::default(),
            company: Company::default(),
            website: Some("  ".to_string()),
        };

        let view = UserDetailView::from(&Lookup::Stored {
            user: user.clone(),
            local: true,
        });
        assert_eq!(view.source, "Local");
        assert_eq!(view.street, "Not provided");
        assert_eq!(view.zipcode, "Not provided");
        assert_eq!(view.website, None);
        assert_eq!(view.headline_company, None);
        assert_eq!(view.company_name, "Not provided");
        assert_eq!(view.business, "Not provided");

        let view = UserDetailView::from(&Lookup::Remote(user));
        assert_eq!(view.source, "Remote");
    }

    #[test]
    fn test_detail_view_mixes_values_and_fallbacks() {
        let user = User {
            id: UserId::new(3),
            name: "Clementine".to_string(),
            username: "Samantha".to_string(),
            email: "nathan@yesenia.net".to_string(),
            phone: "1".to_string(),
            address: Address {
                city: " McKenziehaven ".to_string(),
                ..Address::default()
            },
            company: Company {
                name: "Romaguera-Jacobson".to_string(),
                ..Company::default()
            },
            website: None,
        };

        let view = UserDetailView::from(&Lookup::Stored { user, local: false });
        assert_eq!(view.source, "Stored");
        assert_eq!(view.city, "McKenziehaven");
        assert_eq!(view.suite, "Not provided");
        assert_eq!(view.headline_company.as_deref(), Some("Romaguera-Jacobson"));
        assert_eq!(view.company_name, "Romaguera-Jacobson");
        assert_eq!(view.catch_phrase, "Not provided");
    }
}
