//! JSONPlaceholder REST client.

use reqwest::StatusCode;
use roster_core::user::ValidNewUser;
use roster_core::{User, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::PlaceholderError;
use crate::config::PlaceholderConfig;

/// Client for the remote user source.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PlaceholderClient {
    client: reqwest::Client,
    base_url: String,
}

/// Body sent to `POST /users`, in the remote source's shape.
#[derive(Debug, Serialize)]
struct CreateUserBody<'a> {
    name: &'a str,
    username: &'a str,
    email: &'a str,
    phone: &'a str,
    address: CreateUserAddress<'a>,
    company: CreateUserCompany<'a>,
}

#[derive(Debug, Serialize)]
struct CreateUserAddress<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CreateUserCompany<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedUser {
    id: UserId,
}

impl PlaceholderClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PlaceholderConfig) -> Result<Self, PlaceholderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{id}", self.base_url)
    }

    /// Fetch every user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API responds with a
    /// non-success status, or the body is not a JSON array of users.
    #[instrument(skip(self))]
    pub async fn fetch_users(&self) -> Result<Vec<User>, PlaceholderError> {
        let response = self.client.get(self.users_url()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlaceholderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let users: Vec<User> = response
            .json()
            .await
            .map_err(|e| PlaceholderError::Parse(e.to_string()))?;

        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    /// Fetch a single user.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceholderError::NotFound`] on 404, and the usual transport,
    /// status, or decode errors otherwise.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn fetch_user(&self, id: UserId) -> Result<User, PlaceholderError> {
        let response = self.client.get(self.user_url(id)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(PlaceholderError::NotFound(id));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlaceholderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| PlaceholderError::Parse(e.to_string()))
    }

    /// Send a new user to the remote source.
    ///
    /// The remote source only pretends to store it. The identifier it returns
    /// is reported for logging; callers must not rely on it.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API responds with a
    /// non-success status.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_user(&self, user: &ValidNewUser) -> Result<UserId, PlaceholderError> {
        let body = CreateUserBody {
            name: &user.name,
            username: &user.username,
            email: user.email.as_str(),
            phone: &user.phone,
            address: CreateUserAddress {
                city: user.city.as_deref(),
            },
            company: CreateUserCompany {
                name: user.company.as_deref(),
            },
        };

        let response = self.client.post(self.users_url()).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlaceholderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreatedUser = response
            .json()
            .await
            .map_err(|e| PlaceholderError::Parse(e.to_string()))?;

        debug!(remote_id = %created.id, "Remote source accepted user");
        Ok(created.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn client_for(base: &str) -> PlaceholderClient {
        PlaceholderClient::new(&PlaceholderConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_urls_without_trailing_slash() {
        let client = client_for("https://jsonplaceholder.typicode.com");
        assert_eq!(client.users_url(), "https://jsonplaceholder.typicode.com/users");
        assert_eq!(
            client.user_url(UserId::new(3)),
            "https://jsonplaceholder.typicode.com/users/3"
        );
    }

    #[test]
    fn test_urls_keep_base_path() {
        let client = client_for("http://localhost:9000/api/");
        assert_eq!(client.base_url(), "http://localhost:9000/api");
        assert_eq!(client.users_url(), "http://localhost:9000/api/users");
    }

    #[test]
    fn test_create_body_shape() {
        let valid = roster_core::NewUser {
            name: "A".to_string(),
            username: "a".to_string(),
            email: "a@b.com".to_string(),
            phone: "1".to_string(),
            city: String::new(),
            company: "Acme".to_string(),
        }
        .validate()
        .unwrap();

        let body = CreateUserBody {
            name: &valid.name,
            username: &valid.username,
            email: valid.email.as_str(),
            phone: &valid.phone,
            address: CreateUserAddress {
                city: valid.city.as_deref(),
            },
            company: CreateUserCompany {
                name: valid.company.as_deref(),
            },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "name": "A",
                "username": "a",
                "email": "a@b.com",
                "phone": "1",
                "address": {},
                "company": { "name": "Acme" }
            })
        );
    }
}
