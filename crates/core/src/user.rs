//! User records.
//!
//! [`User`] follows the JSONPlaceholder `/users` wire shape, so remote payloads
//! decode straight into it. Nested fields default to empty strings: the
//! remote source is not under our control, and records echoed back by a
//! simulated create only carry what was sent.

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId};
use crate::validation::{Field, FieldErrors};

/// Fallback city for users added without one.
pub const UNKNOWN_CITY: &str = "Unknown City";

/// Fallback company name for users added without one.
pub const NO_COMPANY: &str = "No Company";

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

/// Coordinates as delivered by the remote source (decimal strings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

/// Employer details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
    /// Business tag line ("bs" on the wire).
    #[serde(rename = "bs")]
    pub business: String,
}

impl User {
    /// Uppercased first character of the display name, used for avatars.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }

    /// City for display, falling back to [`UNKNOWN_CITY`].
    #[must_use]
    pub fn city(&self) -> &str {
        let city = self.address.city.trim();
        if city.is_empty() { UNKNOWN_CITY } else { city }
    }

    /// Company name, if the record carries a non-blank one.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        let name = self.company.name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Whether name, username, or email contains `needle`.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.username.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

/// Candidate fields for a user added through the dashboard form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub company: String,
}

/// A [`NewUser`] whose fields passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNewUser {
    pub name: String,
    pub username: String,
    pub email: Email,
    pub phone: String,
    pub city: Option<String>,
    pub company: Option<String>,
}

impl NewUser {
    /// Check the required fields and the email shape.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field; fields that are fine are absent
    /// from the result.
    pub fn validate(&self) -> Result<ValidNewUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert(Field::Name, "Name is required");
        }

        let username = self.username.trim();
        if username.is_empty() {
            errors.insert(Field::Username, "Username is required");
        }

        let email = self.email.trim();
        let parsed_email = if email.is_empty() {
            errors.insert(Field::Email, "Email is required");
            None
        } else {
            match Email::parse(email) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    errors.insert(Field::Email, "Please enter a valid email address");
                    None
                }
            }
        };

        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.insert(Field::Phone, "Phone number is required");
        }

        match parsed_email {
            Some(email) if errors.is_empty() => Ok(ValidNewUser {
                name: name.to_owned(),
                username: username.to_owned(),
                email,
                phone: phone.to_owned(),
                city: non_blank(&self.city),
                company: non_blank(&self.company),
            }),
            _ => Err(errors),
        }
    }
}

impl ValidNewUser {
    /// Build the stored record under the given identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            username: self.username,
            email: self.email.into_inner(),
            phone: self.phone,
            address: Address {
                city: self.city.unwrap_or_else(|| UNKNOWN_CITY.to_owned()),
                ..Address::default()
            },
            company: Company {
                name: self.company.unwrap_or_else(|| NO_COMPANY.to_owned()),
                ..Company::default()
            },
            website: None,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LEANNE: &str = r#"{
        "id": 1,
        "name": "Leanne Graham",
        "username": "Bret",
        "email": "Sincere@april.biz",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    }"#;

    fn candidate() -> NewUser {
        NewUser {
            name: "  Ada Lovelace ".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            city: String::new(),
            company: "   ".to_string(),
        }
    }

    #[test]
    fn test_decode_remote_user() {
        let user: User = serde_json::from_str(LEANNE).unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.username, "Bret");
        assert_eq!(user.address.city, "Gwenborough");
        assert_eq!(user.address.geo.as_ref().unwrap().lat, "-37.3159");
        assert_eq!(user.company.catch_phrase, "Multi-layered client-server neural-net");
        assert_eq!(user.company.business, "harness real-time e-markets");
        assert_eq!(user.website.as_deref(), Some("hildegard.org"));
    }

    #[test]
    fn test_decode_sparse_user() {
        let user: User = serde_json::from_str(
            r#"{"id": 11, "name": "A", "username": "a", "email": "a@b.com", "address": {"city": "Paris"}}"#,
        )
        .unwrap();
        assert_eq!(user.address.city, "Paris");
        assert_eq!(user.address.street, "");
        assert_eq!(user.company, Company::default());
        assert_eq!(user.website, None);
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let user: User = serde_json::from_str(LEANNE).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["company"]["catchPhrase"], "Multi-layered client-server neural-net");
        assert_eq!(value["company"]["bs"], "harness real-time e-markets");
    }

    #[test]
    fn test_display_helpers() {
        let mut user: User = serde_json::from_str(LEANNE).unwrap();
        assert_eq!(user.initial(), Some('L'));
        assert_eq!(user.city(), "Gwenborough");
        assert_eq!(user.company_name(), Some("Romaguera-Crona"));

        user.name = "élodie".to_string();
        user.address.city = " ".to_string();
        user.company.name = String::new();
        assert_eq!(user.initial(), Some('É'));
        assert_eq!(user.city(), UNKNOWN_CITY);
        assert_eq!(user.company_name(), None);
    }

    #[test]
    fn test_matches_each_field() {
        let user: User = serde_json::from_str(LEANNE).unwrap();
        assert!(user.matches("leanne"));
        assert!(user.matches("bret"));
        assert!(user.matches("april.biz"));
        assert!(!user.matches("gwenborough"));
    }

    #[test]
    fn test_validate_trims_and_defaults() {
        let valid = candidate().validate().unwrap();
        assert_eq!(valid.name, "Ada Lovelace");
        assert_eq!(valid.city, None);
        assert_eq!(valid.company, None);

        let user = valid.into_user(UserId::new(4));
        assert_eq!(user.id, UserId::new(4));
        assert_eq!(user.address.city, UNKNOWN_CITY);
        assert_eq!(user.company.name, NO_COMPANY);
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_validate_keeps_optional_fields() {
        let mut new_user = candidate();
        new_user.city = " Lisbon ".to_string();
        new_user.company = "Analytical Engines".to_string();

        let user = new_user.validate().unwrap().into_user(UserId::FIRST);
        assert_eq!(user.address.city, "Lisbon");
        assert_eq!(user.company.name, "Analytical Engines");
    }

    #[test]
    fn test_validate_reports_only_invalid_fields() {
        let mut new_user = candidate();
        new_user.username = "  ".to_string();
        new_user.email = "not-an-email".to_string();

        let errors = new_user.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(
            errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(errors.get(Field::Name), None);
        assert_eq!(errors.get(Field::Phone), None);
    }

    #[test]
    fn test_validate_empty_form() {
        let errors = NewUser::default().validate().unwrap_err();
        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Phone), Some("Phone number is required"));
        assert_eq!(errors.len(), 4);
    }
}
