use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::validation::age_on;

/// Exactly ten ASCII digits, no separators.
pub static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{10}$").unwrap_or_else(|e| panic!("phone pattern is valid: {e}"))
});

/// Rejects empty and whitespace-only strings.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Persisted user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Unique across all users
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
}

/// A user that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
}

impl NewUser {
    /// Attach the id assigned by the store.
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
        }
    }
}

/// Body of `POST /users`
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "First name is required"),
        length(max = 128, message = "First name cannot exceed 128 characters")
    )]
    #[schema(example = "Ada", max_length = 128)]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Last name cannot exceed 128 characters"))]
    #[schema(example = "Lovelace", max_length = 128)]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Invalid email format"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    #[schema(example = "ada@example.com", max_length = 255)]
    pub email: String,

    /// Must be at least 18 years before today
    #[schema(value_type = String, format = Date, example = "1990-12-10")]
    pub date_of_birth: NaiveDate,

    #[serde(default)]
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    #[schema(example = "5551234567", pattern = "^[0-9]{10}$")]
    pub phone_number: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            date_of_birth: req.date_of_birth,
            phone_number: req.phone_number,
        }
    }
}

/// Body of `PUT /users/{id}`. Replaces every field.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "First name is required"),
        length(max = 128, message = "First name cannot exceed 128 characters")
    )]
    #[schema(example = "Ada", max_length = 128)]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Last name cannot exceed 128 characters"))]
    #[schema(example = "King", max_length = 128)]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Invalid email format"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    #[schema(example = "ada.king@example.com", max_length = 255)]
    pub email: String,

    #[schema(value_type = String, format = Date, example = "1990-12-10")]
    pub date_of_birth: NaiveDate,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Phone number is required"),
        regex(path = *PHONE_REGEX, message = "Phone number must be 10 digits")
    )]
    #[schema(example = "5557654321", pattern = "^[0-9]{10}$")]
    pub phone_number: String,
}

impl UpdateUserRequest {
    /// The replacement record for user `id`.
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
        }
    }
}

/// User as returned by the API, with the age derived at response time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: NaiveDate,
    pub phone_number: String,
    /// Whole years between `dateOfBirth` and today (UTC)
    pub age: i32,
}

impl UserResponse {
    pub fn from_user(user: User, today: NaiveDate) -> Self {
        let age = age_on(user.date_of_birth, today);
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            phone_number: user.phone_number,
            age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_phone_regex_accepts_only_ten_ascii_digits() {
        assert!(PHONE_REGEX.is_match("5551234567"));
        assert!(!PHONE_REGEX.is_match("555123456"));
        assert!(!PHONE_REGEX.is_match("55512345678"));
        assert!(!PHONE_REGEX.is_match("555-123-4567"));
        assert!(!PHONE_REGEX.is_match("٥٥٥١٢٣٤٥٦٧"));
    }

    #[test]
    fn test_create_request_uses_camel_case_and_defaults() {
        let req: CreateUserRequest = serde_json::from_value(json!({
            "firstName": "Ada",
            "email": "ada@example.com",
            "dateOfBirth": "1990-12-10",
            "phoneNumber": "5551234567"
        }))
        .unwrap();

        assert_eq!(req.first_name, "Ada");
        assert_eq!(req.last_name, None);
        assert_eq!(req.date_of_birth, NaiveDate::from_ymd_opt(1990, 12, 10).unwrap());
    }

    #[test]
    fn test_missing_strings_deserialize_as_empty() {
        let req: UpdateUserRequest =
            serde_json::from_value(json!({ "dateOfBirth": "1990-01-01" })).unwrap();

        assert!(req.first_name.is_empty());
        assert!(req.email.is_empty());
        assert!(req.phone_number.is_empty());
    }

    #[test]
    fn test_response_serializes_age_and_camel_case() {
        let user = User {
            id: 7,
            first_name: "Ada".into(),
            last_name: Some("Lovelace".into()),
            email: "ada@example.com".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            phone_number: "5551234567".into(),
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let body = serde_json::to_value(UserResponse::from_user(user, today)).unwrap();

        assert_eq!(body["id"], 7);
        assert_eq!(body["lastName"], "Lovelace");
        assert_eq!(body["dateOfBirth"], "1990-12-10");
        assert_eq!(body["age"], 35);
    }
}
