//! # Failure normalization
//!
//! Every non-2xx response and every transport failure is turned into an
//! [`ApiError`] before it leaves the client. Transport detail is logged at
//! `debug` and dropped; callers only ever see one of the payload shapes the
//! backend actually produces:
//!
//! | Body | Variant |
//! |------|---------|
//! | status 401 | [`ApiError::Unauthorized`] |
//! | `{"error": ..., "days_remaining": n}` (or `days_until_next_update` / `days`) with `n > 0` | [`ApiError::Rejected`] |
//! | `{"error": ...}` or `{"detail": ...}` | [`ApiError::Message`] |
//! | `{"field": ["msg", ...], ...}` | [`ApiError::Validation`] |
//! | anything else, or no response at all | [`ApiError::Unavailable`] with the operation's fallback message |

use std::collections::BTreeMap;

use serde_json::Value;

/// Keys the backend uses for a remaining-days value on cooldown rejections.
const DAYS_KEYS: [&str; 3] = ["days_remaining", "days_until_next_update", "days"];

const REQUIRED: &str = "This field is required.";

/// Field-keyed validation messages, e.g. `{"username": ["Username already taken"]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// One "This field is required." message per named field.
    pub fn required<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|field| (field.to_string(), vec![REQUIRED.to_string()]))
                .collect(),
        )
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// First message of the first field, in key order.
    pub fn first(&self) -> Option<&str> {
        self.0
            .values()
            .find_map(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn summary(&self) -> String {
        self.first().unwrap_or("Invalid input").to_string()
    }

    /// Accept an object whose values are strings or arrays of strings.
    fn from_object(object: &serde_json::Map<String, Value>) -> Option<Self> {
        if object.is_empty() {
            return None;
        }
        let mut fields = BTreeMap::new();
        for (field, value) in object {
            let messages = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()?,
                _ => return None,
            };
            fields.insert(field.clone(), messages);
        }
        Some(Self(fields))
    }
}

/// Client-side API error. Never carries transport detail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", .0.summary())]
    Validation(FieldErrors),

    #[error("{message}")]
    Rejected { message: String, days_remaining: u32 },

    #[error("{0}")]
    Message(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("session: {0}")]
    Session(String),
}

impl ApiError {
    /// Normalize a non-2xx response body.
    pub fn from_response(status: u16, body: &[u8], fallback: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let object = parsed.as_ref().and_then(Value::as_object);
        let text = |key: &str| {
            object
                .and_then(|o| o.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        let message = text("error").or_else(|| text("detail"));

        if status == 401 {
            return ApiError::Unauthorized(
                message.unwrap_or_else(|| "Authentication required".to_string()),
            );
        }

        let Some(object) = object else {
            return ApiError::Unavailable(fallback.to_string());
        };

        let days = DAYS_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_u64));
        if let Some(days) = days.filter(|d| *d > 0) {
            return ApiError::Rejected {
                message: message.unwrap_or_else(|| fallback.to_string()),
                days_remaining: u32::try_from(days).unwrap_or(u32::MAX),
            };
        }

        if let Some(message) = message {
            return ApiError::Message(message);
        }

        match FieldErrors::from_object(object) {
            Some(fields) => ApiError::Validation(fields),
            None => ApiError::Unavailable(fallback.to_string()),
        }
    }

    /// Display string for a transient notice.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Remaining days on a cooldown rejection.
    pub fn days_remaining(&self) -> Option<u32> {
        match self {
            ApiError::Rejected { days_remaining, .. } => Some(*days_remaining),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(fields) => Some(fields),
            _ => None,
        }
    }

    /// The session is no longer valid; the caller should route to sign-in.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_becomes_message() {
        let err = ApiError::from_response(
            400,
            br#"{"error": "You are already following this user"}"#,
            "Failed to update follow status",
        );
        assert_eq!(
            err,
            ApiError::Message("You are already following this user".to_string())
        );
        assert_eq!(err.message(), "You are already following this user");
    }

    #[test]
    fn test_detail_field_becomes_message() {
        let err = ApiError::from_response(404, br#"{"detail": "Not found."}"#, "x");
        assert_eq!(err.message(), "Not found.");
    }

    #[test]
    fn test_validation_map() {
        let err = ApiError::from_response(
            400,
            br#"{"username": ["Username already taken"], "confirm_password": "Passwords do not match"}"#,
            "Something went wrong",
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(
            fields.get("username").unwrap(),
            &["Username already taken".to_string()]
        );
        assert_eq!(
            fields.get("confirm_password").unwrap(),
            &["Passwords do not match".to_string()]
        );
        // key order: confirm_password < username
        assert_eq!(err.message(), "Passwords do not match");
    }

    #[test]
    fn test_cooldown_rejection_carries_days() {
        let err = ApiError::from_response(
            403,
            br#"{"error": "You can only update your profile once every 7 days. Please wait 4 more day(s).", "days_remaining": 4, "can_update": false}"#,
            "Failed to update profile",
        );
        assert_eq!(err.days_remaining(), Some(4));
        assert!(err.message().starts_with("You can only update"));

        let alt = ApiError::from_response(403, br#"{"days_until_next_update": 2}"#, "Failed");
        assert_eq!(
            alt,
            ApiError::Rejected {
                message: "Failed".to_string(),
                days_remaining: 2
            }
        );
    }

    #[test]
    fn test_zero_days_is_not_a_rejection() {
        let err = ApiError::from_response(403, br#"{"error": "nope", "days": 0}"#, "Failed");
        assert_eq!(err, ApiError::Message("nope".to_string()));
    }

    #[test]
    fn test_unauthorized_regardless_of_body() {
        let err = ApiError::from_response(
            401,
            br#"{"detail": "Given token not valid for any token type"}"#,
            "Failed to fetch profile",
        );
        assert!(err.is_auth_failure());
        assert!(ApiError::from_response(401, b"", "x").is_auth_failure());
    }

    #[test]
    fn test_unrecognised_body_uses_fallback() {
        let html = ApiError::from_response(500, b"<html>boom</html>", "Failed to fetch notifications");
        assert_eq!(
            html,
            ApiError::Unavailable("Failed to fetch notifications".to_string())
        );

        let nested = ApiError::from_response(400, br#"{"profile": {"a": 1}}"#, "Something went wrong");
        assert_eq!(nested.message(), "Something went wrong");
    }
}
