use serde::{Deserialize, Serialize};

use crate::Patch;

// Request bodies keep every field optional: presence and emptiness are
// checked by the handlers so that a missing field is a 400, not a
// deserialization failure.

// -- Contacts --

#[derive(Debug, Default, Deserialize)]
pub struct CreateContactRequest {
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "local")]
    pub location: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default, rename = "descricao")]
    pub description: Patch<String>,
    #[serde(default, rename = "local")]
    pub location: Patch<String>,
    #[serde(default, rename = "telefone")]
    pub phone: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
}

impl UpdateContactRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.description.is_absent()
            && self.location.is_absent()
            && self.phone.is_absent()
            && self.email.is_absent()
    }
}

// -- Reports --

#[derive(Debug, Default, Deserialize)]
pub struct CreateReportRequest {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "identificar")]
    pub identify: Option<bool>,
    #[serde(rename = "motivo")]
    pub reason: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "agressor")]
    pub offender: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

// -- Events --

#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "local")]
    pub location: Option<String>,
    #[serde(rename = "data")]
    pub date: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default, rename = "descricao")]
    pub description: Patch<String>,
    #[serde(default, rename = "local")]
    pub location: Patch<String>,
    #[serde(default, rename = "data")]
    pub date: Patch<i64>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.description.is_absent()
            && self.location.is_absent()
            && self.date.is_absent()
    }
}

// -- Information --

#[derive(Debug, Default, Deserialize)]
pub struct CreateInformationRequest {
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

// -- Auth --

/// `name` and `cargo` only have to be present: null and empty strings are
/// stored as given, so they track key presence rather than a value.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default, rename = "cargo")]
    pub role: Patch<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// -- Responses --

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_unknown_keys_only_is_empty() {
        let req: UpdateContactRequest =
            serde_json::from_str(r#"{"id": 3, "created_at": 1}"#).unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn register_tracks_key_presence() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "a", "password": "p", "name": null}"#).unwrap();
        assert_eq!(req.name, Patch::Null);
        assert!(req.role.is_absent());
    }

    #[test]
    fn update_with_null_field_is_not_empty() {
        let req: UpdateEventRequest = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(!req.is_empty());
        assert_eq!(req.date, Patch::Null);
    }
}
