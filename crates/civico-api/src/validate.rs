//! Presence checks for request bodies.

use axum::{Json, extract::rejection::JsonRejection};
use tracing::warn;

use civico_types::Patch;

use crate::ApiError;

/// Unwrap a JSON body, turning a malformed or missing body into a 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!("rejected request body: {}", rejection.body_text());
            Err(ApiError::Validation(rejection.body_text()))
        }
    }
}

/// Collects missing required fields so a single 400 names all of them.
#[derive(Debug, Default)]
pub struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    /// A string that must be present and non-empty.
    pub fn text(&mut self, value: Option<String>, field: &'static str) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// A non-string value that only has to be present.
    pub fn value<T: Default>(&mut self, value: Option<T>, field: &'static str) -> T {
        value.unwrap_or_else(|| {
            self.missing.push(field);
            T::default()
        })
    }

    /// A nullable value whose key must appear in the body. Null and empty
    /// strings are accepted as given.
    pub fn present(&mut self, value: Patch<String>, field: &'static str) -> Option<String> {
        match value {
            Patch::Absent => {
                self.missing.push(field);
                None
            }
            Patch::Null => None,
            Patch::Value(v) => Some(v),
        }
    }

    /// A merge-patch field backed by a NOT NULL column: it may be absent,
    /// but if present it cannot be null or empty.
    pub fn patched_text(&mut self, value: &Patch<String>, field: &'static str) {
        match value {
            Patch::Null => self.missing.push(field),
            Patch::Value(v) if v.is_empty() => self.missing.push(field),
            _ => {}
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        let msg = format!("missing required fields: {}", self.missing.join(", "));
        warn!("{}", msg);
        Err(ApiError::Validation(msg))
    }
}
