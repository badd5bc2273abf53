use serde::{Deserialize, Serialize};

use crate::api::{UpdateContactRequest, UpdateEventRequest};

// Wire names follow the mobile client, which speaks Portuguese field names.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "local")]
    pub location: Option<String>,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Milliseconds since the Unix epoch, assigned by the server on insert.
    pub created_at: i64,
}

impl Contact {
    /// Merge the fields present in `patch` into this record.
    pub fn apply(&mut self, patch: UpdateContactRequest) {
        patch.title.set(&mut self.title);
        patch.description.set(&mut self.description);
        patch.location.set_nullable(&mut self.location);
        patch.phone.set_nullable(&mut self.phone);
        patch.email.set_nullable(&mut self.email);
    }
}

/// An abuse report. Unlike the other entities, `created_at` is supplied by
/// the client and stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "identificar")]
    pub identify: bool,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "agressor")]
    pub offender: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "local")]
    pub location: Option<String>,
    /// When the event takes place, as chosen by the client.
    #[serde(rename = "data")]
    pub date: Option<i64>,
    pub created_at: i64,
}

impl Event {
    pub fn apply(&mut self, patch: UpdateEventRequest) {
        patch.title.set(&mut self.title);
        patch.description.set(&mut self.description);
        patch.location.set_nullable(&mut self.location);
        patch.date.set_nullable(&mut self.date);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Information {
    pub id: i64,
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub created_at: i64,
}

/// Public view of a user. The stored password never leaves the db crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    #[serde(rename = "cargo")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Patch;

    fn contact() -> Contact {
        Contact {
            id: 7,
            title: "Delegacia da Mulher".into(),
            description: "Atendimento 24h".into(),
            location: Some("Centro".into()),
            phone: Some("180".into()),
            email: None,
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn contact_apply_only_touches_present_fields() {
        let mut c = contact();
        let before = c.clone();

        c.apply(UpdateContactRequest {
            phone: Patch::Value("190".into()),
            ..Default::default()
        });

        assert_eq!(c.phone.as_deref(), Some("190"));
        assert_eq!(c.title, before.title);
        assert_eq!(c.description, before.description);
        assert_eq!(c.location, before.location);
        assert_eq!(c.email, before.email);
        assert_eq!(c.created_at, before.created_at);
    }

    #[test]
    fn contact_apply_null_clears_optional_field() {
        let mut c = contact();
        c.apply(UpdateContactRequest {
            location: Patch::Null,
            ..Default::default()
        });
        assert_eq!(c.location, None);
    }

    #[test]
    fn event_apply_updates_date() {
        let mut e = Event {
            id: 1,
            title: "Roda de conversa".into(),
            description: "Encontro mensal".into(),
            location: None,
            date: Some(1),
            created_at: 10,
        };
        e.apply(UpdateEventRequest {
            date: Patch::Value(2),
            ..Default::default()
        });
        assert_eq!(e.date, Some(2));
        assert_eq!(e.title, "Roda de conversa");
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(contact()).unwrap();
        assert_eq!(json["descricao"], "Atendimento 24h");
        assert_eq!(json["telefone"], "180");
        assert!(json["email"].is_null());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn report_uses_camel_case_created_at() {
        let r = Report {
            id: 1,
            name: None,
            identify: false,
            reason: "assédio".into(),
            description: "no ônibus".into(),
            offender: None,
            created_at: "2024-05-01T10:00:00Z".into(),
        };
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00Z");
        assert_eq!(json["identificar"], false);
    }
}
