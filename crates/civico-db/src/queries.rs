use civico_types::api::{UpdateContactRequest, UpdateEventRequest};
use civico_types::models::{Contact, Event, Information, Report, User};
use rusqlite::{Connection, Row, params};
use tracing::debug;

use crate::models::{NewContact, NewEvent, NewInformation, NewReport, NewUser};
use crate::{Database, DbError, Result};

impl Database {
    // -- Contacts --

    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.with_conn(query_contacts)
    }

    pub fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        self.with_conn(|conn| query_contact(conn, id))
    }

    pub fn insert_contact(&self, new: NewContact) -> Result<Contact> {
        self.with_conn(|conn| {
            let created_at = now_millis();
            conn.execute(
                "INSERT INTO contatos (title, descricao, local, telefone, email, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![new.title, new.description, new.location, new.phone, new.email, created_at],
            )?;

            Ok(Contact {
                id: conn.last_insert_rowid(),
                title: new.title,
                description: new.description,
                location: new.location,
                phone: new.phone,
                email: new.email,
                created_at,
            })
        })
    }

    /// Merge `patch` into the stored contact. Returns `None` if `id` is unknown.
    pub fn update_contact(&self, id: i64, patch: UpdateContactRequest) -> Result<Option<Contact>> {
        self.with_conn(|conn| {
            // Dropping an uncommitted transaction rolls it back.
            let tx = conn.unchecked_transaction()?;
            let Some(mut contact) = query_contact(&tx, id)? else {
                return Ok(None);
            };

            contact.apply(patch);
            tx.execute(
                "UPDATE contatos SET title = ?1, descricao = ?2, local = ?3, telefone = ?4, email = ?5
                 WHERE id = ?6",
                params![
                    contact.title,
                    contact.description,
                    contact.location,
                    contact.phone,
                    contact.email,
                    id
                ],
            )?;
            tx.commit()?;

            Ok(Some(contact))
        })
    }

    /// Returns `false` if nothing was deleted.
    pub fn delete_contact(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| delete_by_id(conn, "contatos", id))
    }

    // -- Reports --

    pub fn list_reports(&self) -> Result<Vec<Report>> {
        self.with_conn(query_reports)
    }

    pub fn insert_report(&self, new: NewReport) -> Result<Report> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO denuncias (nome, identificar, motivo, descricao, agressor, createdAt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new.name,
                    new.identify,
                    new.reason,
                    new.description,
                    new.offender,
                    new.created_at
                ],
            )?;

            Ok(Report {
                id: conn.last_insert_rowid(),
                name: new.name,
                identify: new.identify,
                reason: new.reason,
                description: new.description,
                offender: new.offender,
                created_at: new.created_at,
            })
        })
    }

    // -- Events --

    pub fn list_events(&self) -> Result<Vec<Event>> {
        self.with_conn(query_events)
    }

    pub fn get_event(&self, id: i64) -> Result<Option<Event>> {
        self.with_conn(|conn| query_event(conn, id))
    }

    pub fn insert_event(&self, new: NewEvent) -> Result<Event> {
        self.with_conn(|conn| {
            let created_at = now_millis();
            conn.execute(
                "INSERT INTO eventos (title, descricao, local, data, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![new.title, new.description, new.location, new.date, created_at],
            )?;

            Ok(Event {
                id: conn.last_insert_rowid(),
                title: new.title,
                description: new.description,
                location: new.location,
                date: Some(new.date),
                created_at,
            })
        })
    }

    pub fn update_event(&self, id: i64, patch: UpdateEventRequest) -> Result<Option<Event>> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let Some(mut event) = query_event(&tx, id)? else {
                return Ok(None);
            };

            event.apply(patch);
            tx.execute(
                "UPDATE eventos SET title = ?1, descricao = ?2, local = ?3, data = ?4 WHERE id = ?5",
                params![event.title, event.description, event.location, event.date, id],
            )?;
            tx.commit()?;

            Ok(Some(event))
        })
    }

    pub fn delete_event(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| delete_by_id(conn, "eventos", id))
    }

    // -- Information --

    pub fn list_information(&self) -> Result<Vec<Information>> {
        self.with_conn(query_information_list)
    }

    pub fn get_information(&self, id: i64) -> Result<Option<Information>> {
        self.with_conn(|conn| query_information(conn, id))
    }

    pub fn insert_information(&self, new: NewInformation) -> Result<Information> {
        self.with_conn(|conn| {
            let created_at = now_millis();
            conn.execute(
                "INSERT INTO informacoes (title, descricao, created_at) VALUES (?1, ?2, ?3)",
                params![new.title, new.description, created_at],
            )?;

            Ok(Information {
                id: conn.last_insert_rowid(),
                title: new.title,
                description: new.description,
                created_at,
            })
        })
    }

    // -- Users --

    /// Insert a user unless the username is taken. The lookup and the insert
    /// run under the same connection lock; the UNIQUE constraint covers any
    /// other writer on the same file.
    pub fn create_user(&self, new: NewUser) -> Result<User> {
        self.with_conn(|conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM users WHERE username = ?1",
                    [&new.username],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Err(DbError::Conflict(format!(
                    "username '{}' already taken",
                    new.username
                )));
            }

            conn.execute(
                "INSERT INTO users (username, password, name, cargo) VALUES (?1, ?2, ?3, ?4)",
                params![new.username, new.password, new.name, new.role],
            )?;

            Ok(User {
                id: conn.last_insert_rowid(),
                username: new.username,
                name: new.name,
                role: new.role,
            })
        })
    }

    /// Plaintext credential match. Passwords are stored and compared as
    /// given; this is the known weak point of the user table.
    pub fn find_user_by_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, name, cargo FROM users
                     WHERE username = ?1 AND password = ?2",
                    [username, password],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    #[cfg(test)]
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT id, username, name, cargo FROM users WHERE username = ?1",
                    [username],
                    user_from_row,
                )
                .optional()?;
            Ok(user)
        })
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn delete_by_id(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let removed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
    debug!("delete {} id={} removed={}", table, id, removed);
    Ok(removed > 0)
}

// Lists sort newest first; ids break ties between rows created in the same
// millisecond so repeated reads return the same order.

fn query_contacts(conn: &Connection) -> Result<Vec<Contact>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, descricao, local, telefone, email, created_at
         FROM contatos ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([], contact_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_contact(conn: &Connection, id: i64) -> Result<Option<Contact>> {
    conn.query_row(
        "SELECT id, title, descricao, local, telefone, email, created_at
         FROM contatos WHERE id = ?1",
        [id],
        contact_from_row,
    )
    .optional()
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn query_reports(conn: &Connection) -> Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT id, nome, identificar, motivo, descricao, agressor, createdAt
         FROM denuncias ORDER BY createdAt DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Report {
                id: row.get(0)?,
                name: row.get(1)?,
                identify: row.get(2)?,
                reason: row.get(3)?,
                description: row.get(4)?,
                offender: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_events(conn: &Connection) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, descricao, local, data, created_at
         FROM eventos ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([], event_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_event(conn: &Connection, id: i64) -> Result<Option<Event>> {
    conn.query_row(
        "SELECT id, title, descricao, local, data, created_at FROM eventos WHERE id = ?1",
        [id],
        event_from_row,
    )
    .optional()
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn query_information_list(conn: &Connection) -> Result<Vec<Information>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, descricao, created_at
         FROM informacoes ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt
        .query_map([], information_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_information(conn: &Connection, id: i64) -> Result<Option<Information>> {
    conn.query_row(
        "SELECT id, title, descricao, created_at FROM informacoes WHERE id = ?1",
        [id],
        information_from_row,
    )
    .optional()
}

fn information_from_row(row: &Row<'_>) -> rusqlite::Result<Information> {
    Ok(Information {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        role: row.get(3)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civico_types::Patch;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn contact(title: &str) -> NewContact {
        NewContact {
            title: title.into(),
            description: "descrição".into(),
            location: Some("Centro".into()),
            phone: Some("180".into()),
            email: None,
        }
    }

    fn user(username: &str, password: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: password.into(),
            name: Some("Ana".into()),
            role: Some("admin".into()),
        }
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let db = db();
        let c = db.insert_contact(contact("CRAS")).unwrap();
        assert_eq!(c.id, 1);
        assert!(c.created_at > 0);
        assert_eq!(db.get_contact(c.id).unwrap(), Some(c));
    }

    #[test]
    fn duplicate_title_is_conflict() {
        let db = db();
        db.insert_contact(contact("CRAS")).unwrap();
        let err = db.insert_contact(contact("CRAS")).unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)), "got {err:?}");
        assert_eq!(db.list_contacts().unwrap().len(), 1);
    }

    #[test]
    fn list_is_newest_first() {
        let db = db();
        let a = db.insert_contact(contact("A")).unwrap();
        let b = db.insert_contact(contact("B")).unwrap();
        let c = db.insert_contact(contact("C")).unwrap();

        let ids: Vec<i64> = db.list_contacts().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
        assert_eq!(db.list_contacts().unwrap(), db.list_contacts().unwrap());
    }

    #[test]
    fn update_merges_present_fields_only() {
        let db = db();
        let before = db.insert_contact(contact("CRAS")).unwrap();

        let after = db
            .update_contact(
                before.id,
                UpdateContactRequest {
                    email: Patch::Value("cras@example.org".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(after.email.as_deref(), Some("cras@example.org"));
        assert_eq!(after.title, before.title);
        assert_eq!(after.location, before.location);
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(db.get_contact(before.id).unwrap(), Some(after));
    }

    #[test]
    fn update_to_taken_title_rolls_back() {
        let db = db();
        db.insert_contact(contact("A")).unwrap();
        let b = db.insert_contact(contact("B")).unwrap();

        let err = db
            .update_contact(
                b.id,
                UpdateContactRequest {
                    title: Patch::Value("A".into()),
                    phone: Patch::Null,
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
        assert_eq!(db.get_contact(b.id).unwrap(), Some(b));
    }

    #[test]
    fn update_unknown_id_is_none() {
        let db = db();
        let res = db.update_event(42, UpdateEventRequest::default()).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn delete_reports_whether_row_existed() {
        let db = db();
        let e = db
            .insert_event(NewEvent {
                title: "Feira".into(),
                description: "Feira de saúde".into(),
                location: None,
                date: 1_717_000_000_000,
            })
            .unwrap();

        assert!(db.delete_event(e.id).unwrap());
        assert!(!db.delete_event(e.id).unwrap());
        assert!(db.get_event(e.id).unwrap().is_none());
        assert!(!db.delete_contact(99).unwrap());
    }

    #[test]
    fn reports_keep_client_timestamp_and_sort_by_it() {
        let db = db();
        let mk = |created_at: &str| NewReport {
            name: None,
            identify: false,
            reason: "assédio".into(),
            description: "relato".into(),
            offender: None,
            created_at: created_at.into(),
        };
        db.insert_report(mk("2024-01-01T00:00:00Z")).unwrap();
        db.insert_report(mk("2024-03-01T00:00:00Z")).unwrap();
        db.insert_report(mk("2024-02-01T00:00:00Z")).unwrap();

        let stamps: Vec<String> = db
            .list_reports()
            .unwrap()
            .into_iter()
            .map(|r| r.created_at)
            .collect();
        assert_eq!(
            stamps,
            vec![
                "2024-03-01T00:00:00Z",
                "2024-02-01T00:00:00Z",
                "2024-01-01T00:00:00Z"
            ]
        );
    }

    #[test]
    fn event_and_information_lists_are_newest_first() {
        let db = db();
        let mut event_ids = Vec::new();
        let mut info_ids = Vec::new();
        for title in ["A", "B", "C"] {
            let e = db
                .insert_event(NewEvent {
                    title: title.into(),
                    description: "x".into(),
                    location: None,
                    date: 1,
                })
                .unwrap();
            event_ids.push(e.id);
            let i = db
                .insert_information(NewInformation {
                    title: title.into(),
                    description: "x".into(),
                })
                .unwrap();
            info_ids.push(i.id);
        }
        event_ids.reverse();
        info_ids.reverse();

        let listed: Vec<i64> = db.list_events().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(listed, event_ids);
        assert_eq!(db.list_events().unwrap(), db.list_events().unwrap());

        let listed: Vec<i64> = db.list_information().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(listed, info_ids);
        assert_eq!(db.list_information().unwrap(), db.list_information().unwrap());
    }

    #[test]
    fn information_title_is_unique() {
        let db = db();
        let new = || NewInformation {
            title: "Lei Maria da Penha".into(),
            description: "Resumo".into(),
        };
        let info = db.insert_information(new()).unwrap();
        assert!(matches!(db.insert_information(new()), Err(DbError::Conflict(_))));
        assert_eq!(db.get_information(info.id).unwrap(), Some(info));
    }

    #[test]
    fn duplicate_username_keeps_original_user() {
        let db = db();
        let first = db.create_user(user("ana", "secret")).unwrap();

        let mut dup = user("ana", "other");
        dup.name = Some("Outra".into());
        assert!(matches!(db.create_user(dup), Err(DbError::Conflict(_))));

        assert_eq!(db.get_user_by_username("ana").unwrap(), Some(first));
        assert!(db.find_user_by_credentials("ana", "other").unwrap().is_none());
    }

    #[test]
    fn credentials_must_match_exactly() {
        let db = db();
        let created = db.create_user(user("ana", "secret")).unwrap();

        assert_eq!(
            db.find_user_by_credentials("ana", "secret").unwrap(),
            Some(created)
        );
        assert!(db.find_user_by_credentials("ana", "Secret").unwrap().is_none());
        assert!(db.find_user_by_credentials("bia", "secret").unwrap().is_none());
    }
}
