//! Insert rows: validated input ready to be written. Ids and server-side
//! timestamps are assigned by the queries.

pub struct NewContact {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub struct NewReport {
    pub name: Option<String>,
    pub identify: bool,
    pub reason: String,
    pub description: String,
    pub offender: Option<String>,
    pub created_at: String,
}

pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub date: i64,
}

pub struct NewInformation {
    pub title: String,
    pub description: String,
}

pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Option<String>,
}
