use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A UNIQUE constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("database lock poisoned: {0}")]
    Lock(String),
    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, msg) = &err {
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
                return Self::Conflict(msg.clone().unwrap_or_else(|| e.to_string()));
            }
        }
        Self::Sqlite(err)
    }
}
