use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Create every table if missing. Safe to run on each start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS contatos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL UNIQUE,
            descricao   TEXT NOT NULL,
            local       TEXT,
            telefone    TEXT,
            email       TEXT,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS denuncias (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            nome        TEXT,
            identificar INTEGER NOT NULL,
            motivo      TEXT NOT NULL,
            descricao   TEXT NOT NULL,
            agressor    TEXT,
            createdAt   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS eventos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL UNIQUE,
            descricao   TEXT NOT NULL,
            local       TEXT,
            data        INTEGER,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS informacoes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL UNIQUE,
            descricao   TEXT NOT NULL,
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            name        TEXT,
            cargo       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_contatos_created ON contatos(created_at);
        CREATE INDEX IF NOT EXISTS idx_denuncias_created ON denuncias(createdAt);
        CREATE INDEX IF NOT EXISTS idx_eventos_created ON eventos(created_at);
        CREATE INDEX IF NOT EXISTS idx_informacoes_created ON informacoes(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_twice_is_harmless() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('contatos', 'denuncias', 'eventos', 'informacoes', 'users')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 5);
    }
}
