use super::{PersistenceResult, ScheduleStore};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

/// Keeps the document in a single-row SQLite table.
pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        if let Some(parent) = path
            .as_ref()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            std::fs::create_dir_all(parent)?;
        }
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS schedule_document (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                markdown TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// RFC 3339 timestamp of the last save, if any.
    pub fn updated_at(&self) -> PersistenceResult<Option<String>> {
        let conn = self.connection.lock();
        let updated = conn
            .query_row(
                "SELECT updated_at FROM schedule_document WHERE id = 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(updated)
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_document(&self, markdown: &str) -> PersistenceResult<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO schedule_document (id, markdown, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET markdown = excluded.markdown, updated_at = excluded.updated_at",
            params![markdown, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_document(&self) -> PersistenceResult<Option<String>> {
        let conn = self.connection.lock();
        let markdown = conn
            .query_row(
                "SELECT markdown FROM schedule_document WHERE id = 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(markdown)
    }
}
