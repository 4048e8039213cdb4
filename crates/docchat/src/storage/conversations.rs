//! SQLite-backed conversation history
//!
//! Conversations are append-only: an append either creates the thread
//! and its first message or adds a message to an existing thread, in
//! one transaction. There is no separate exists-check, so concurrent
//! appends to the same id cannot race each other into duplicates.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Conversation, Message, NewMessage};

/// SQLite store for conversation threads
pub struct ConversationStore {
    conn: Arc<Mutex<Connection>>,
}

impl ConversationStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL for concurrent readers during appends
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA busy_timeout=5000;
            PRAGMA temp_store=MEMORY;
        "#,
        )
        .map_err(|e| Error::Storage(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                conversation_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                files TEXT NOT NULL DEFAULT '[]'
            );

            -- seq orders messages within a thread; AUTOINCREMENT keeps
            -- ordering stable even after deletes
            CREATE TABLE IF NOT EXISTS messages (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL REFERENCES conversations(conversation_id),
                payload TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_messages_conversation
                ON messages(conversation_id);
        "#,
        )
        .map_err(|e| Error::Storage(format!("Failed to create schema: {}", e)))?;

        Ok(())
    }

    /// Append a message, creating the conversation if needed.
    ///
    /// Returns the conversation id the message landed in, minting a
    /// fresh UUID when `conversation_id` is `None`. The `files` list is
    /// written only when the row is first created: it records which
    /// upload started the thread, and is empty for threads started by a
    /// question.
    pub fn append(
        &self,
        conversation_id: Option<&str>,
        message: NewMessage,
    ) -> Result<String> {
        let id = match conversation_id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let now = Utc::now();

        let initial_files = match &message {
            NewMessage::FileUpload { file_name, .. } => vec![file_name.clone()],
            NewMessage::Qa { .. } => Vec::new(),
        };
        let files_json = serde_json::to_string(&initial_files)
            .map_err(|e| Error::Storage(e.to_string()))?;

        let stamped = match message {
            NewMessage::FileUpload { file_name, summary } => Message::FileUpload {
                file_name,
                summary,
                timestamp: now,
            },
            NewMessage::Qa { query, response } => Message::Qa {
                query,
                response,
                timestamp: now,
            },
        };
        let payload =
            serde_json::to_string(&stamped).map_err(|e| Error::Storage(e.to_string()))?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO conversations (conversation_id, created_at, updated_at, files)
            VALUES (?1, ?2, ?2, ?3)
            ON CONFLICT(conversation_id) DO UPDATE SET updated_at = excluded.updated_at
            "#,
            params![id, now.to_rfc3339(), files_json],
        )?;
        tx.execute(
            "INSERT INTO messages (conversation_id, payload) VALUES (?1, ?2)",
            params![id, payload],
        )?;

        tx.commit()?;
        Ok(id)
    }

    /// Fetch a full conversation thread, messages in append order.
    pub fn get(&self, conversation_id: &str) -> Result<Conversation> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT created_at, updated_at, files FROM conversations WHERE conversation_id = ?1",
                params![conversation_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let (created_at, updated_at, files_json) = row
            .ok_or_else(|| Error::ConversationNotFound(conversation_id.to_string()))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Storage(format!("Bad created_at: {}", e)))?
            .with_timezone(&Utc);
        let updated_at = chrono::DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| Error::Storage(format!("Bad updated_at: {}", e)))?
            .with_timezone(&Utc);
        let files: Vec<String> = serde_json::from_str(&files_json)
            .map_err(|e| Error::Storage(format!("Bad files list: {}", e)))?;

        let mut stmt = conn.prepare(
            "SELECT payload FROM messages WHERE conversation_id = ?1 ORDER BY seq",
        )?;
        let messages = stmt
            .query_map(params![conversation_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?
            .into_iter()
            .map(|payload| {
                serde_json::from_str(&payload)
                    .map_err(|e| Error::Storage(format!("Bad message payload: {}", e)))
            })
            .collect::<Result<Vec<Message>>>()?;

        Ok(Conversation {
            conversation_id: conversation_id.to_string(),
            created_at,
            updated_at,
            files,
            messages,
        })
    }
}
