//! Message repository.
//!
//! All SQL touching the `messages` table lives here.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::postgres::SchemaBootstrap;

use super::Message;

/// Rows inserted at startup for demonstration purposes.
pub const SEED_MESSAGES: [&str; 3] = [
    "Welcome to our Docker PostgreSQL app!",
    "This is a sample message from the database",
    "You can add your own messages too!",
];

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Seed insert guarded by an existence check on `content`, so re-running it
/// never duplicates a row.
const INSERT_SEED: &str = r#"
    INSERT INTO messages (content)
    SELECT $1
    WHERE NOT EXISTS (SELECT 1 FROM messages WHERE content = $1)
"#;

/// Message repository backed by a shared pool.
///
/// Each call borrows a connection for the duration of one statement.
#[derive(Clone)]
pub struct MessageStore {
    pool: PgPool,
}

impl MessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All messages, most recent first.
    pub async fn list(&self) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT id, content, created_at FROM messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Insert a message and return the stored row.
    pub async fn create(&self, content: &str) -> Result<Message, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (content) VALUES ($1) RETURNING id, content, created_at",
        )
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = message.id, "Message created");
        Ok(message)
    }

    /// Trivial round trip used by the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SchemaBootstrap for MessageStore {
    async fn bootstrap(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;

        let mut seeded = 0;
        for content in SEED_MESSAGES {
            seeded += sqlx::query(INSERT_SEED)
                .bind(content)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::debug!(seeded, "Messages table ready");
        Ok(())
    }
}
