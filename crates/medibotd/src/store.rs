//! Exchange store - SQLite-backed, append-only.
//!
//! Every operation opens its own connection and drops it before returning,
//! so no handle outlives a request. The operations block; async callers run
//! them on the blocking pool.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use medibot_common::{Exchange, NewExchange, Scores};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Append-only store of exchanges
#[derive(Debug, Clone)]
pub struct ExchangeStore {
    db_path: PathBuf,
}

impl ExchangeStore {
    /// Open the store, creating the database file and table if absent
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let store = Self { db_path };
        store.init_schema()?;
        info!("Exchange store ready at {}", store.db_path.display());
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open database: {:?}", self.db_path))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Create the conversations table (idempotent)
    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                response TEXT NOT NULL,
                created_at TEXT NOT NULL,
                rouge1 REAL,
                rouge2 REAL,
                rougeL REAL,
                bleu REAL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_conversations_created_at ON conversations(created_at)",
            [],
        )?;

        Ok(())
    }

    /// Persist one exchange, stamped with the current time
    pub fn append(&self, exchange: NewExchange) -> Result<Exchange> {
        let conn = self.connect()?;
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO conversations (query, response, created_at, rouge1, rouge2, rougeL, bleu)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                &exchange.query,
                &exchange.response,
                created_at,
                exchange.scores.rouge1,
                exchange.scores.rouge2,
                exchange.scores.rouge_l,
                exchange.scores.bleu,
            ],
        )
        .context("Failed to insert exchange")?;

        let id = conn.last_insert_rowid();
        debug!("Stored exchange {}", id);

        Ok(Exchange {
            id,
            query: exchange.query,
            response: exchange.response,
            scores: exchange.scores,
            created_at,
        })
    }

    /// All exchanges, most recent first
    pub fn list_all(&self) -> Result<Vec<Exchange>> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, query, response, created_at, rouge1, rouge2, rougeL, bleu
            FROM conversations
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let exchanges = stmt
            .query_map([], row_to_exchange)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read exchanges")?;

        Ok(exchanges)
    }

    /// Number of stored exchanges
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))?;
        usize::try_from(count).context("Negative row count")
    }
}

fn row_to_exchange(row: &Row<'_>) -> rusqlite::Result<Exchange> {
    let created_at: DateTime<Utc> = row.get(3)?;
    Ok(Exchange {
        id: row.get(0)?,
        query: row.get(1)?,
        response: row.get(2)?,
        created_at,
        scores: Scores {
            rouge1: row.get(4)?,
            rouge2: row.get(5)?,
            rouge_l: row.get(6)?,
            bleu: row.get(7)?,
        },
    })
}
