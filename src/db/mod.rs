use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use crate::matching::normalize;
use crate::models::{BetType, Recommendation};

/// Thread-safe SQLite connection (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// Stable identity of a tip for deduplication. Participant names go
/// through the same normalization as cross-feed matching, and totals use
/// only the bet kind so a shifting line does not re-send the same tip.
pub fn tip_key(rec: &Recommendation) -> String {
    let bet_kind = match rec.bet_type {
        BetType::OutrightWin => "outright",
        BetType::TotalOver(_) => "over",
        BetType::TotalUnder(_) => "under",
    };
    format!(
        "{}|{}|{}|{}",
        rec.sport,
        normalize(&rec.side_a),
        normalize(&rec.side_b),
        bet_kind
    )
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    /// Has a tip with this identity already been sent?
    pub fn was_sent(&self, rec: &Recommendation) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sent_tips WHERE tip_key = ?1",
            params![tip_key(rec)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Record a delivered tip. Re-recording the same identity is a no-op.
    pub fn record_sent(&self, rec: &Recommendation) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO sent_tips (
                tip_key, sport, side_a, side_b, bet_type, confidence, sent_at
             ) VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                tip_key(rec),
                rec.sport.as_str(),
                rec.side_a,
                rec.side_b,
                rec.bet_type.to_string(),
                rec.confidence,
                Utc::now(),
            ],
        )?;
        Ok(())
    }

    /// Drop sent-tip records older than the cutoff; matches conclude
    /// within hours, so old keys only block future fixtures of the same
    /// pairing.
    pub fn prune_older_than(&self, age: Duration) -> Result<usize> {
        let cutoff: DateTime<Utc> = Utc::now() - age;
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM sent_tips WHERE sent_at < ?1",
            params![cutoff],
        )?;
        Ok(removed)
    }
}

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS sent_tips (
    tip_key    TEXT    PRIMARY KEY,
    sport      TEXT    NOT NULL,
    side_a     TEXT    NOT NULL,
    side_b     TEXT    NOT NULL,
    bet_type   TEXT    NOT NULL,
    confidence INTEGER NOT NULL,
    sent_at    TEXT    NOT NULL
);
"#;
