//! SQLite-backed session history and event log.
//!
//! RULE: Only store.rs talks to the database.
//! The database is always in memory; it lives as long as the engine.

use crate::{
    bag::LuckyMoneySession,
    error::{GameError, GameResult},
    event::EventLogEntry,
    types::{Amount, BagId, TimestampMs},
};
use rusqlite::{params, Connection};

pub struct GameStore {
    conn: Connection,
}

impl GameStore {
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_lucky_money.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        bag_count: u32,
        started_at: TimestampMs,
    ) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, bag_count, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, bag_count, started_at],
        )?;
        Ok(())
    }

    // ── Session history ────────────────────────────────────────

    pub fn append_session(
        &self,
        run_id: &str,
        bag_id: BagId,
        session: &LuckyMoneySession,
    ) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO session_history (run_id, session_id, bag_id, amount, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, session.id, bag_id, session.amount, session.timestamp],
        )?;
        Ok(())
    }

    /// All sessions for the run, newest first.
    pub fn history(&self, run_id: &str) -> GameResult<Vec<LuckyMoneySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, amount, timestamp FROM session_history
             WHERE run_id = ?1 ORDER BY seq DESC",
        )?;
        let sessions = stmt
            .query_map(params![run_id], |row| {
                Ok(LuckyMoneySession {
                    id:        row.get(0)?,
                    amount:    row.get(1)?,
                    timestamp: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    pub fn history_len(&self, run_id: &str) -> GameResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM session_history WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Sum of every revealed amount; 0 for an empty history.
    /// A sum that does not fit an `Amount` is `TotalOverflow`, never a
    /// clipped value.
    pub fn history_total(&self, run_id: &str) -> GameResult<Amount> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM session_history WHERE run_id = ?1")?;
        let mut total: Amount = 0;
        for amount in stmt.query_map(params![run_id], |row| row.get::<_, i64>(0))? {
            total = total.checked_add(amount?).ok_or(GameError::TotalOverflow)?;
        }
        Ok(total)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, seq, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.run_id, entry.seq as i64, entry.event_type, entry.payload],
        )?;
        Ok(())
    }

    pub fn events(&self, run_id: &str) -> GameResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    seq:        row.get::<_, i64>(2)? as u64,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
