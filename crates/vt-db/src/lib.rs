//! Storage layer for the voice attendance tracker.
//!
//! Provides persistence for facts and daily totals using `rusqlite`.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. The async [`SqliteLedger`] adapter serializes access behind a
//! `tokio::sync::Mutex`, which also means ledger writes are observed in
//! the order they were issued.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 form carrying the reference
//! offset (e.g. `2024-03-01T09:00:00+07:00`), so lexicographic ordering
//! matches chronological ordering and day boundaries can be read off the
//! value. Days are TEXT in `YYYY-MM-DD` form.

use std::path::Path;

use chrono::{DateTime, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use vt_core::duration::split_minutes;
use vt_core::{DailyTotal, Fact, FactKind, Ledger, UserId};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored fact timestamp.
    #[error("invalid timestamp for fact {fact_id}: {timestamp}")]
    TimestampParse {
        fact_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Failed to parse a stored day.
    #[error("invalid day: {day}")]
    DayParse {
        day: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored fact kind was neither `join` nor `leave`.
    #[error("invalid fact kind for fact {fact_id}: {kind}")]
    KindParse { fact_id: i64, kind: String },
    /// A stored identifier failed validation.
    #[error("invalid stored identifier: {0}")]
    InvalidId(#[from] vt_core::ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// Idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Facts table: append-only join/leave observations
            -- timestamp: RFC 3339 with reference offset
            -- kind: 'join' or 'leave'
            CREATE TABLE IF NOT EXISTS facts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                username TEXT NOT NULL,
                kind TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_facts_timestamp ON facts(timestamp);
            CREATE INDEX IF NOT EXISTS idx_facts_user ON facts(user_id);

            -- One row per (user_id, day); duration fields are overwritten
            -- in place with the already-cumulative value.
            CREATE TABLE IF NOT EXISTS daily_totals (
                user_id TEXT NOT NULL,
                username TEXT NOT NULL,
                day TEXT NOT NULL,
                hours INTEGER NOT NULL,
                minutes INTEGER NOT NULL,
                seconds INTEGER NOT NULL,
                PRIMARY KEY (user_id, day)
            );

            CREATE INDEX IF NOT EXISTS idx_daily_totals_day ON daily_totals(day);
            ",
        )?;
        Ok(())
    }

    /// Appends one fact. Facts are never updated or deleted.
    pub fn append_fact(&self, fact: &Fact) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO facts (user_id, username, kind, timestamp) VALUES (?, ?, ?, ?)",
            params![
                fact.user_id.as_str(),
                fact.username,
                fact.kind.as_str(),
                fact.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Lists all facts ordered by insertion.
    pub fn list_facts(&self) -> Result<Vec<Fact>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, user_id, username, kind, timestamp FROM facts ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut facts = Vec::new();
        for row in rows {
            let (fact_id, user_id, username, kind, timestamp) = row?;
            let kind = kind
                .parse::<FactKind>()
                .map_err(|_| DbError::KindParse { fact_id, kind })?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp).map_err(|source| {
                DbError::TimestampParse {
                    fact_id,
                    timestamp,
                    source,
                }
            })?;
            facts.push(Fact {
                user_id: UserId::new(user_id)?,
                username,
                kind,
                timestamp,
            });
        }
        Ok(facts)
    }

    /// Looks up the stored aggregate for a user on a day.
    pub fn find_daily_total(
        &self,
        user: &UserId,
        day: NaiveDate,
    ) -> Result<Option<DailyTotal>, DbError> {
        self.conn
            .query_row(
                "
                SELECT user_id, username, day, hours, minutes, seconds
                FROM daily_totals
                WHERE user_id = ? AND day = ?
                ",
                params![user.as_str(), day.to_string()],
                map_daily_total_row,
            )
            .optional()?
            .map(parse_daily_total)
            .transpose()
    }

    /// Overwrites (or creates) the aggregate for `(user, day)` with the
    /// already-cumulative total.
    ///
    /// The fractional-minute total is split into whole hours, minutes,
    /// and seconds at this point. Idempotent for identical inputs.
    pub fn upsert_daily_total(
        &self,
        user: &UserId,
        username: &str,
        day: NaiveDate,
        cumulative_minutes: f64,
    ) -> Result<(), DbError> {
        let parts = split_minutes(cumulative_minutes);
        self.conn.execute(
            "
            INSERT INTO daily_totals (user_id, username, day, hours, minutes, seconds)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, day) DO UPDATE SET
                username = excluded.username,
                hours = excluded.hours,
                minutes = excluded.minutes,
                seconds = excluded.seconds
            ",
            params![
                user.as_str(),
                username,
                day.to_string(),
                parts.hours,
                parts.minutes,
                parts.seconds,
            ],
        )?;
        Ok(())
    }

    /// Lists all aggregates for a day, ordered by longest presence first.
    pub fn daily_totals_for_day(&self, day: NaiveDate) -> Result<Vec<DailyTotal>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT user_id, username, day, hours, minutes, seconds
            FROM daily_totals
            WHERE day = ?
            ORDER BY hours * 3600 + minutes * 60 + seconds DESC, user_id ASC
            ",
        )?;
        let rows = stmt.query_map([day.to_string()], map_daily_total_row)?;
        let mut totals = Vec::new();
        for row in rows {
            totals.push(parse_daily_total(row?)?);
        }
        Ok(totals)
    }
}

/// Row shape shared by the daily-total queries, before parsing.
type DailyTotalRow = (String, String, String, i64, i64, i64);

fn map_daily_total_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyTotalRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn parse_daily_total(row: DailyTotalRow) -> Result<DailyTotal, DbError> {
    let (user_id, username, day, hours, minutes, seconds) = row;
    let day = day
        .parse::<NaiveDate>()
        .map_err(|source| DbError::DayParse { day, source })?;
    Ok(DailyTotal {
        user_id: UserId::new(user_id)?,
        username,
        day,
        hours,
        minutes,
        seconds,
    })
}

/// Async [`Ledger`] adapter over [`Database`].
///
/// Holds the connection behind a `tokio::sync::Mutex`; every ledger call
/// is a suspension point for the engine's handler loop.
pub struct SqliteLedger {
    inner: tokio::sync::Mutex<Database>,
}

impl SqliteLedger {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self {
            inner: tokio::sync::Mutex::new(db),
        }
    }
}

#[async_trait::async_trait]
impl Ledger for SqliteLedger {
    async fn append_fact(&self, fact: &Fact) -> anyhow::Result<()> {
        self.inner.lock().await.append_fact(fact)?;
        Ok(())
    }

    async fn find_daily_total(
        &self,
        user: &UserId,
        day: NaiveDate,
    ) -> anyhow::Result<Option<DailyTotal>> {
        Ok(self.inner.lock().await.find_daily_total(user, day)?)
    }

    async fn upsert_daily_total(
        &self,
        user: &UserId,
        username: &str,
        day: NaiveDate,
        cumulative_minutes: f64,
    ) -> anyhow::Result<()> {
        self.inner
            .lock()
            .await
            .upsert_daily_total(user, username, day, cumulative_minutes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn fact(user_id: &str, kind: FactKind, ts: &str) -> Fact {
        Fact {
            user_id: user(user_id),
            username: "mhai".into(),
            kind,
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn facts_roundtrip_in_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        db.append_fact(&fact("100", FactKind::Joined, "2024-03-01T09:00:00+07:00"))
            .unwrap();
        db.append_fact(&fact("100", FactKind::Left, "2024-03-01T09:01:30+07:00"))
            .unwrap();

        let facts = db.list_facts().unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].kind, FactKind::Joined);
        assert_eq!(facts[1].kind, FactKind::Left);
        assert_eq!(facts[1].timestamp.to_rfc3339(), "2024-03-01T09:01:30+07:00");
    }

    #[test]
    fn missing_daily_total_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(
            db.find_daily_total(&user("100"), day("2024-03-01"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn upsert_creates_then_overwrites() {
        let db = Database::open_in_memory().unwrap();
        let u = user("100");
        let d = day("2024-03-01");

        db.upsert_daily_total(&u, "mhai", d, 1.5).unwrap();
        let first = db.find_daily_total(&u, d).unwrap().unwrap();
        assert_eq!((first.hours, first.minutes, first.seconds), (0, 1, 30));

        // The caller passes the already-cumulative value; the stored row
        // is replaced, not added to.
        db.upsert_daily_total(&u, "mhai", d, 2.0).unwrap();
        let second = db.find_daily_total(&u, d).unwrap().unwrap();
        assert_eq!((second.hours, second.minutes, second.seconds), (0, 2, 0));
    }

    #[test]
    fn upsert_is_idempotent_for_identical_inputs() {
        let db = Database::open_in_memory().unwrap();
        let u = user("100");
        let d = day("2024-03-01");

        db.upsert_daily_total(&u, "mhai", d, 65.25).unwrap();
        let before = db.find_daily_total(&u, d).unwrap().unwrap();
        db.upsert_daily_total(&u, "mhai", d, 65.25).unwrap();
        let after = db.find_daily_total(&u, d).unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn totals_are_keyed_per_user_and_day() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_daily_total(&user("100"), "mhai", day("2024-03-01"), 10.0)
            .unwrap();
        db.upsert_daily_total(&user("200"), "beam", day("2024-03-01"), 20.0)
            .unwrap();
        db.upsert_daily_total(&user("100"), "mhai", day("2024-03-02"), 5.0)
            .unwrap();

        let first_day = db.daily_totals_for_day(day("2024-03-01")).unwrap();
        assert_eq!(first_day.len(), 2);
        assert_eq!(first_day[0].username, "beam");

        let second_day = db.daily_totals_for_day(day("2024-03-02")).unwrap();
        assert_eq!(second_day.len(), 1);
        assert_eq!(second_day[0].minutes, 5);
    }

    #[test]
    fn open_creates_file_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vt.db");

        {
            let db = Database::open(&path).unwrap();
            db.append_fact(&fact("100", FactKind::Joined, "2024-03-01T09:00:00+07:00"))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_facts().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sqlite_ledger_implements_the_trait() {
        let ledger = SqliteLedger::new(Database::open_in_memory().unwrap());
        let f = fact("100", FactKind::Left, "2024-03-01T09:01:30+07:00");

        ledger.append_fact(&f).await.unwrap();
        ledger
            .upsert_daily_total(&user("100"), "mhai", day("2024-03-01"), 1.5)
            .await
            .unwrap();

        let total = ledger
            .find_daily_total(&user("100"), day("2024-03-01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!((total.hours, total.minutes, total.seconds), (0, 1, 30));
    }
}
