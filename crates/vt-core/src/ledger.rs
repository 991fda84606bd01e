//! The persistence collaborator boundary.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fact::Fact;
use crate::types::UserId;

/// A per-user, per-day aggregate of presence duration.
///
/// One record per `(user_id, day)`. The component invariant:
/// `hours*3600 + minutes*60 + seconds` equals the sum of all completed
/// session durations for that user on that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub user_id: UserId,
    pub username: String,
    pub day: NaiveDate,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Durable storage for facts and daily totals.
///
/// The ledger is best-effort downstream of the in-memory session state:
/// a failed write is logged by the caller and never retried, and never
/// blocks the state transition that already happened.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync {
    /// Appends one immutable fact. Append-only; facts are never updated.
    async fn append_fact(&self, fact: &Fact) -> Result<()>;

    /// Looks up the stored aggregate for a user on a day.
    async fn find_daily_total(&self, user: &UserId, day: NaiveDate) -> Result<Option<DailyTotal>>;

    /// Stores the already-cumulative total for a user on a day.
    ///
    /// The value is converted to whole hours/minutes/seconds and written
    /// in place over any existing record for `(user, day)`; absent a
    /// record, one is created. Invoking twice with identical inputs
    /// leaves storage unchanged.
    async fn upsert_daily_total(
        &self,
        user: &UserId,
        username: &str,
        day: NaiveDate,
        cumulative_minutes: f64,
    ) -> Result<()>;
}
