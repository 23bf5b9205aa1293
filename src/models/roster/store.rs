use std::fmt;
use std::sync::Mutex;

use chrono::Utc;

use super::types::{NewRoster, Roster, RosterRow, RosterSummary};

#[derive(Debug)]
pub enum StoreError {
    Db(sqlx::Error),
    NotFound,
    Conflict(String),
    InvalidRow(String),
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(e) => write!(f, "database error: {e}"),
            StoreError::NotFound => write!(f, "roster not found"),
            StoreError::Conflict(msg) => write!(f, "conflict: {msg}"),
            StoreError::InvalidRow(msg) => write!(f, "invalid row: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict("a roster already exists for this month".to_string())
            }
            sqlx::Error::RowNotFound => StoreError::NotFound,
            _ => StoreError::Db(e),
        }
    }
}

/// Persistence operations for monthly rosters.
///
/// Implemented by `PgRosterStore` for the application and by
/// `MemoryRosterStore` for tests.
pub trait RosterStore: Send + Sync {
    fn find_by_period(
        &self,
        month: u32,
        year: i32,
    ) -> impl Future<Output = Result<Option<Roster>, StoreError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Roster>, StoreError>> + Send;

    /// All rosters, newest period first.
    fn list(&self) -> impl Future<Output = Result<Vec<RosterSummary>, StoreError>> + Send;

    /// Published, active rosters, newest period first.
    fn list_published(&self) -> impl Future<Output = Result<Vec<RosterSummary>, StoreError>> + Send;

    fn insert(&self, roster: &NewRoster) -> impl Future<Output = Result<Roster, StoreError>> + Send;

    /// Delete `existing_id` and insert `roster` as one atomic write.
    fn replace(
        &self,
        existing_id: i64,
        roster: &NewRoster,
    ) -> impl Future<Output = Result<Roster, StoreError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace the row at `index` (0-based) of roster `id`.
    fn update_row(
        &self,
        id: i64,
        index: usize,
        row: &RosterRow,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn set_published(&self, id: i64, published: bool) -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub(crate) fn check_row(row: &RosterRow) -> Result<(), StoreError> {
    if row.date.trim().is_empty() {
        return Err(StoreError::InvalidRow("date is required".to_string()));
    }
    Ok(())
}

pub(crate) fn sort_newest_first(items: &mut [RosterSummary]) {
    items.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    rosters: Vec<Roster>,
    fail_next_write: bool,
}

impl MemoryState {
    fn take_failure(&mut self) -> Result<(), StoreError> {
        if std::mem::take(&mut self.fail_next_write) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }

    fn period_taken(&self, roster: &NewRoster, ignore_id: Option<i64>) -> bool {
        self.rosters.iter().any(|r| {
            Some(r.id) != ignore_id && r.month == roster.month && r.year == roster.year
        })
    }

    fn build(&mut self, roster: &NewRoster) -> Roster {
        self.next_id += 1;
        let now = Utc::now();
        Roster {
            id: self.next_id,
            title: roster.title.clone(),
            month: roster.month,
            year: roster.year,
            rows: roster.rows.clone(),
            is_active: roster.is_active,
            is_published: roster.is_published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// In-memory roster store with the same semantics as the PostgreSQL one.
#[derive(Default)]
pub struct MemoryRosterStore {
    state: Mutex<MemoryState>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next write operation fail without changing anything.
    pub fn fail_next_write(&self) {
        self.lock().fail_next_write = true;
    }

    pub fn len(&self) -> usize {
        self.lock().rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RosterStore for MemoryRosterStore {
    async fn find_by_period(&self, month: u32, year: i32) -> Result<Option<Roster>, StoreError> {
        Ok(self
            .lock()
            .rosters
            .iter()
            .find(|r| r.month == month && r.year == year)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Roster>, StoreError> {
        Ok(self.lock().rosters.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<RosterSummary>, StoreError> {
        let mut items: Vec<_> = self.lock().rosters.iter().map(Roster::summary).collect();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn list_published(&self) -> Result<Vec<RosterSummary>, StoreError> {
        let mut items: Vec<_> = self
            .lock()
            .rosters
            .iter()
            .filter(|r| r.is_published && r.is_active)
            .map(Roster::summary)
            .collect();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn insert(&self, roster: &NewRoster) -> Result<Roster, StoreError> {
        roster.rows.iter().try_for_each(check_row)?;
        let mut state = self.lock();
        state.take_failure()?;
        if state.period_taken(roster, None) {
            return Err(StoreError::Conflict(
                "a roster already exists for this month".to_string(),
            ));
        }
        let created = state.build(roster);
        state.rosters.push(created.clone());
        Ok(created)
    }

    async fn replace(&self, existing_id: i64, roster: &NewRoster) -> Result<Roster, StoreError> {
        roster.rows.iter().try_for_each(check_row)?;
        let mut state = self.lock();
        state.take_failure()?;
        let pos = state
            .rosters
            .iter()
            .position(|r| r.id == existing_id)
            .ok_or(StoreError::NotFound)?;
        if state.period_taken(roster, Some(existing_id)) {
            return Err(StoreError::Conflict(
                "a roster already exists for this month".to_string(),
            ));
        }
        state.rosters.remove(pos);
        let created = state.build(roster);
        state.rosters.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.take_failure()?;
        let before = state.rosters.len();
        state.rosters.retain(|r| r.id != id);
        if state.rosters.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_row(&self, id: i64, index: usize, row: &RosterRow) -> Result<(), StoreError> {
        check_row(row)?;
        let mut state = self.lock();
        state.take_failure()?;
        let roster = state
            .rosters
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        let slot = roster.rows.get_mut(index).ok_or(StoreError::NotFound)?;
        *slot = row.clone();
        roster.updated_at = Utc::now();
        Ok(())
    }

    async fn set_published(&self, id: i64, published: bool) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.take_failure()?;
        let roster = state
            .rosters
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        roster.is_published = published;
        roster.updated_at = Utc::now();
        Ok(())
    }
}
