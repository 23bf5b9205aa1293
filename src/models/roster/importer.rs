use std::fmt;

use chrono::Datelike;
use serde::Serialize;

use super::store::{RosterStore, StoreError};
use super::types::{NewRoster, ParsedRoster, Roster, RosterSummary};
use super::validator::validate_for_year;

#[derive(Debug)]
pub enum ImportError {
    /// The roster failed validation; carries the collected messages.
    Invalid(Vec<String>),
    Store(StoreError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Invalid(errors) => write!(f, "invalid roster: {}", errors.join(", ")),
            ImportError::Store(e) => write!(f, "import failed: {e}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        ImportError::Store(e)
    }
}

/// What an import would do, shown to staff before they confirm.
#[derive(Debug, Clone, Serialize)]
pub struct ImportPlan {
    pub existing: Option<RosterSummary>,
}

impl ImportPlan {
    pub fn will_replace(&self) -> bool {
        self.existing.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum ImportOutcome {
    Created(Roster),
    Replaced { previous_id: i64, roster: Roster },
}

impl ImportOutcome {
    pub fn roster(&self) -> &Roster {
        match self {
            ImportOutcome::Created(roster) => roster,
            ImportOutcome::Replaced { roster, .. } => roster,
        }
    }
}

/// Inserts parsed rosters, replacing any roster already stored for the same month.
pub struct RosterImporter<S> {
    store: S,
    current_year: i32,
}

impl<S: RosterStore> RosterImporter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current_year: chrono::Local::now().year(),
        }
    }

    /// Pin the year used for the plausibility check.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn plan(&self, roster: &ParsedRoster) -> Result<ImportPlan, ImportError> {
        let existing = self
            .store
            .find_by_period(roster.month, roster.year)
            .await?
            .map(|r| r.summary());
        Ok(ImportPlan { existing })
    }

    pub async fn import(&self, roster: &ParsedRoster) -> Result<ImportOutcome, ImportError> {
        let report = validate_for_year(roster, self.current_year);
        if !report.valid {
            return Err(ImportError::Invalid(report.errors));
        }

        let mut new_roster = NewRoster::from(roster);
        let existing = self.store.find_by_period(roster.month, roster.year).await?;

        let outcome = match existing {
            Some(previous) => {
                // A published month stays visible on the public page
                new_roster.is_published = previous.is_published;
                let replaced = self.store.replace(previous.id, &new_roster).await?;
                log::info!(
                    "Replaced roster {} ({}/{}) with {} ({} rows)",
                    previous.id, roster.month, roster.year, replaced.id, replaced.rows.len()
                );
                ImportOutcome::Replaced {
                    previous_id: previous.id,
                    roster: replaced,
                }
            }
            None => {
                let created = self.store.insert(&new_roster).await?;
                log::info!(
                    "Created roster {} ({}/{}) with {} rows",
                    created.id, roster.month, roster.year, created.rows.len()
                );
                ImportOutcome::Created(created)
            }
        };

        Ok(outcome)
    }
}
