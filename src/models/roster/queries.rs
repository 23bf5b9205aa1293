use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use super::store::{RosterStore, StoreError, check_row};
use super::types::{NewRoster, Roster, RosterRow, RosterSummary};

#[derive(sqlx::FromRow)]
struct RosterRecord {
    id: i64,
    title: String,
    month: i32,
    year: i32,
    is_active: bool,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct RowRecord {
    date_label: String,
    presidence: Option<String>,
    musique: Option<String>,
    predicateur: Option<String>,
    enfants: Option<String>,
    accueil: Option<String>,
    projection: Option<String>,
    diffusion: Option<String>,
    menage: Option<String>,
    observations: Option<String>,
}

impl From<RowRecord> for RosterRow {
    fn from(r: RowRecord) -> Self {
        RosterRow {
            date: r.date_label,
            presidence: r.presidence,
            musique: r.musique,
            predicateur: r.predicateur,
            enfants: r.enfants,
            accueil: r.accueil,
            projection: r.projection,
            diffusion: r.diffusion,
            menage: r.menage,
            observations: r.observations,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRecord {
    id: i64,
    title: String,
    month: i32,
    year: i32,
    row_count: i64,
    is_published: bool,
    updated_at: DateTime<Utc>,
}

impl From<SummaryRecord> for RosterSummary {
    fn from(r: SummaryRecord) -> Self {
        RosterSummary {
            id: r.id,
            title: r.title,
            month: r.month as u32,
            year: r.year,
            row_count: r.row_count as usize,
            is_published: r.is_published,
            updated_at: r.updated_at,
        }
    }
}

const ROSTER_COLUMNS: &str =
    "id, title, month, year, is_active, is_published, created_at, updated_at";

const SUMMARY_SQL: &str = "SELECT r.id, r.title, r.month, r.year, r.is_published, r.updated_at, \
                                  COUNT(rr.position) AS row_count \
                           FROM rosters r \
                           LEFT JOIN roster_rows rr ON rr.roster_id = r.id";

/// Roster store backed by the `rosters` and `roster_rows` tables.
#[derive(Clone)]
pub struct PgRosterStore {
    pool: PgPool,
}

impl PgRosterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_rows(conn: &mut PgConnection, roster_id: i64) -> Result<Vec<RosterRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RowRecord>(
            "SELECT date_label, presidence, musique, predicateur, enfants, accueil, \
                    projection, diffusion, menage, observations \
             FROM roster_rows WHERE roster_id = $1 ORDER BY position",
        )
        .bind(roster_id)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(RosterRow::from).collect())
    }

    async fn hydrate(conn: &mut PgConnection, record: RosterRecord) -> Result<Roster, sqlx::Error> {
        let rows = Self::load_rows(&mut *conn, record.id).await?;
        Ok(Roster {
            id: record.id,
            title: record.title,
            month: record.month as u32,
            year: record.year,
            rows,
            is_active: record.is_active,
            is_published: record.is_published,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Insert the roster and its rows on an open connection. Returns the new id.
    async fn insert_on(conn: &mut PgConnection, roster: &NewRoster) -> Result<i64, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO rosters (title, month, year, is_active, is_published) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&roster.title)
        .bind(roster.month as i32)
        .bind(roster.year)
        .bind(roster.is_active)
        .bind(roster.is_published)
        .fetch_one(&mut *conn)
        .await?;

        for (position, row) in roster.rows.iter().enumerate() {
            sqlx::query(
                "INSERT INTO roster_rows (roster_id, position, date_label, presidence, musique, \
                     predicateur, enfants, accueil, projection, diffusion, menage, observations) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(id)
            .bind(position as i32)
            .bind(&row.date)
            .bind(&row.presidence)
            .bind(&row.musique)
            .bind(&row.predicateur)
            .bind(&row.enfants)
            .bind(&row.accueil)
            .bind(&row.projection)
            .bind(&row.diffusion)
            .bind(&row.menage)
            .bind(&row.observations)
            .execute(&mut *conn)
            .await?;
        }

        Ok(id)
    }

    async fn fetch_one_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Roster>, sqlx::Error> {
        let record = sqlx::query_as::<_, RosterRecord>(&format!(
            "SELECT {ROSTER_COLUMNS} FROM rosters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        match record {
            Some(r) => Ok(Some(Self::hydrate(conn, r).await?)),
            None => Ok(None),
        }
    }
}

impl RosterStore for PgRosterStore {
    async fn find_by_period(&self, month: u32, year: i32) -> Result<Option<Roster>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, RosterRecord>(&format!(
            "SELECT {ROSTER_COLUMNS} FROM rosters WHERE month = $1 AND year = $2"
        ))
        .bind(month as i32)
        .bind(year)
        .fetch_optional(&mut *conn)
        .await?;

        match record {
            Some(r) => Ok(Some(Self::hydrate(&mut *conn, r).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Roster>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(Self::fetch_one_by_id(&mut *conn, id).await?)
    }

    async fn list(&self) -> Result<Vec<RosterSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRecord>(&format!(
            "{SUMMARY_SQL} GROUP BY r.id ORDER BY r.year DESC, r.month DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RosterSummary::from).collect())
    }

    async fn list_published(&self) -> Result<Vec<RosterSummary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRecord>(&format!(
            "{SUMMARY_SQL} WHERE r.is_published AND r.is_active \
             GROUP BY r.id ORDER BY r.year DESC, r.month DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RosterSummary::from).collect())
    }

    async fn insert(&self, roster: &NewRoster) -> Result<Roster, StoreError> {
        roster.rows.iter().try_for_each(check_row)?;
        let mut tx = self.pool.begin().await?;
        let id = Self::insert_on(&mut *tx, roster).await?;
        let created = Self::fetch_one_by_id(&mut *tx, id)
            .await?
            .ok_or(StoreError::NotFound)?;
        tx.commit().await?;
        Ok(created)
    }

    async fn replace(&self, existing_id: i64, roster: &NewRoster) -> Result<Roster, StoreError> {
        roster.rows.iter().try_for_each(check_row)?;
        let mut tx = self.pool.begin().await?;

        // roster_rows go with it through ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM rosters WHERE id = $1")
            .bind(existing_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        let id = Self::insert_on(&mut *tx, roster).await?;
        let created = Self::fetch_one_by_id(&mut *tx, id)
            .await?
            .ok_or(StoreError::NotFound)?;
        tx.commit().await?;
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM rosters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_row(&self, id: i64, index: usize, row: &RosterRow) -> Result<(), StoreError> {
        check_row(row)?;
        let position = i32::try_from(index).map_err(|_| StoreError::NotFound)?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE roster_rows SET date_label = $3, presidence = $4, musique = $5, \
                 predicateur = $6, enfants = $7, accueil = $8, projection = $9, \
                 diffusion = $10, menage = $11, observations = $12 \
             WHERE roster_id = $1 AND position = $2",
        )
        .bind(id)
        .bind(position)
        .bind(&row.date)
        .bind(&row.presidence)
        .bind(&row.musique)
        .bind(&row.predicateur)
        .bind(&row.enfants)
        .bind(&row.accueil)
        .bind(&row.projection)
        .bind(&row.diffusion)
        .bind(&row.menage)
        .bind(&row.observations)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        sqlx::query("UPDATE rosters SET updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn set_published(&self, id: i64, published: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE rosters SET is_published = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(published)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
