use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::roster::{PgRosterStore, Roster, RosterStore, RosterSummary, period_label};
use crate::templates_structs::{PublicRosterTemplate, RosterTable};

fn page(config: &AppConfig, roster: Option<Roster>, published: Vec<RosterSummary>) -> PublicRosterTemplate {
    let shown_id = roster.as_ref().map(|r| r.id);
    PublicRosterTemplate {
        app_name: config.app_name.clone(),
        period: roster
            .as_ref()
            .map(|r| period_label(r.month, r.year))
            .unwrap_or_default(),
        table: roster.as_ref().map(|r| RosterTable::compact(&r.rows)),
        title: roster.map(|r| r.title),
        others: published
            .into_iter()
            .filter(|s| Some(s.id) != shown_id)
            .collect(),
    }
}

/// GET /planning: the most recent published roster.
pub async fn index(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let store = PgRosterStore::new(pool.get_ref().clone());
    let published = store.list_published().await?;

    let latest = match published.first() {
        Some(summary) => store.find_by_id(summary.id).await?,
        None => None,
    };

    render(page(&config, latest, published))
}

/// GET /planning/{id}: a specific published roster.
pub async fn show(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let store = PgRosterStore::new(pool.get_ref().clone());
    let roster = store
        .find_by_id(path.into_inner())
        .await?
        .filter(|r| r.is_published && r.is_active)
        .ok_or(AppError::NotFound)?;

    let published = store.list_published().await?;
    render(page(&config, Some(roster), published))
}
