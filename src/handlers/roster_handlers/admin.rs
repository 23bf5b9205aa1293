use actix_session::Session;
use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::handlers::CsrfOnly;
use crate::auth::{csrf, session::set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::roster::{PgRosterStore, RosterRowForm, RosterStore, period_label};
use crate::templates_structs::{PageContext, RosterDetailTemplate, RosterListTemplate, RosterTable};

const PATH: &str = "/admin/planning";

fn redirect_to(id: i64) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", format!("{PATH}/{id}")))
        .finish()
}

/// GET /admin/planning
pub async fn list(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let store = PgRosterStore::new(pool.get_ref().clone());
    let rosters = store.list().await?;
    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    render(RosterListTemplate { ctx, rosters })
}

/// GET /admin/planning/{id}
pub async fn detail(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let store = PgRosterStore::new(pool.get_ref().clone());
    let roster = store
        .find_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    render(RosterDetailTemplate {
        ctx,
        id: roster.id,
        period: period_label(roster.month, roster.year),
        title: roster.title,
        is_published: roster.is_published,
        table: RosterTable::full(&roster.rows),
    })
}

/// POST /admin/planning/{id}/rows/{index}
pub async fn update_row(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<(i64, usize)>,
    form: web::Form<RosterRowForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (id, index) = path.into_inner();

    let row = form.to_row();
    if row.date.is_empty() {
        set_flash(&session, "The date is required");
        return Ok(redirect_to(id));
    }

    let store = PgRosterStore::new(pool.get_ref().clone());
    store.update_row(id, index, &row).await?;
    log::info!("Updated row {} of roster {}", index + 1, id);
    set_flash(&session, &format!("Row {} updated", index + 1));
    Ok(redirect_to(id))
}

/// POST /admin/planning/{id}/publish
pub async fn toggle_publish(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let store = PgRosterStore::new(pool.get_ref().clone());
    let roster = store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    let published = !roster.is_published;
    store.set_published(id, published).await?;

    set_flash(
        &session,
        if published { "Planning published" } else { "Planning unpublished" },
    );
    Ok(redirect_to(id))
}

/// POST /admin/planning/{id}/delete
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let store = PgRosterStore::new(pool.get_ref().clone());
    store.delete(id).await?;
    log::info!("Deleted roster {id}");

    set_flash(&session, "Planning deleted");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", PATH))
        .finish())
}
