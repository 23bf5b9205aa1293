use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, http::header::CONTENT_TYPE, web};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::{csrf, session::set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::media::{self, DEFAULT_TIERS, storage};
use crate::models::photo::{self, NewPhoto, NewPhotoVersion, TagForm, UploadQuery};
use crate::templates_structs::{PageContext, PhotoListTemplate};

const PATH: &str = "/admin/photos";

#[derive(Serialize)]
struct UploadResponse {
    id: i64,
    versions: Vec<VersionResponse>,
}

#[derive(Serialize)]
struct VersionResponse {
    tier: String,
    width: i32,
    height: i32,
    url: String,
}

fn rejected(message: String) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(serde_json::json!({ "error": message }))
}

/// Best-effort removal of an upload's files after a failed request.
async fn discard_files(config: &AppConfig, key: &str) {
    if let Err(io) = storage::remove_versions(&config.upload_dir, key).await {
        log::error!("Could not clean up files for {key}: {io}");
    }
}

/// GET /admin/photos
pub async fn list(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let photos = photo::find_all(&pool).await?;
    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    render(PhotoListTemplate {
        ctx,
        photos,
        max_upload_mb: config.max_upload_bytes / (1024 * 1024),
    })
}

/// POST /admin/photos/upload?tag=...
/// Raw image body; the Content-Type header is the declared MIME type and
/// the CSRF token travels in `X-CSRF-Token`.
pub async fn upload(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get("x-csrf-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    csrf::validate_csrf(&session, token)?;

    let mime = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if let Err(e) = media::check_upload(&mime, body.len(), config.max_upload_bytes) {
        log::warn!("Upload rejected: {e}");
        return Ok(rejected(e.to_string()));
    }

    let byte_size = body.len() as i64;
    let versions = match media::generate_versions(body.to_vec(), &DEFAULT_TIERS).await {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Upload could not be processed: {e}");
            return Ok(rejected(e.to_string()));
        }
    };

    let key = storage::new_file_key();
    // write_versions removes a partially written directory itself
    let written: Vec<NewPhotoVersion> = storage::write_versions(&config.upload_dir, &key, &versions).await?;

    let new_photo = NewPhoto {
        file_key: key.clone(),
        tag: query.into_inner().tag,
        mime_type: mime,
        byte_size,
        versions: written.clone(),
    };
    let id = match photo::create(&pool, &new_photo).await {
        Ok(id) => id,
        Err(e) => {
            discard_files(&config, &key).await;
            return Err(e);
        }
    };

    log::info!("Stored photo {id} ({} versions, {} bytes)", written.len(), byte_size);

    Ok(HttpResponse::Created().json(UploadResponse {
        id,
        versions: written
            .into_iter()
            .map(|v| VersionResponse {
                url: format!("/uploads/{}", v.path),
                tier: v.tier,
                width: v.width,
                height: v.height,
            })
            .collect(),
    }))
}

/// POST /admin/photos/{id}/tag
pub async fn update_tag(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<TagForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    photo::update_tag(&pool, path.into_inner(), &form.tag).await?;
    set_flash(&session, "Tag updated");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", PATH))
        .finish())
}

/// POST /admin/photos/{id}/delete
pub async fn delete(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<super::CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let found = photo::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    photo::delete(&pool, id).await?;
    if let Err(e) = storage::remove_versions(&config.upload_dir, &found.file_key).await {
        log::error!("Photo {id} deleted but its files remain: {e}");
    }

    set_flash(&session, "Photo deleted");
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", PATH))
        .finish())
}
