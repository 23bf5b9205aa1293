use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::roster;

#[derive(Deserialize)]
pub struct ParseRequest {
    pub html: String,
}

/// POST /api/v1/planning/parse
/// Parse and validate without saving.
pub async fn parse(
    pool: web::Data<PgPool>,
    body: web::Json<ParseRequest>,
) -> Result<HttpResponse, AppError> {
    let parsed = match roster::parse(&body.html) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Ok(HttpResponse::UnprocessableEntity()
                .json(serde_json::json!({ "error": e.to_string() })));
        }
    };

    let validation = roster::validate(&parsed);
    let plan = super::importer(&pool).plan(&parsed).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "roster": parsed,
        "validation": validation,
        "replaces": plan.existing,
    })))
}
