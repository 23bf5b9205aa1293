use actix_web::web;

use crate::auth::middleware::{require_auth, require_json_content_type};
use crate::config::AppConfig;
use crate::handlers::{auth_handlers, photo_handlers, roster_handlers};

/// Body size limits. Raw uploads use `PayloadConfig`; pasted rosters arrive
/// as forms or JSON, whose extractors carry their own (much smaller) defaults.
pub fn body_limits(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    cfg.app_data(web::PayloadConfig::new(config.max_upload_bytes))
        .app_data(web::FormConfig::default().limit(config.max_import_bytes))
        .app_data(web::JsonConfig::default().limit(config.max_import_bytes));
}

/// Public pages: login, logout and the published planning.
pub fn public(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/logout", web::post().to(auth_handlers::logout))
        .route("/planning", web::get().to(roster_handlers::public::index))
        .route("/planning/{id}", web::get().to(roster_handlers::public::show));
}

/// Staff back-office; every route requires a signed-in session.
pub fn admin(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(actix_web::middleware::from_fn(require_auth))
            // /planning/import BEFORE /planning/{id} to avoid routing conflict
            .route("/planning", web::get().to(roster_handlers::admin::list))
            .route("/planning/import", web::get().to(roster_handlers::import::form))
            .route("/planning/import", web::post().to(roster_handlers::import::confirm))
            .route("/planning/import/preview", web::post().to(roster_handlers::import::preview))
            .route("/planning/{id}", web::get().to(roster_handlers::admin::detail))
            .route("/planning/{id}/rows/{index}", web::post().to(roster_handlers::admin::update_row))
            .route("/planning/{id}/publish", web::post().to(roster_handlers::admin::toggle_publish))
            .route("/planning/{id}/delete", web::post().to(roster_handlers::admin::delete))
            .route("/photos", web::get().to(photo_handlers::list))
            .route("/photos/upload", web::post().to(photo_handlers::upload))
            .route("/photos/{id}/tag", web::post().to(photo_handlers::update_tag))
            .route("/photos/{id}/delete", web::post().to(photo_handlers::delete)),
    );
}

/// JSON API under /api/v1.
pub fn api_v1(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .wrap(actix_web::middleware::from_fn(require_auth))
            .route("/planning/parse", web::post().to(roster_handlers::api::parse)),
    );
}
