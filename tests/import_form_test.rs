//! Import form handler tests: pasted rosters larger than the default form
//! limit reach the handler.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, cookie::Key, http::StatusCode, test, web};
use sqlx::postgres::PgPoolOptions;

use chapelle::config::AppConfig;
use chapelle::handlers::roster_handlers::import;
use chapelle::models::roster::parse;
use chapelle::routes;
use common::roster_html;

/// A five-Sunday roster with inline styling, as pasted from a word processor.
fn styled_roster_html() -> String {
    let style = "font-family: Calibri, sans-serif; font-size: 11pt; color: #1f3864; \
                 border: 1px solid #8eaadb; padding: 0cm 5.4pt 0cm 5.4pt; \
                 background: #d9e2f3; mso-border-alt: solid #8eaadb .5pt;";
    let cell = |text: &str| {
        format!("<p class=\"MsoNormal\" style=\"{style}\"><span style=\"{style}\"><b>{text}</b></span></p>")
    };
    let dates = ["3 mars", "10 mars", "17 mars", "24 mars", "31 mars"];
    let names = ["Jean", "Paul", "Marie", "Luc", "Anne", "Marc", "Claire", "Pierre", "Sophie"];

    let rows: Vec<Vec<String>> = dates
        .iter()
        .map(|d| std::iter::once(cell(*d)).chain(names.iter().map(|n| cell(*n))).collect())
        .collect();
    let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();

    roster_html(
        "Planning Mars 2024",
        &[
            "Date", "Présidence", "Musique", "Prédicateur", "Enfants", "Accueil",
            "Projection", "Diffusion", "Ménage", "Observations",
        ],
        &rows,
    )
}

fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
        _ => None,
    })
    .expect("config")
}

#[actix_web::test]
async fn test_large_pasted_roster_reaches_the_handler() {
    let html = styled_roster_html();
    assert!(html.len() > 16 * 1024, "fixture must exceed the default form limit");
    assert_eq!(parse(&html).expect("fixture parses").rows.len(), 5);

    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    let app = test::init_service(
        App::new()
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
            .configure(|cfg| routes::body_limits(cfg, &config))
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(config.clone()))
            .route("/admin/planning/import/preview", web::post().to(import::preview)),
    )
    .await;

    // The body is accepted; the handler then refuses the unknown CSRF token.
    let req = test::TestRequest::post()
        .uri("/admin/planning/import/preview")
        .set_form([("html", html.as_str()), ("csrf_token", "not-the-session-token")])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_import_limit_is_enforced() {
    let config = AppConfig {
        max_import_bytes: 4 * 1024,
        ..test_config()
    };
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    let app = test::init_service(
        App::new()
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
            .configure(|cfg| routes::body_limits(cfg, &config))
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(config.clone()))
            .route("/admin/planning/import/preview", web::post().to(import::preview)),
    )
    .await;

    let html = styled_roster_html();
    let req = test::TestRequest::post()
        .uri("/admin/planning/import/preview")
        .set_form([("html", html.as_str()), ("csrf_token", "x")])
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
