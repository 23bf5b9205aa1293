//! Request guard tests: anonymous redirects and the JSON content-type check.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpResponse, cookie::Key, http::StatusCode, middleware::from_fn, test, web};

use chapelle::auth::middleware::{require_auth, require_json_content_type};

async fn ok() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

#[actix_web::test]
async fn test_anonymous_admin_request_redirects_to_login() {
    let app = test::init_service(
        App::new()
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), Key::generate()))
            .service(
                web::scope("/admin")
                    .wrap(from_fn(require_auth))
                    .route("/planning", web::get().to(ok)),
            ),
    )
    .await;

    let req = test::TestRequest::get().uri("/admin/planning").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

#[actix_web::test]
async fn test_json_guard() {
    let app = test::init_service(
        App::new().service(
            web::scope("/api/v1")
                .wrap(from_fn(require_json_content_type))
                .route("/planning/parse", web::post().to(ok))
                .route("/planning", web::get().to(ok)),
        ),
    )
    .await;

    let form = test::TestRequest::post()
        .uri("/api/v1/planning/parse")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("html=x")
        .to_request();
    assert_eq!(test::call_service(&app, form).await.status(), StatusCode::BAD_REQUEST);

    let json = test::TestRequest::post()
        .uri("/api/v1/planning/parse")
        .set_json(serde_json::json!({ "html": "<h1>Mars 2024</h1>" }))
        .to_request();
    assert_eq!(test::call_service(&app, json).await.status(), StatusCode::OK);

    // Reads are not checked
    let get = test::TestRequest::get().uri("/api/v1/planning").to_request();
    assert_eq!(test::call_service(&app, get).await.status(), StatusCode::OK);
}
