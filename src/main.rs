use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use chapelle::auth::{password, rate_limit::RateLimiter};
use chapelle::config::AppConfig;
use chapelle::errors::render;
use chapelle::templates_structs::NotFoundTemplate;
use chapelle::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&config.upload_dir)?;

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    db::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let admin_hash = password::hash_password(&config.admin_password)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    db::seed_admin(&pool, &admin_hash)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // SESSION_KEY keeps sessions valid across restarts
    let secret_key = match &config.session_key {
        Some(bytes) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(bytes)
        }
        None => {
            log::warn!("No usable SESSION_KEY; generating a random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = RateLimiter::default();
    let bind_addr = config.bind_addr.clone();
    let upload_dir = config.upload_dir.clone();
    let app_name = config.app_name.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(false)
            .cookie_http_only(true)
            .build();
        let app_name = app_name.clone();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(web::Data::new(limiter.clone()))
            .configure(|cfg| routes::body_limits(cfg, &config))
            .service(actix_files::Files::new("/static", "./static"))
            .service(actix_files::Files::new("/uploads", upload_dir.clone()))
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::SeeOther()
                    .insert_header(("Location", "/planning"))
                    .finish()
            }))
            .configure(routes::public)
            .configure(routes::api_v1)
            .configure(routes::admin)
            // Default 404 handler (must be registered last)
            .default_service(web::to(move || {
                let app_name = app_name.clone();
                async move {
                    render(NotFoundTemplate { app_name }).map(|mut res| {
                        *res.status_mut() = actix_web::http::StatusCode::NOT_FOUND;
                        res
                    })
                }
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
