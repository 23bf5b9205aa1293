use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, password, rate_limit::RateLimiter, session};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::CsrfOnly;
use crate::models::staff;
use crate::templates_structs::LoginTemplate;

const HOME: &str = "/admin/planning";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

fn login_error(session: &Session, config: &AppConfig, message: &str) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: Some(message.to_string()),
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

pub async fn login_page(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    if session::get_user_id(&session).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", HOME))
            .finish());
    }

    let tmpl = LoginTemplate {
        error: None,
        app_name: config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(&session),
    };
    render(tmpl)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check before any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failures");
        return login_error(
            &session,
            &config,
            "Too many failed login attempts. Please try again later.",
        );
    }

    let verified = match staff::find_by_username(&pool, &form.username).await? {
        Some(s) if password::verify_password(&form.password, &s.password_hash)? => Some(s),
        _ => None,
    };

    match verified {
        Some(s) => {
            limiter.clear(ip);
            session::sign_in(&session, s.id, &s.username)?;
            log::info!("Staff '{}' signed in", s.username);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", HOME))
                .finish())
        }
        None => {
            limiter.record_failure(ip);
            login_error(&session, &config, "Invalid username or password")
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}
