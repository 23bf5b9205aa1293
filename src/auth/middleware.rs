use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    http::Method,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Redirects to /login unless the session carries a staff id.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let signed_in = req
        .get_session()
        .get::<i64>("user_id")
        .unwrap_or(None)
        .is_some();

    if !signed_in {
        log::debug!("Anonymous request to {} redirected to login", req.path());
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", "/login"))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Rejects mutating API requests that are not `application/json`.
///
/// Browsers cannot send cross-origin JSON with cookies through a plain form,
/// so the content-type check stands in for a CSRF token on the JSON API.
pub async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method();
    let mutating = method == Method::POST || method == Method::PUT || method == Method::DELETE;
    let is_json = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if mutating && !is_json {
        let body = serde_json::json!({
            "error": "Content-Type must be application/json for mutation requests"
        });
        let response = HttpResponse::BadRequest().json(body);
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}
