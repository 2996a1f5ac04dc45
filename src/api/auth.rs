use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Bearer-token gate in front of the API.
///
/// With `API_TOKEN` set, every protected request must carry a matching
/// `Authorization: Bearer <token>`; with it empty or unset the gate is
/// open (dev mode). Which bankrolls a caller may actually read is decided
/// by the surrounding platform, not here.
pub async fn require_auth(req: Request, next: Next) -> Response {
    let expected = std::env::var("API_TOKEN").unwrap_or_default();

    if expected.is_empty() {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if token == expected => next.run(req).await,
        Some(_) => reject("invalid token"),
        None => reject("missing bearer token"),
    }
}

/// Same `{success, error}` envelope the rest of the API speaks.
fn reject(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}
