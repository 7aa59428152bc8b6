use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::IntoResponse,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

/// HTTP Basic auth gate for the admin surface. A missing or wrong header
/// yields 401 with a `WWW-Authenticate` challenge.
pub async fn admin_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let admin = &state.config.admin;
    if credentials_match(header_value, &admin.username, &admin.password) {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn credentials_match(header_value: Option<&str>, username: &str, password: &str) -> bool {
    let Some((got_user, got_pass)) = parse_basic_header(header_value) else {
        return false;
    };
    got_user == username && got_pass == password
}

fn parse_basic_header(header_value: Option<&str>) -> Option<(String, String)> {
    let encoded = header_value?.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
