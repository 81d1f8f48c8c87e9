use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use fundmeup_types::api::Claims;

use crate::error::ApiError;

/// Extract and validate the session token from the Authorization header.
/// The decoded claims are the per-request session context: handlers read
/// them from request extensions instead of any process-wide identity.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or(ApiError::Auth)?;

    let secret =
        std::env::var("FUNDMEUP_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Auth)?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}
