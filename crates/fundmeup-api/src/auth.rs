use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use fundmeup_db::Database;
use fundmeup_types::api::{AuthResponse, Claims, SigninRequest, SignupRequest};
use fundmeup_types::models::Account;

use crate::assistant::AssistantClient;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub assistant: AssistantClient,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required.".into(),
        ));
    }

    // Email lookup is case-sensitive, matching how addresses are stored
    if state.db.get_account_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("User already exists.".into()));
    }

    // Hash password with Argon2id; the plaintext is never persisted
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))?
        .to_string();

    let user_id = Uuid::new_v4();

    state.db.create_account(
        &user_id.to_string(),
        &req.email,
        &password_hash,
        &req.full_name,
        req.role.as_str(),
    )?;

    let user = Account {
        id: user_id,
        email: req.email,
        full_name: req.full_name,
        role: req.role,
        created_at: chrono::Utc::now(),
    };

    let token = create_token(&state.jwt_secret, &user)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required.".into(),
        ));
    }

    // The same generic error whether the email or the password was wrong
    let row = state
        .db
        .get_account_by_email(&req.email)?
        .ok_or(ApiError::Auth)?;

    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored hash unreadable: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Auth)?;

    let user = row.into_account()?;
    let token = create_token(&state.jwt_secret, &user)?;

    Ok(Json(AuthResponse { user, token }))
}

fn create_token(secret: &str, user: &Account) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("token encoding failed: {}", e)))
}
