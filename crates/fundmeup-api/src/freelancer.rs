use axum::{Extension, Json, extract::State, response::IntoResponse};
use uuid::Uuid;

use fundmeup_types::api::{Claims, SubmitProfileRequest, SubmitProfileResponse};
use fundmeup_types::models::Role;

use crate::auth::AppState;
use crate::error::{ApiError, flatten_join};

/// Create or update the caller's freelancer profile. Upsert semantics:
/// a second submit for the same account updates the stored row, never
/// duplicates it.
pub async fn submit_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Freelancer {
        return Err(ApiError::Forbidden(
            "Only freelancers can submit a profile.".into(),
        ));
    }
    if req.skills.is_empty() || req.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(ApiError::Validation("At least one skill is required.".into()));
    }

    let skills_json = serde_json::to_string(&req.skills)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("skills serialization failed: {}", e)))?;
    let profile_id = Uuid::new_v4().to_string();
    let user_id = claims.sub.to_string();

    let db = state.clone();
    let row = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .upsert_profile(
                    &profile_id,
                    &user_id,
                    &skills_json,
                    req.document_name.as_deref(),
                    req.years_experience,
                    req.co_build_link.as_deref(),
                )
                .map_err(ApiError::Internal)?;

            // Read back: on update the original id and created_at survive
            db.db
                .get_profile_by_user(&user_id)
                .map_err(ApiError::Internal)
        })
        .await,
    )?
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("profile vanished after upsert")))?;

    Ok(Json(SubmitProfileResponse {
        message: "Profile saved successfully.".into(),
        profile: row.into_profile()?,
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let user_id = claims.sub.to_string();
    let row = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db.get_profile_by_user(&user_id).map_err(ApiError::Internal)
        })
        .await,
    )?
    .ok_or_else(|| ApiError::NotFound("Profile not found.".into()))?;

    Ok(Json(row.into_profile()?))
}
