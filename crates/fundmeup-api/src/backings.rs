use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use fundmeup_types::api::{Claims, CreateBackingRequest};
use fundmeup_types::models::{Backing, CampaignStatus, Role};

use crate::auth::AppState;
use crate::error::{ApiError, flatten_join};

/// Back a campaign. Only investors may pledge, the campaign must be active,
/// and the campaign's running total moves in the same transaction as the
/// backing row.
pub async fn create_backing(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBackingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Investor {
        return Err(ApiError::Forbidden(
            "Only investors can back campaigns.".into(),
        ));
    }
    if req.amount <= 0.0 {
        return Err(ApiError::Validation(
            "Backing amount must be greater than zero.".into(),
        ));
    }

    let backing_id = Uuid::new_v4().to_string();
    let backer_id = claims.sub;

    let db = state.clone();
    let bid = backing_id.clone();
    let cid = campaign_id.clone();
    let backer = backer_id.to_string();
    let amount = req.amount;
    let message = req.message.clone();
    flatten_join(
        tokio::task::spawn_blocking(move || {
            let campaign = db
                .db
                .get_campaign(&cid)
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Campaign not found.".into()))?;

            if CampaignStatus::parse(&campaign.status) != Some(CampaignStatus::Active) {
                return Err(ApiError::Validation("Campaign is not active.".into()));
            }

            db.db
                .create_backing(&bid, &cid, &backer, amount, message.as_deref())
                .map_err(ApiError::Internal)
        })
        .await,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(Backing {
            id: backing_id,
            campaign_id,
            backer_id,
            amount: req.amount,
            message: req.message,
            created_at: Utc::now(),
        }),
    ))
}

pub async fn list_backings(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .list_backings_for_campaign(&campaign_id)
                .map_err(ApiError::Internal)
        })
        .await,
    )?;

    let backings = rows
        .into_iter()
        .map(|row| row.into_backing())
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(backings))
}

/// The caller's own pledges, resolved from the session claims.
pub async fn my_backings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let backer_id = claims.sub.to_string();
    let rows = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .list_backings_for_backer(&backer_id)
                .map_err(ApiError::Internal)
        })
        .await,
    )?;

    let backings = rows
        .into_iter()
        .map(|row| row.into_backing())
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(backings))
}
