use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use fundmeup_types::api::{Claims, CreateUpdateRequest};
use fundmeup_types::models::CampaignUpdate;

use crate::auth::AppState;
use crate::error::{ApiError, flatten_join};

/// Post a progress update. Ownership is checked against the campaign's
/// creator, not against any role: an entrepreneur can only update their own.
pub async fn create_update(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(ApiError::Validation("Title and content are required.".into()));
    }

    let update_id = Uuid::new_v4().to_string();

    let db = state.clone();
    let uid = update_id.clone();
    let cid = campaign_id.clone();
    let caller = claims.sub.to_string();
    let fields = req;
    flatten_join(
        tokio::task::spawn_blocking(move || {
            let campaign = db
                .db
                .get_campaign(&cid)
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Campaign not found.".into()))?;

            if campaign.creator_id != caller {
                return Err(ApiError::Forbidden(
                    "Only the campaign owner can post updates.".into(),
                ));
            }

            db.db
                .insert_update(&uid, &cid, &fields.title, &fields.content)
                .map_err(ApiError::Internal)?;
            Ok(fields)
        })
        .await,
    )
    .map(|fields| {
        (
            StatusCode::CREATED,
            Json(CampaignUpdate {
                id: update_id,
                campaign_id,
                title: fields.title,
                content: fields.content,
                created_at: Utc::now(),
            }),
        )
    })
}

pub async fn list_updates(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .list_updates_for_campaign(&campaign_id)
                .map_err(ApiError::Internal)
        })
        .await,
    )?;

    let updates = rows
        .into_iter()
        .map(|row| row.into_update())
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(updates))
}
