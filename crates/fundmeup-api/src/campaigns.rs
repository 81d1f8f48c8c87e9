use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use fundmeup_types::api::{CampaignResponse, Claims, CreateCampaignRequest};
use fundmeup_types::models::{Campaign, Role};

use crate::auth::AppState;
use crate::error::{ApiError, flatten_join};

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    /// Free-text filter, substring-matched against title and description.
    pub q: Option<String>,
    /// Exact category filter; "all" (or absent) bypasses it.
    pub category: Option<String>,
}

/// List or search the catalog. With no query parameters this returns the
/// full set; no ranking, no pagination.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let text = query.q.filter(|q| !q.trim().is_empty());
    let category = query.category.filter(|c| !c.is_empty() && c != "all");

    let db = state.clone();
    let rows = flatten_join(
        tokio::task::spawn_blocking(move || {
            if text.is_none() && category.is_none() {
                db.db.list_campaigns().map_err(ApiError::Internal)
            } else {
                db.db
                    .search_campaigns(text.as_deref(), category.as_deref())
                    .map_err(ApiError::Internal)
            }
        })
        .await,
    )?;

    let now = Utc::now();
    let campaigns = rows
        .into_iter()
        .map(|row| row.into_campaign().map(|c| campaign_response(c, now)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(campaigns))
}

pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = flatten_join(
        tokio::task::spawn_blocking(move || db.db.get_campaign(&campaign_id).map_err(ApiError::Internal))
            .await,
    )?
    .ok_or_else(|| ApiError::NotFound("Campaign not found.".into()))?;

    Ok(Json(campaign_response(row.into_campaign()?, Utc::now())))
}

/// Role check lives here, not in any UI: only entrepreneurs create campaigns.
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Entrepreneur {
        return Err(ApiError::Forbidden(
            "Only entrepreneurs can create campaigns.".into(),
        ));
    }
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::Validation("Title and description are required.".into()));
    }
    if req.category.trim().is_empty() {
        return Err(ApiError::Validation("Category is required.".into()));
    }
    if req.goal_amount <= 0.0 {
        return Err(ApiError::Validation(
            "Goal amount must be greater than zero.".into(),
        ));
    }

    let campaign_id = Uuid::new_v4().to_string();
    let creator = claims.sub.to_string();

    let db = state.clone();
    let id = campaign_id;
    let fields = req;
    let stored = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .insert_campaign(
                    &id,
                    &fields.title,
                    &fields.description,
                    &fields.category,
                    fields.goal_amount,
                    &fields.image_url,
                    &fields.end_date.format("%Y-%m-%d").to_string(),
                    &creator,
                )
                .map_err(ApiError::Internal)?;
            db.db.get_campaign(&id).map_err(ApiError::Internal)
        })
        .await,
    )?
    .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("campaign vanished after insert")))?;

    Ok((
        StatusCode::CREATED,
        Json(campaign_response(stored.into_campaign()?, Utc::now())),
    ))
}

pub async fn my_campaigns(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let creator_id = claims.sub.to_string();
    let rows = flatten_join(
        tokio::task::spawn_blocking(move || {
            db.db
                .list_campaigns_by_creator(&creator_id)
                .map_err(ApiError::Internal)
        })
        .await,
    )?;

    let now = Utc::now();
    let campaigns = rows
        .into_iter()
        .map(|row| row.into_campaign().map(|c| campaign_response(c, now)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(campaigns))
}

/// Attach the fields derived on read; neither is ever stored.
pub fn campaign_response(campaign: Campaign, now: DateTime<Utc>) -> CampaignResponse {
    let progress_percentage = progress_percentage(campaign.current_amount, campaign.goal_amount);
    let days_left = days_left(&campaign, now);
    CampaignResponse {
        campaign,
        progress_percentage,
        days_left,
    }
}

/// Funding progress in percent, clamped at 100 — overfunded campaigns
/// still report 100.
fn progress_percentage(current: f64, goal: f64) -> f64 {
    (current / goal * 100.0).min(100.0)
}

/// Whole days until the end date (midnight UTC), rounded up and clamped
/// to zero for display.
fn days_left(campaign: &Campaign, now: DateTime<Utc>) -> i64 {
    let end = campaign
        .end_date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    let ms = end.signed_duration_since(now).num_milliseconds();
    ((ms as f64 / 86_400_000.0).ceil() as i64).max(0)
}
