use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Account, Backing, Campaign, CampaignUpdate, FreelancerProfile, Role};

// -- Session claims --

/// Session token claims, decoded by the auth middleware and threaded to
/// handlers as a request extension. Canonical definition lives here so the
/// api crate and any future consumers agree on the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default, alias = "fullName")]
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Account,
    pub token: String,
}

// -- Campaigns --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCampaignRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub image_url: String,
    pub end_date: NaiveDate,
}

/// Campaign plus the fields derived on read, never stored.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub progress_percentage: f64,
    pub days_left: i64,
}

// -- Backings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBackingRequest {
    pub amount: f64,
    #[serde(default)]
    pub message: Option<String>,
}

pub type BackingResponse = Backing;

// -- Updates --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUpdateRequest {
    pub title: String,
    pub content: String,
}

pub type UpdateResponse = CampaignUpdate;

// -- Freelancer profiles --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitProfileRequest {
    pub skills: Vec<String>,
    #[serde(alias = "yearsExperience")]
    pub years_experience: u32,
    #[serde(default, alias = "documentName")]
    pub document_name: Option<String>,
    #[serde(default, alias = "coBuildLink")]
    pub co_build_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitProfileResponse {
    pub message: String,
    pub profile: FreelancerProfile,
}

// -- Assistant --

/// One prior chat turn; `role` is "user" or "model", matching the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub parts: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub pitch_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}
