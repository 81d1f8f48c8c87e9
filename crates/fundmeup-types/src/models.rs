use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, fixed at signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Entrepreneur,
    Investor,
    Freelancer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Entrepreneur => "entrepreneur",
            Role::Investor => "investor",
            Role::Freelancer => "freelancer",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "entrepreneur" => Some(Role::Entrepreneur),
            "investor" => Some(Role::Investor),
            "freelancer" => Some(Role::Freelancer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public account view. The password hash never leaves the db layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<CampaignStatus> {
        match s {
            "active" => Some(CampaignStatus::Active),
            "completed" => Some(CampaignStatus::Completed),
            "cancelled" => Some(CampaignStatus::Cancelled),
            _ => None,
        }
    }
}

/// A fundraising listing. Campaign ids are plain strings: the seeded sample
/// campaigns use short ids ("1".."5") while created ones get fresh UUIDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub image_url: String,
    pub status: CampaignStatus,
    pub end_date: NaiveDate,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

/// An investor's pledge toward a campaign. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backing {
    pub id: String,
    pub campaign_id: String,
    pub backer_id: Uuid,
    pub amount: f64,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A progress update posted by the campaign's creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub id: String,
    pub campaign_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Freelancer skill profile, one per account (submits upsert).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreelancerProfile {
    pub id: String,
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub document_name: Option<String>,
    pub years_experience: u32,
    pub co_build_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
