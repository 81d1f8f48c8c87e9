//! Database row types — these map directly to SQLite rows.
//! Distinct from the fundmeup-types API models to keep the DB layer independent;
//! `into_*` conversions parse ids, timestamps, and enums at the boundary.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use fundmeup_types::models::{
    Account, Backing, Campaign, CampaignStatus, CampaignUpdate, FreelancerProfile, Role,
};

pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub created_at: String,
}

pub struct CampaignRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal_amount: f64,
    pub current_amount: f64,
    pub image_url: String,
    pub status: String,
    pub end_date: String,
    pub creator_id: String,
    pub created_at: String,
}

pub struct BackingRow {
    pub id: String,
    pub campaign_id: String,
    pub backer_id: String,
    pub amount: f64,
    pub message: Option<String>,
    pub created_at: String,
}

pub struct UpdateRow {
    pub id: String,
    pub campaign_id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

pub struct ProfileRow {
    pub id: String,
    pub user_id: String,
    pub skills: String,
    pub document_name: Option<String>,
    pub years_experience: u32,
    pub co_build_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Accept RFC 3339 too, for rows written with explicit timestamps.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("bad timestamp '{}': {}", s, e))
}

impl AccountRow {
    pub fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: Uuid::parse_str(&self.id).with_context(|| format!("bad account id '{}'", self.id))?,
            email: self.email,
            full_name: self.full_name,
            role: Role::parse(&self.role).ok_or_else(|| anyhow!("bad role '{}'", self.role))?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl CampaignRow {
    pub fn into_campaign(self) -> Result<Campaign> {
        Ok(Campaign {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            goal_amount: self.goal_amount,
            current_amount: self.current_amount,
            image_url: self.image_url,
            status: CampaignStatus::parse(&self.status)
                .ok_or_else(|| anyhow!("bad campaign status '{}'", self.status))?,
            end_date: NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d")
                .with_context(|| format!("bad end_date '{}'", self.end_date))?,
            creator_id: self.creator_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl BackingRow {
    pub fn into_backing(self) -> Result<Backing> {
        Ok(Backing {
            id: self.id,
            campaign_id: self.campaign_id,
            backer_id: Uuid::parse_str(&self.backer_id)
                .with_context(|| format!("bad backer id '{}'", self.backer_id))?,
            amount: self.amount,
            message: self.message,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl UpdateRow {
    pub fn into_update(self) -> Result<CampaignUpdate> {
        Ok(CampaignUpdate {
            id: self.id,
            campaign_id: self.campaign_id,
            title: self.title,
            content: self.content,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl ProfileRow {
    pub fn into_profile(self) -> Result<FreelancerProfile> {
        Ok(FreelancerProfile {
            id: self.id,
            user_id: Uuid::parse_str(&self.user_id)
                .with_context(|| format!("bad profile user id '{}'", self.user_id))?,
            skills: serde_json::from_str(&self.skills)
                .with_context(|| format!("bad skills payload '{}'", self.skills))?,
            document_name: self.document_name,
            years_experience: self.years_experience,
            co_build_link: self.co_build_link,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
