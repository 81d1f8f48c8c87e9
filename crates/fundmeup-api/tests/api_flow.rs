use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::NaiveDate;
use uuid::Uuid;

use fundmeup_api::assistant::AssistantClient;
use fundmeup_api::auth::{self, AppState, AppStateInner};
use fundmeup_api::backings;
use fundmeup_api::campaigns;
use fundmeup_api::error::ApiError;
use fundmeup_api::freelancer;
use fundmeup_api::updates;
use fundmeup_db::Database;
use fundmeup_types::api::{
    Claims, CreateBackingRequest, CreateCampaignRequest, CreateUpdateRequest, SigninRequest,
    SignupRequest, SubmitProfileRequest,
};
use fundmeup_types::models::Role;

fn test_state() -> AppState {
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
        assistant: AssistantClient::new(
            "http://127.0.0.1:9".into(),
            "test-key".into(),
            "test-model".into(),
        ),
    })
}

fn claims_for(role: Role) -> Claims {
    Claims {
        sub: Uuid::new_v4(),
        email: format!("{}@example.com", role),
        role,
        exp: 4_102_444_800, // 2100-01-01
    }
}

fn signup_request(email: &str, role: Role) -> SignupRequest {
    serde_json::from_value(serde_json::json!({
        "email": email,
        "password": "hunter22",
        "full_name": "Test User",
        "role": role,
    }))
    .unwrap()
}

#[tokio::test]
async fn signup_is_unique_per_email() {
    let state = test_state();

    let resp = auth::signup(State(state.clone()), Json(signup_request("a@b.c", Role::Investor)))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), 201);

    // same email again: conflict, and still exactly one account
    let err = auth::signup(State(state.clone()), Json(signup_request("a@b.c", Role::Investor)))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ApiError::Conflict(_)));

    let row = state.db.get_account_by_email("a@b.c").unwrap().unwrap();
    assert_eq!(row.full_name, "Test User");
}

#[tokio::test]
async fn signup_rejects_missing_fields() {
    let state = test_state();
    let mut req = signup_request("", Role::Freelancer);
    req.password = String::new();

    let err = auth::signup(State(state), Json(req)).await.err().unwrap();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn signin_gives_one_generic_error_for_any_mismatch() {
    let state = test_state();
    auth::signup(State(state.clone()), Json(signup_request("a@b.c", Role::Investor)))
        .await
        .unwrap();

    // wrong password
    let err = auth::signin(
        State(state.clone()),
        Json(SigninRequest {
            email: "a@b.c".into(),
            password: "wrong".into(),
        }),
    )
    .await
    .err()
    .unwrap();
    assert_eq!(err.to_string(), "Invalid credentials.");

    // unknown email: identical message
    let err = auth::signin(
        State(state.clone()),
        Json(SigninRequest {
            email: "nobody@b.c".into(),
            password: "hunter22".into(),
        }),
    )
    .await
    .err()
    .unwrap();
    assert_eq!(err.to_string(), "Invalid credentials.");

    // correct pair succeeds
    let resp = auth::signin(
        State(state),
        Json(SigninRequest {
            email: "a@b.c".into(),
            password: "hunter22".into(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn catalog_search_filters_conjoin() {
    let state = test_state();

    let query: campaigns::CampaignQuery =
        serde_json::from_value(serde_json::json!({"q": "eco", "category": "all"})).unwrap();
    let resp = campaigns::list_campaigns(State(state.clone()), Query(query))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), 200);

    // same filter straight against the store: exactly the one sample campaign
    let rows = state.db.search_campaigns(Some("eco"), None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Eco-Friendly Fashion Line");
}

#[tokio::test]
async fn campaign_creation_is_entrepreneur_only() {
    let state = test_state();
    let fields = CreateCampaignRequest {
        title: "Solar Backpacks".into(),
        description: "Backpacks with integrated solar panels.".into(),
        category: "technology".into(),
        goal_amount: 50000.0,
        image_url: String::new(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    };

    let err = campaigns::create_campaign(
        State(state.clone()),
        Extension(claims_for(Role::Investor)),
        Json(fields),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let claims = claims_for(Role::Entrepreneur);
    let fields = CreateCampaignRequest {
        title: "Solar Backpacks".into(),
        description: "Backpacks with integrated solar panels.".into(),
        category: "technology".into(),
        goal_amount: 50000.0,
        image_url: String::new(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    };
    let resp = campaigns::create_campaign(State(state.clone()), Extension(claims.clone()), Json(fields))
        .await
        .unwrap()
        .into_response();
    assert_eq!(resp.status(), 201);

    // fresh campaign starts unfunded and active
    let mine = state
        .db
        .list_campaigns_by_creator(&claims.sub.to_string())
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].current_amount, 0.0);
    assert_eq!(mine[0].status, "active");
}

#[tokio::test]
async fn campaign_creation_rejects_nonpositive_goal() {
    let state = test_state();
    let fields = CreateCampaignRequest {
        title: "t".into(),
        description: "d".into(),
        category: "technology".into(),
        goal_amount: 0.0,
        image_url: String::new(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    };

    let err = campaigns::create_campaign(
        State(state),
        Extension(claims_for(Role::Entrepreneur)),
        Json(fields),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn backing_is_investor_only_and_moves_the_total() {
    let state = test_state();

    // investors must exist as accounts for the backing foreign key
    auth::signup(State(state.clone()), Json(signup_request("inv@b.c", Role::Investor)))
        .await
        .unwrap();
    let backer = state.db.get_account_by_email("inv@b.c").unwrap().unwrap();
    let claims = Claims {
        sub: backer.id.parse().unwrap(),
        email: backer.email,
        role: Role::Investor,
        exp: 4_102_444_800,
    };

    let err = backings::create_backing(
        State(state.clone()),
        Path("1".to_string()),
        Extension(claims_for(Role::Freelancer)),
        Json(CreateBackingRequest {
            amount: 100.0,
            message: None,
        }),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let before = state.db.get_campaign("1").unwrap().unwrap().current_amount;
    let resp = backings::create_backing(
        State(state.clone()),
        Path("1".to_string()),
        Extension(claims.clone()),
        Json(CreateBackingRequest {
            amount: 250.0,
            message: Some("Good luck!".into()),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), 201);

    let after = state.db.get_campaign("1").unwrap().unwrap().current_amount;
    assert_eq!(after, before + 250.0);

    // unknown campaign and nonpositive amounts are rejected
    let err = backings::create_backing(
        State(state.clone()),
        Path("no-such-id".to_string()),
        Extension(claims.clone()),
        Json(CreateBackingRequest {
            amount: 50.0,
            message: None,
        }),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = backings::create_backing(
        State(state),
        Path("1".to_string()),
        Extension(claims),
        Json(CreateBackingRequest {
            amount: 0.0,
            message: None,
        }),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn updates_require_campaign_ownership() {
    let state = test_state();

    let claims = claims_for(Role::Entrepreneur);
    let fields = CreateCampaignRequest {
        title: "Solar Backpacks".into(),
        description: "Backpacks with integrated solar panels.".into(),
        category: "technology".into(),
        goal_amount: 50000.0,
        image_url: String::new(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    };
    campaigns::create_campaign(State(state.clone()), Extension(claims.clone()), Json(fields))
        .await
        .unwrap();
    let campaign_id = state
        .db
        .list_campaigns_by_creator(&claims.sub.to_string())
        .unwrap()[0]
        .id
        .clone();

    // someone else's entrepreneur claims are not enough
    let err = updates::create_update(
        State(state.clone()),
        Path(campaign_id.clone()),
        Extension(claims_for(Role::Entrepreneur)),
        Json(CreateUpdateRequest {
            title: "Milestone".into(),
            content: "We shipped.".into(),
        }),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Forbidden(_)));

    let resp = updates::create_update(
        State(state.clone()),
        Path(campaign_id.clone()),
        Extension(claims),
        Json(CreateUpdateRequest {
            title: "Milestone".into(),
            content: "We shipped.".into(),
        }),
    )
    .await
    .unwrap()
    .into_response();
    assert_eq!(resp.status(), 201);

    let stored = state.db.list_updates_for_campaign(&campaign_id).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Milestone");
}

#[tokio::test]
async fn profile_submit_is_an_upsert() {
    let state = test_state();
    auth::signup(State(state.clone()), Json(signup_request("free@b.c", Role::Freelancer)))
        .await
        .unwrap();
    let account = state.db.get_account_by_email("free@b.c").unwrap().unwrap();
    let claims = Claims {
        sub: account.id.parse().unwrap(),
        email: account.email,
        role: Role::Freelancer,
        exp: 4_102_444_800,
    };

    let first = SubmitProfileRequest {
        skills: vec!["rust".into()],
        years_experience: 2,
        document_name: None,
        co_build_link: None,
    };
    freelancer::submit_profile(State(state.clone()), Extension(claims.clone()), Json(first))
        .await
        .unwrap();

    let second = SubmitProfileRequest {
        skills: vec!["rust".into(), "sql".into()],
        years_experience: 3,
        document_name: Some("cv.pdf".into()),
        co_build_link: None,
    };
    freelancer::submit_profile(State(state.clone()), Extension(claims.clone()), Json(second))
        .await
        .unwrap();

    let row = state
        .db
        .get_profile_by_user(&claims.sub.to_string())
        .unwrap()
        .unwrap();
    assert_eq!(row.years_experience, 3);
    assert_eq!(row.skills, r#"["rust","sql"]"#);

    // non-freelancers are turned away
    let err = freelancer::submit_profile(
        State(state),
        Extension(claims_for(Role::Investor)),
        Json(SubmitProfileRequest {
            skills: vec!["x".into()],
            years_experience: 1,
            document_name: None,
            co_build_link: None,
        }),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(err, ApiError::Forbidden(_)));
}
