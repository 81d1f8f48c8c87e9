use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use fundmeup_api::assistant::{self, AssistantClient};
use fundmeup_api::auth::{self, AppState, AppStateInner};
use fundmeup_api::backings;
use fundmeup_api::campaigns;
use fundmeup_api::freelancer;
use fundmeup_api::middleware::require_auth;
use fundmeup_api::updates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fundmeup=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("FUNDMEUP_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("FUNDMEUP_DB_PATH").unwrap_or_else(|_| "fundmeup.db".into());
    let host = std::env::var("FUNDMEUP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("FUNDMEUP_PORT")
        .unwrap_or_else(|_| "3001".into())
        .parse()?;

    // The assistant proxy is useless without its upstream key; refuse to start
    let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| {
        anyhow::anyhow!(
            "GOOGLE_API_KEY environment variable is not set. \
             Please set it before running the server."
        )
    })?;
    let api_url = std::env::var("ASSISTANT_API_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());
    let model =
        std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-lite".into());

    // Init database
    let db = fundmeup_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        assistant: AssistantClient::new(api_url, api_key, model),
    });

    // Routes
    let public_routes = Router::new()
        .route("/api/signup", post(auth::signup))
        .route("/api/signin", post(auth::signin))
        .route("/api/login", post(auth::signin))
        .route("/api/campaigns", get(campaigns::list_campaigns))
        .route("/api/campaigns/{campaign_id}", get(campaigns::get_campaign))
        .route(
            "/api/campaigns/{campaign_id}/backings",
            get(backings::list_backings),
        )
        .route(
            "/api/campaigns/{campaign_id}/updates",
            get(updates::list_updates),
        )
        .route("/python-api/chat", post(assistant::chat))
        .route("/python-api/summarize", post(assistant::summarize))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/campaigns", post(campaigns::create_campaign))
        .route(
            "/api/campaigns/{campaign_id}/backings",
            post(backings::create_backing),
        )
        .route(
            "/api/campaigns/{campaign_id}/updates",
            post(updates::create_update),
        )
        .route("/api/me/campaigns", get(campaigns::my_campaigns))
        .route("/api/me/backings", get(backings::my_backings))
        .route(
            "/api/freelancer-profile",
            post(freelancer::submit_profile).get(freelancer::get_profile),
        )
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("FundMeUp server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
