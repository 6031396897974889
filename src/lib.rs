use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod funding;
pub mod investments;
pub mod routes;
pub mod seed;
pub mod session;

use config::{Config, RateLimit};
use routes::*;
use session::{DemoSessionVerifier, SessionUser, SessionVerifier};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: Arc<dyn SessionVerifier>,
    pub session_cookie: String,
    pub rate_limit: Option<RateLimit>,
}

impl AppState {
    /// State with the mocked session verifier answering with `config.demo_user`.
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        AppState {
            db,
            sessions: Arc::new(DemoSessionVerifier::new(config.demo_user.clone())),
            session_cookie: config.session_cookie.clone(),
            rate_limit: config.rate_limit,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn SessionVerifier>) -> Self {
        self.sessions = verifier;
        self
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HEX MARKETPLACE API",
        version = "0.1.0",
        description = "Demo investment marketplace. Payments and on-chain transfers are simulated."
    ),
    paths(
        health_check,
        routes::marketplace::list_startups,
        routes::marketplace::list_tokens,
        routes::marketplace::get_entity,
        routes::funding::get_funding,
        routes::invest::invest_fiat,
        routes::invest::invest_crypto,
        routes::portfolio::get_portfolio,
        routes::notifications::list_notifications,
        routes::notifications::mark_read,
        routes::waitlist::join_waitlist,
        routes::session::me
    ),
    components(schemas(
        EntityCard,
        EntityDetail,
        DocumentView,
        DueDiligenceView,
        FundingResponse,
        FiatInvestRequest,
        CryptoInvestRequest,
        FiatInvestResponse,
        CryptoInvestResponse,
        PaymentIntentView,
        InvestmentView,
        PortfolioResponse,
        PortfolioInvestment,
        VestingView,
        NotificationView,
        WaitlistRequest,
        SessionUser,
        entities::EntityType,
        entities::FundingStage,
        entities::PaymentStatus,
        entities::UserRole
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api_doc = ApiDoc::openapi();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/marketplace/startups", get(list_startups))
        .route("/marketplace/tokens", get(list_tokens))
        .route("/marketplace/{kind}/{id}", get(get_entity))
        .route("/funding/{id}", get(get_funding))
        .route("/invest/fiat", post(invest_fiat))
        .route("/invest/crypto", post(invest_crypto))
        .route("/portfolio", get(get_portfolio))
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", post(mark_read))
        .route("/waitlist", post(join_waitlist))
        .route("/me", get(me));

    let api_routes = match state.rate_limit {
        Some(limit) => {
            let governor_conf = GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .per_second(limit.per_second)
                .burst_size(limit.burst)
                .finish();
            match governor_conf {
                Some(conf) => api_routes.layer(GovernorLayer {
                    config: Arc::new(conf),
                }),
                None => {
                    tracing::error!("Invalid rate limit {:?}, serving without one", limit);
                    api_routes
                }
            }
        }
        None => {
            tracing::warn!("Rate limiting disabled");
            api_routes
        }
    };

    // docs are not rate limited
    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

    Router::new()
        .merge(api_routes.with_state(state))
        .merge(docs_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
