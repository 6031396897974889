#![allow(dead_code)]

use std::sync::Once;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use hexmarket::{
    config::Config,
    create_app, db,
    entities::{startup, token, FundingStage},
    AppState,
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Fresh in-memory database with migrations applied.
pub async fn test_state() -> AppState {
    setup();
    let config = Config::for_tests();
    let db = db::connect(&config).await.expect("in-memory database");
    AppState::new(db, &config)
}

pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (create_app(state.clone()), state)
}

pub async fn insert_startup(
    db: &DatabaseConnection,
    name: &str,
    industry: &str,
    stage: FundingStage,
    goal_cents: i64,
    approved: bool,
    age_hours: i64,
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    startup::ActiveModel {
        id: Set(id.clone()),
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        funding_goal_cents: Set(goal_cents),
        is_approved: Set(approved),
        industry: Set(industry.to_string()),
        stage: Set(stage),
        created_at: Set(Utc::now() - Duration::hours(age_hours)),
    }
    .insert(db)
    .await
    .expect("insert startup");
    id
}

pub async fn insert_token(db: &DatabaseConnection, name: &str, symbol: &str, goal_cents: i64) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    token::ActiveModel {
        id: Set(id.clone()),
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        symbol: Set(symbol.to_string()),
        funding_goal_cents: Set(goal_cents),
        is_approved: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("insert token");
    id
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_authed(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer demo-token")
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value, authed: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if authed {
        builder = builder.header(header::COOKIE, "ba_session=demo-session");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Sends `request` through the router and parses the body as JSON (`Null` when empty or not JSON).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
