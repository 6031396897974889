mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::*;
use hexmarket::{
    config::{Config, RateLimit},
    create_app,
    entities::{CryptoTx, FundingStage, Investment, Notification, PaymentIntent, WaitlistEntry, Wallet},
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app().await;

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_session() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, get("/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, body) = send(&app, get_authed("/me")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "demo-user-id");
    assert_eq!(body["email"], "demo@example.com");
    assert_eq!(body["role"], "INVESTOR");
}

#[tokio::test]
async fn test_startups_are_filtered_and_newest_first() {
    let (app, state) = test_app().await;
    insert_startup(&state.db, "Old AI", "AI", FundingStage::Seed, 100_000, true, 5).await;
    insert_startup(&state.db, "New AI", "AI", FundingStage::SeriesA, 100_000, true, 1).await;
    insert_startup(&state.db, "Ledger", "FinTech", FundingStage::Seed, 100_000, true, 2).await;
    insert_startup(&state.db, "Hidden", "AI", FundingStage::Seed, 100_000, false, 0).await;

    let (status, body) = send(&app, get("/marketplace/startups")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["New AI", "Ledger", "Old AI"]);

    let (_, body) = send(&app, get("/marketplace/startups?industry=AI")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/marketplace/startups?stage=Series%20A")).await;
    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["stage"], "SERIES_A");

    let (_, body) = send(&app, get("/marketplace/startups?search=ai")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/marketplace/startups?industry=&search=LEDG")).await;
    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["name"], "Ledger");

    let (status, _) = send(&app, get("/marketplace/startups?stage=SERIES_Z")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tokens_search_matches_name_or_symbol() {
    let (app, state) = test_app().await;
    insert_token(&state.db, "Hex Utility", "HEXU", 100_000).await;
    insert_token(&state.db, "Solar Yield", "SOLY", 100_000).await;

    let (status, body) = send(&app, get("/marketplace/tokens")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get("/marketplace/tokens?search=soly")).await;
    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["symbol"], "SOLY");
    assert_eq!(cards[0]["kind"], "TOKEN");

    let (_, body) = send(&app, get("/marketplace/tokens?search=utility")).await;
    assert_eq!(body.as_array().unwrap()[0]["name"], "Hex Utility");
}

#[tokio::test]
async fn test_entity_detail_and_not_found() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    let (status, body) = send(&app, get(&format!("/marketplace/startup/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Aurora");
    assert_eq!(body["amountRaised"].as_f64(), Some(0.0));
    assert!(body["documents"].as_array().unwrap().is_empty());
    assert!(body["dueDiligenceReports"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/marketplace/startup/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // a startup id is not a token
    let (status, _) = send(&app, get(&format!("/marketplace/token/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&format!("/marketplace/bond/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unauthenticated_investment_is_rejected() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": 100 });
    let (status, json) = send(&app, post_json("/invest/fiat", body, false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Unauthorized");

    let body = json!({ "entityId": id, "txHash": "0xabc", "amount": 100 });
    let (status, _) = send(&app, post_json("/invest/crypto", body, false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_fiat_investment_writes_intent_investment_and_notification() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": 1000 });
    let (status, json) = send(&app, post_json("/invest/fiat", body, true)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(json["intent"]["provider"], "stripe-demo");
    assert_eq!(json["intent"]["status"], "SUCCEEDED");
    assert_eq!(json["intent"]["metadata"]["entityId"], id.as_str());
    assert_eq!(json["intent"]["metadata"]["entityType"], "STARTUP");
    assert!(json["intent"]["providerId"].as_str().unwrap().starts_with("pi_demo_"));

    assert_eq!(json["investment"]["startupId"], id.as_str());
    assert!(json["investment"]["tokenId"].is_null());
    assert_eq!(json["investment"]["amount"].as_f64(), Some(1000.0));
    assert_eq!(json["investment"]["ownership"].as_f64(), Some(0.0));
    assert_eq!(json["investment"]["userId"], "demo-user-id");

    assert_eq!(PaymentIntent::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 1);
    let notifications = Notification::find().all(&state.db).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "INVESTMENT_CONFIRMED");
    assert_eq!(notifications[0].message, "Demo fiat investment of $1,000 recorded");
}

#[tokio::test]
async fn test_invalid_fiat_requests_write_nothing() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": -5 });
    let (status, _) = send(&app, post_json("/invest/fiat", body, true)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({ "entityId": "missing", "entityType": "STARTUP", "amount": 50 });
    let (status, _) = send(&app, post_json("/invest/fiat", body, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // wrong entity type for the id
    let body = json!({ "entityId": id, "entityType": "TOKEN", "amount": 50 });
    let (status, _) = send(&app, post_json("/invest/fiat", body, true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(PaymentIntent::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(Notification::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_crypto_purchases_reuse_the_wallet() {
    let (app, state) = test_app().await;
    let id = insert_token(&state.db, "Hex Utility", "HEXU", 100_000_000).await;

    for hash in ["0xaaaa111111", "0xbbbb222222"] {
        let body = json!({ "entityId": id, "txHash": hash, "amount": 250.5 });
        let (status, json) = send(&app, post_json("/invest/crypto", body, true)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["investment"]["tokenId"], id.as_str());
        assert_eq!(json["investment"]["amount"].as_f64(), Some(250.5));
    }

    assert_eq!(Wallet::find().count(&state.db).await.unwrap(), 1);
    assert_eq!(CryptoTx::find().count(&state.db).await.unwrap(), 2);
    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 2);

    let messages: Vec<String> = Notification::find()
        .all(&state.db)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert!(messages.contains(&"Demo token purchase confirmed (hash ending 222222).".to_string()));

    let (status, _) = send(
        &app,
        post_json("/invest/crypto", json!({ "entityId": id, "txHash": "  ", "amount": 1 }), true),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_funding_progress_after_investments() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    for amount in [1000, 2500] {
        let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": amount });
        let (status, _) = send(&app, post_json("/invest/fiat", body, true)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get(&format!("/funding/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amountRaised"].as_f64(), Some(3500.0));
    assert_eq!(body["fundingGoal"].as_f64(), Some(10_000.0));
    assert_eq!(body["percentFunded"].as_f64(), Some(35.0));

    let (_, body) = send(&app, get("/marketplace/startups")).await;
    assert_eq!(body[0]["percentLabel"], "35.0%");
    assert_eq!(body[0]["amountRaised"].as_f64(), Some(3500.0));

    let (status, body) = send(&app, get("/funding/unknown")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amountRaised"].as_f64(), Some(0.0));
    assert!(body["fundingGoal"].is_null());
}

#[tokio::test]
async fn test_portfolio_lists_holdings_and_recent_notifications() {
    let (app, state) = test_app().await;
    let startup_id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;
    let token_id = insert_token(&state.db, "Hex Utility", "HEXU", 100_000_000).await;

    let (status, _) = send(&app, get("/portfolio")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = json!({ "entityId": startup_id, "entityType": "STARTUP", "amount": 100 });
    send(&app, post_json("/invest/fiat", body, true)).await;
    for i in 0..11 {
        let body = json!({ "entityId": token_id, "txHash": format!("0xhash{:06}", i), "amount": 10 });
        let (status, _) = send(&app, post_json("/invest/crypto", body, true)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get_authed("/portfolio")).await;
    assert_eq!(status, StatusCode::OK);

    let investments = body["investments"].as_array().unwrap();
    assert_eq!(investments.len(), 12);
    assert_eq!(body["totalInvested"].as_f64(), Some(210.0));
    assert_eq!(body["notifications"].as_array().unwrap().len(), 10);

    let startup_holding = investments
        .iter()
        .find(|inv| inv["startupId"] == startup_id.as_str())
        .unwrap();
    assert_eq!(startup_holding["assetName"], "Aurora");
    assert_eq!(startup_holding["vestedPercent"].as_f64(), Some(100.0));
    assert!(startup_holding["vesting"].as_array().unwrap().is_empty());

    let token_holding = investments
        .iter()
        .find(|inv| inv["tokenId"] == token_id.as_str())
        .unwrap();
    assert_eq!(token_holding["assetName"], "HEXU");
}

#[tokio::test]
async fn test_notifications_can_be_marked_read() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;
    let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": 42 });
    send(&app, post_json("/invest/fiat", body, true)).await;

    let (status, body) = send(&app, get_authed("/notifications")).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["read"], false);
    let notification_id = list[0]["id"].as_str().unwrap().to_string();

    let uri = format!("/notifications/{}/read", notification_id);
    let (status, body) = send(&app, post_json(&uri, json!({}), true)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["read"], true);

    let (status, _) = send(&app, post_json("/notifications/missing/read", json!({}), true)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post_json(&uri, json!({}), false)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_waitlist_is_idempotent_per_email() {
    let (app, state) = test_app().await;

    let body = json!({ "email": "Ada@Example.com", "name": "Ada" });
    let (status, json) = send(&app, post_json("/waitlist", body.clone(), false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["email"], "ada@example.com");

    let (status, _) = send(&app, post_json("/waitlist", body, false)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(WaitlistEntry::find().count(&state.db).await.unwrap(), 1);

    let (status, _) = send(&app, post_json("/waitlist", json!({ "email": "nope", "name": "Ada" }), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/waitlist", json!({ "email": "b@c.d", "name": "" }), false)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, get("/api-doc/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "HEX MARKETPLACE API");
    assert!(body["paths"].get("/invest/fiat").is_some());
    assert!(body["paths"].get("/marketplace/{kind}/{id}").is_some());
}

#[tokio::test]
async fn test_rate_limit_rejects_bursts() {
    let base = test_state().await;
    let config = Config {
        rate_limit: Some(RateLimit { per_second: 1, burst: 2 }),
        ..Config::for_tests()
    };
    let app = create_app(hexmarket::AppState::new(base.db.clone(), &config));

    let request = || {
        Request::builder()
            .uri("/health")
            .header("x-forwarded-for", "10.0.0.7")
            .body(Body::empty())
            .unwrap()
    };

    let (first, _) = send(&app, request()).await;
    let (second, _) = send(&app, request()).await;
    let (third, _) = send(&app, request()).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(third, StatusCode::TOO_MANY_REQUESTS);

    // another client still gets through
    let other = Request::builder()
        .uri("/health")
        .header(header::HeaderName::from_static("x-forwarded-for"), "10.0.0.8")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, other).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (app, state) = test_app().await;
    insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 100_000, true, 0).await;
    insert_startup(&state.db, "Ledger", "FinTech", FundingStage::Seed, 100_000, true, 1).await;
    insert_token(&state.db, "Hex Utility", "HEXU", 100_000).await;

    for search in ["_", "%25", "%5C"] {
        let (status, body) = send(&app, get(&format!("/marketplace/startups?search={}", search))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty(), "search={} matched", search);

        let (_, body) = send(&app, get(&format!("/marketplace/tokens?search={}", search))).await;
        assert!(body.as_array().unwrap().is_empty(), "search={} matched", search);
    }

    insert_startup(&state.db, "Zero_Waste", "CleanTech", FundingStage::Seed, 100_000, true, 2).await;
    let (_, body) = send(&app, get("/marketplace/startups?search=o_w")).await;
    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["name"], "Zero_Waste");
}

#[tokio::test]
async fn test_failed_fiat_write_rolls_back() {
    let (app, state) = test_app().await;
    let id = insert_startup(&state.db, "Aurora", "AI", FundingStage::Seed, 1_000_000, true, 0).await;

    // the notification insert is the last write of the request
    state.db.execute_unprepared("DROP TABLE notifications").await.unwrap();

    let body = json!({ "entityId": id, "entityType": "STARTUP", "amount": 1000 });
    let (status, _) = send(&app, post_json("/invest/fiat", body, true)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(PaymentIntent::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_crypto_write_rolls_back() {
    let (app, state) = test_app().await;
    let id = insert_token(&state.db, "Hex Utility", "HEXU", 100_000_000).await;

    state.db.execute_unprepared("DROP TABLE notifications").await.unwrap();

    let body = json!({ "entityId": id, "txHash": "0xdeadbeef01", "amount": 25 });
    let (status, _) = send(&app, post_json("/invest/crypto", body, true)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(Wallet::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(CryptoTx::find().count(&state.db).await.unwrap(), 0);
    assert_eq!(Investment::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_crypto_hash_is_stored_as_submitted() {
    let (app, state) = test_app().await;
    let id = insert_token(&state.db, "Hex Utility", "HEXU", 100_000_000).await;

    let body = json!({ "entityId": id, "txHash": " 0xabc123456 ", "amount": 5 });
    let (status, _) = send(&app, post_json("/invest/crypto", body, true)).await;
    assert_eq!(status, StatusCode::OK);

    let txs = CryptoTx::find().all(&state.db).await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].tx_hash, " 0xabc123456 ");
}
