use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{investment, payment_intent, EntityType, PaymentStatus};
use crate::error::AppResult;
use crate::funding::{cents_to_usd, usd_to_cents};
use crate::investments::{self, CryptoPurchase, FiatInvestment};
use crate::session::CurrentUser;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiatInvestRequest {
    /// Startup or token id
    entity_id: String,
    entity_type: EntityType,
    /// Amount in USD
    amount: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CryptoInvestRequest {
    /// Token id
    entity_id: String,
    /// Test-net transaction hash
    tx_hash: String,
    /// USD equivalent of the purchase
    amount: f64,
    /// Optional: wallet address, defaults to the shared demo wallet
    #[serde(default)]
    wallet_address: Option<String>,
    /// Optional: chain name (default: POLYGON)
    #[serde(default)]
    chain: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentView {
    pub id: String,
    pub user_id: String,
    pub startup_id: Option<String>,
    pub token_id: Option<String>,
    /// Amount in USD
    pub amount: f64,
    /// Always 0 for demo investments
    pub ownership: f64,
    pub created_at: DateTime<Utc>,
}

impl From<investment::Model> for InvestmentView {
    fn from(model: investment::Model) -> Self {
        InvestmentView {
            id: model.id,
            user_id: model.user_id,
            startup_id: model.startup_id,
            token_id: model.token_id,
            amount: cents_to_usd(model.amount_cents),
            ownership: model.ownership,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentView {
    pub id: String,
    pub provider: String,
    pub provider_id: String,
    /// Amount in USD
    pub amount: f64,
    pub status: PaymentStatus,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<payment_intent::Model> for PaymentIntentView {
    fn from(model: payment_intent::Model) -> Self {
        PaymentIntentView {
            id: model.id,
            provider: model.provider,
            provider_id: model.provider_id,
            amount: cents_to_usd(model.amount_cents),
            status: model.status,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FiatInvestResponse {
    pub intent: PaymentIntentView,
    pub investment: InvestmentView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CryptoInvestResponse {
    pub investment: InvestmentView,
}

/// Record a demo card investment. The payment intent is stored as already succeeded.
#[utoipa::path(
    post,
    path = "/invest/fiat",
    request_body = FiatInvestRequest,
    responses(
        (status = 200, description = "Investment recorded", body = FiatInvestResponse),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "No session"),
        (status = 404, description = "Unknown startup or token")
    )
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.id, entity_id = %request.entity_id))]
pub async fn invest_fiat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<FiatInvestRequest>,
) -> AppResult<Json<FiatInvestResponse>> {
    let amount_cents = usd_to_cents(request.amount)?;

    let receipt = investments::record_fiat(
        &state.db,
        &user,
        FiatInvestment {
            entity_id: request.entity_id,
            entity_type: request.entity_type,
            amount_cents,
        },
    )
    .await?;

    Ok(Json(FiatInvestResponse {
        intent: receipt.intent.into(),
        investment: receipt.investment.into(),
    }))
}

/// Record a demo token purchase made from a (test-net) wallet
#[utoipa::path(
    post,
    path = "/invest/crypto",
    request_body = CryptoInvestRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = CryptoInvestResponse),
        (status = 400, description = "Invalid amount or empty transaction hash"),
        (status = 401, description = "No session"),
        (status = 404, description = "Unknown token")
    )
)]
#[tracing::instrument(skip(state, user, request), fields(user_id = %user.id, entity_id = %request.entity_id))]
pub async fn invest_crypto(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CryptoInvestRequest>,
) -> AppResult<Json<CryptoInvestResponse>> {
    let amount_cents = usd_to_cents(request.amount)?;

    let receipt = investments::record_crypto(
        &state.db,
        &user,
        CryptoPurchase {
            token_id: request.entity_id,
            tx_hash: request.tx_hash,
            amount_cents,
            wallet_address: request.wallet_address,
            chain: request.chain,
        },
    )
    .await?;

    Ok(Json(CryptoInvestResponse {
        investment: receipt.investment.into(),
    }))
}
