//! Records simulated investments.
//!
//! Nothing here touches a payment rail: the intent or crypto transaction is stored with a
//! forced `SUCCEEDED` status. All rows of one request are written in a single transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde_json::json;

use crate::entities::{
    crypto_tx, investment, notification, payment_intent, wallet, EntityType, PaymentStatus, Startup, Token,
    Wallet,
};
use crate::error::{AppError, AppResult};
use crate::funding::format_usd;
use crate::session::{ensure_user, SessionUser};

pub const FIAT_PROVIDER: &str = "stripe-demo";
pub const DEFAULT_WALLET_ADDRESS: &str = "0xDemoWallet";
pub const DEFAULT_CHAIN: &str = "POLYGON";

pub const INVESTMENT_CONFIRMED: &str = "INVESTMENT_CONFIRMED";
pub const TOKEN_PURCHASE_CONFIRMED: &str = "TOKEN_PURCHASE_CONFIRMED";

#[derive(Debug, Clone)]
pub struct FiatInvestment {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub amount_cents: i64,
}

#[derive(Debug, Clone)]
pub struct CryptoPurchase {
    pub token_id: String,
    pub tx_hash: String,
    pub amount_cents: i64,
    pub wallet_address: Option<String>,
    pub chain: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FiatReceipt {
    pub intent: payment_intent::Model,
    pub investment: investment::Model,
}

#[derive(Debug, Clone)]
pub struct CryptoReceipt {
    pub wallet: wallet::Model,
    pub crypto_tx: crypto_tx::Model,
    pub investment: investment::Model,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Last six characters of a transaction hash, as shown in notifications.
pub fn hash_suffix(tx_hash: &str) -> String {
    let count = tx_hash.chars().count();
    tx_hash.chars().skip(count.saturating_sub(6)).collect()
}

async fn ensure_entity_exists<C: ConnectionTrait>(db: &C, entity_type: EntityType, id: &str) -> AppResult<()> {
    let exists = match entity_type {
        EntityType::Startup => Startup::find_by_id(id.to_string()).one(db).await?.is_some(),
        EntityType::Token => Token::find_by_id(id.to_string()).one(db).await?.is_some(),
    };
    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{} {}", entity_type.as_str().to_lowercase(), id)))
    }
}

fn investment_row(
    user: &SessionUser,
    entity_type: EntityType,
    entity_id: &str,
    amount_cents: i64,
) -> investment::ActiveModel {
    let (startup_id, token_id) = match entity_type {
        EntityType::Startup => (Some(entity_id.to_string()), None),
        EntityType::Token => (None, Some(entity_id.to_string())),
    };
    investment::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.id.clone()),
        startup_id: Set(startup_id),
        token_id: Set(token_id),
        amount_cents: Set(amount_cents),
        ownership: Set(0.0),
        created_at: Set(Utc::now()),
    }
}

fn notification_row(user: &SessionUser, kind: &str, message: String) -> notification::ActiveModel {
    notification::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.id.clone()),
        kind: Set(kind.to_string()),
        message: Set(message),
        read: Set(false),
        created_at: Set(Utc::now()),
    }
}

/// Stores an auto-succeeded card payment intent, the investment and a confirmation
/// notification.
#[tracing::instrument(skip(db, user), fields(user_id = %user.id))]
pub async fn record_fiat(
    db: &DatabaseConnection,
    user: &SessionUser,
    request: FiatInvestment,
) -> AppResult<FiatReceipt> {
    let txn = db.begin().await?;

    ensure_entity_exists(&txn, request.entity_type, &request.entity_id).await?;
    ensure_user(&txn, user).await?;

    let now = Utc::now();
    let intent = payment_intent::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.id.clone()),
        provider: Set(FIAT_PROVIDER.to_string()),
        provider_id: Set(format!("pi_demo_{}", now.timestamp_millis())),
        amount_cents: Set(request.amount_cents),
        status: Set(PaymentStatus::Succeeded),
        metadata: Set(Some(json!({
            "entityId": request.entity_id,
            "entityType": request.entity_type.as_str(),
        }))),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let investment = investment_row(user, request.entity_type, &request.entity_id, request.amount_cents)
        .insert(&txn)
        .await?;

    notification_row(
        user,
        INVESTMENT_CONFIRMED,
        format!("Demo fiat investment of ${} recorded", format_usd(request.amount_cents)),
    )
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        investment_id = %investment.id,
        amount_cents = request.amount_cents,
        "Recorded demo fiat investment"
    );
    Ok(FiatReceipt { intent, investment })
}

/// Returns the wallet registered under (`chain`, `address`), creating it for `user` first
/// if needed.
async fn wallet_for<C: ConnectionTrait>(
    db: &C,
    user: &SessionUser,
    chain: &str,
    address: &str,
) -> AppResult<wallet::Model> {
    let existing = Wallet::find()
        .filter(wallet::Column::Chain.eq(chain))
        .filter(wallet::Column::Address.eq(address))
        .one(db)
        .await?;
    if let Some(wallet) = existing {
        return Ok(wallet);
    }

    let wallet = wallet::ActiveModel {
        id: Set(new_id()),
        user_id: Set(user.id.clone()),
        address: Set(address.to_string()),
        chain: Set(chain.to_string()),
    }
    .insert(db)
    .await?;
    Ok(wallet)
}

/// Logs a test-net token purchase against the user's wallet, then stores the investment and
/// a confirmation notification. The hash is stored exactly as submitted.
#[tracing::instrument(skip(db, user), fields(user_id = %user.id))]
pub async fn record_crypto(
    db: &DatabaseConnection,
    user: &SessionUser,
    request: CryptoPurchase,
) -> AppResult<CryptoReceipt> {
    if request.tx_hash.trim().is_empty() {
        return Err(AppError::InvalidRequest("txHash must not be empty".to_string()));
    }

    let txn = db.begin().await?;

    ensure_entity_exists(&txn, EntityType::Token, &request.token_id).await?;
    ensure_user(&txn, user).await?;

    let chain = request.chain.as_deref().unwrap_or(DEFAULT_CHAIN);
    let address = request.wallet_address.as_deref().unwrap_or(DEFAULT_WALLET_ADDRESS);
    let wallet = wallet_for(&txn, user, chain, address).await?;

    let crypto_tx = crypto_tx::ActiveModel {
        id: Set(new_id()),
        wallet_id: Set(wallet.id.clone()),
        entity_type: Set(EntityType::Token),
        entity_id: Set(request.token_id.clone()),
        tx_hash: Set(request.tx_hash.clone()),
        amount_cents: Set(request.amount_cents),
        status: Set(PaymentStatus::Succeeded),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;

    let investment = investment_row(user, EntityType::Token, &request.token_id, request.amount_cents)
        .insert(&txn)
        .await?;

    notification_row(
        user,
        TOKEN_PURCHASE_CONFIRMED,
        format!("Demo token purchase confirmed (hash ending {}).", hash_suffix(&request.tx_hash)),
    )
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        investment_id = %investment.id,
        wallet_id = %wallet.id,
        "Recorded demo token purchase"
    );
    Ok(CryptoReceipt {
        wallet,
        crypto_tx,
        investment,
    })
}
