//! Funding progress: amounts raised are a plain sum over investment rows, recomputed on
//! every request.
//!
//! Amounts are stored as integer cents and only converted to floating USD at the JSON edge.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use sea_orm::sea_query::SimpleExpr;

use crate::entities::{investment, EntityType, Investment, Startup, Token};
use crate::error::{AppError, AppResult};

/// Largest accepted single amount, $1 trillion.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000_000;

/// Converts a USD amount from a request body into cents, rounding to the nearest cent.
pub fn usd_to_cents(amount: f64) -> AppResult<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::InvalidRequest(format!(
            "amount must be a positive number, got {}",
            amount
        )));
    }
    let cents = (amount * 100.0).round();
    if cents < 1.0 || cents > MAX_AMOUNT_CENTS as f64 {
        return Err(AppError::InvalidRequest(format!("amount out of range: {}", amount)));
    }
    Ok(cents as i64)
}

pub fn cents_to_usd(cents: i64) -> f64 {
    cents as f64 / 100.0
}

pub fn amount_raised_cents(amounts: &[i64]) -> i64 {
    amounts.iter().sum()
}

/// Share of the goal raised, in percent, never above 100. A non-positive goal counts as 0%.
pub fn percent_funded(raised_cents: i64, goal_cents: i64) -> f64 {
    if goal_cents <= 0 {
        return 0.0;
    }
    let pct = raised_cents as f64 * 100.0 / goal_cents as f64;
    pct.clamp(0.0, 100.0)
}

/// One decimal place, e.g. `35.0%`.
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Dollar amount with thousands separators and no trailing zero cents, e.g. `1,234.5`.
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let digits = (cents / 100).to_string();

    let mut whole = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            whole.push(',');
        }
        whole.push(ch);
    }

    match cents % 100 {
        0 => format!("{}{}", sign, whole),
        frac => {
            let frac = format!("{:02}", frac);
            format!("{}{}.{}", sign, whole, frac.trim_end_matches('0'))
        }
    }
}

/// Raised amount and goal of one entity. `funding_goal_cents` is `None` when the id matched
/// neither a startup nor a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingSnapshot {
    pub entity_type: Option<EntityType>,
    pub amount_raised_cents: i64,
    pub funding_goal_cents: Option<i64>,
}

impl FundingSnapshot {
    pub fn percent_funded(&self) -> Option<f64> {
        self.funding_goal_cents
            .map(|goal| percent_funded(self.amount_raised_cents, goal))
    }
}

async fn sum_investments<C: ConnectionTrait>(db: &C, filter: SimpleExpr) -> AppResult<i64> {
    let amounts: Vec<i64> = Investment::find()
        .select_only()
        .column(investment::Column::AmountCents)
        .filter(filter)
        .into_tuple()
        .all(db)
        .await?;
    Ok(amount_raised_cents(&amounts))
}

/// Sums the investments of whichever startup or token has `id`. Unknown ids yield an
/// empty sum rather than an error.
#[tracing::instrument(skip(db))]
pub async fn funding_for<C: ConnectionTrait>(db: &C, id: &str) -> AppResult<FundingSnapshot> {
    let (startup, token) = futures::try_join!(
        Startup::find_by_id(id.to_string()).one(db),
        Token::find_by_id(id.to_string()).one(db),
    )?;

    let (entity_type, goal, filter) = if let Some(startup) = startup {
        (
            EntityType::Startup,
            startup.funding_goal_cents,
            investment::Column::StartupId.eq(id),
        )
    } else if let Some(token) = token {
        (
            EntityType::Token,
            token.funding_goal_cents,
            investment::Column::TokenId.eq(id),
        )
    } else {
        tracing::debug!("No startup or token with id {}", id);
        return Ok(FundingSnapshot {
            entity_type: None,
            amount_raised_cents: 0,
            funding_goal_cents: None,
        });
    };

    let raised = sum_investments(db, filter).await?;
    Ok(FundingSnapshot {
        entity_type: Some(entity_type),
        amount_raised_cents: raised,
        funding_goal_cents: Some(goal),
    })
}

/// Raised amounts for many entities of one type in a single query, keyed by entity id.
/// Ids without investments are absent from the map.
pub async fn raised_by_entity<C: ConnectionTrait>(
    db: &C,
    entity_type: EntityType,
    ids: &[String],
) -> AppResult<HashMap<String, i64>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let column = match entity_type {
        EntityType::Startup => investment::Column::StartupId,
        EntityType::Token => investment::Column::TokenId,
    };

    let rows: Vec<(Option<String>, i64)> = Investment::find()
        .select_only()
        .column(column)
        .column(investment::Column::AmountCents)
        .filter(column.is_in(ids.iter().cloned()))
        .into_tuple()
        .all(db)
        .await?;

    let mut raised: HashMap<String, i64> = HashMap::new();
    for (entity_id, amount) in rows {
        if let Some(entity_id) = entity_id {
            *raised.entry(entity_id).or_insert(0) += amount;
        }
    }
    Ok(raised)
}
