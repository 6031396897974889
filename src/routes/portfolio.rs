use std::collections::HashMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{
    investment, notification, startup, token, vesting, Investment, Notification, Startup, Token, Vesting,
};
use crate::error::AppResult;
use crate::funding::cents_to_usd;
use crate::routes::notifications::NotificationView;
use crate::session::CurrentUser;
use crate::AppState;

/// Number of notifications shown on the portfolio page
pub const RECENT_NOTIFICATIONS: u64 = 10;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VestingView {
    pub id: String,
    pub cliff_date: DateTime<Utc>,
    pub unlock_date: DateTime<Utc>,
    pub percentage: f64,
}

impl From<vesting::Model> for VestingView {
    fn from(model: vesting::Model) -> Self {
        VestingView {
            id: model.id,
            cliff_date: model.cliff_date,
            unlock_date: model.unlock_date,
            percentage: model.percentage,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInvestment {
    pub id: String,
    /// Amount in USD
    pub amount: f64,
    /// Startup name, or the token symbol for token purchases
    pub asset_name: String,
    pub startup_id: Option<String>,
    pub token_id: Option<String>,
    pub vesting: Vec<VestingView>,
    /// Unlocked share of the first vesting schedule, 100 when there is none
    pub vested_percent: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub investments: Vec<PortfolioInvestment>,
    /// Sum of all investments in USD
    pub total_invested: f64,
    pub notifications: Vec<NotificationView>,
}

/// Linear unlock between cliff and unlock date, in percent.
pub fn vested_percent(schedule: Option<&vesting::Model>, now: DateTime<Utc>) -> f64 {
    let Some(schedule) = schedule else {
        return 100.0;
    };

    let span = (schedule.unlock_date - schedule.cliff_date).num_milliseconds();
    let elapsed = (now - schedule.cliff_date).num_milliseconds();
    if span <= 0 {
        // degenerate schedule: everything unlocks at the cliff
        return if elapsed >= 0 { 100.0 } else { 0.0 };
    }

    (elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

/// The signed-in user's holdings, vesting progress and latest notifications
#[utoipa::path(
    get,
    path = "/portfolio",
    responses(
        (status = 200, description = "Portfolio of the current user", body = PortfolioResponse),
        (status = 401, description = "No session")
    )
)]
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_portfolio(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<PortfolioResponse>> {
    let (investments, notifications) = futures::try_join!(
        Investment::find()
            .filter(investment::Column::UserId.eq(user.id.as_str()))
            .order_by_desc(investment::Column::CreatedAt)
            .all(&state.db),
        Notification::find()
            .filter(notification::Column::UserId.eq(user.id.as_str()))
            .order_by_desc(notification::Column::CreatedAt)
            .limit(RECENT_NOTIFICATIONS)
            .all(&state.db),
    )?;

    let startup_ids: Vec<String> = investments.iter().filter_map(|i| i.startup_id.clone()).collect();
    let token_ids: Vec<String> = investments.iter().filter_map(|i| i.token_id.clone()).collect();
    let investment_ids: Vec<String> = investments.iter().map(|i| i.id.clone()).collect();

    let (startup_names, token_symbols, schedules) = futures::try_join!(
        Startup::find()
            .select_only()
            .column(startup::Column::Id)
            .column(startup::Column::Name)
            .filter(startup::Column::Id.is_in(startup_ids))
            .into_tuple::<(String, String)>()
            .all(&state.db),
        Token::find()
            .select_only()
            .column(token::Column::Id)
            .column(token::Column::Symbol)
            .filter(token::Column::Id.is_in(token_ids))
            .into_tuple::<(String, String)>()
            .all(&state.db),
        Vesting::find()
            .filter(vesting::Column::InvestmentId.is_in(investment_ids))
            .order_by_asc(vesting::Column::CreatedAt)
            .all(&state.db),
    )?;

    let startup_names: HashMap<String, String> = startup_names.into_iter().collect();
    let token_symbols: HashMap<String, String> = token_symbols.into_iter().collect();
    let mut schedules_by_investment: HashMap<String, Vec<vesting::Model>> = HashMap::new();
    for schedule in schedules {
        schedules_by_investment
            .entry(schedule.investment_id.clone())
            .or_default()
            .push(schedule);
    }

    let now = Utc::now();
    let total_cents: i64 = investments.iter().map(|i| i.amount_cents).sum();

    let investments = investments
        .into_iter()
        .map(|inv| {
            let schedules = schedules_by_investment.remove(&inv.id).unwrap_or_default();
            let asset_name = inv
                .startup_id
                .as_ref()
                .and_then(|id| startup_names.get(id))
                .or_else(|| inv.token_id.as_ref().and_then(|id| token_symbols.get(id)))
                .cloned()
                .unwrap_or_default();

            PortfolioInvestment {
                vested_percent: vested_percent(schedules.first(), now),
                vesting: schedules.into_iter().map(VestingView::from).collect(),
                id: inv.id,
                amount: cents_to_usd(inv.amount_cents),
                asset_name,
                startup_id: inv.startup_id,
                token_id: inv.token_id,
                created_at: inv.created_at,
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!("Portfolio has {} investments", investments.len());
    Ok(Json(PortfolioResponse {
        investments,
        total_invested: cents_to_usd(total_cents),
        notifications: notifications.into_iter().map(NotificationView::from).collect(),
    }))
}
