use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::funding::{self, cents_to_usd};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundingResponse {
    /// Sum of all recorded investments in USD, 0 for unknown ids
    pub amount_raised: f64,
    /// Funding goal in USD, null for unknown ids
    pub funding_goal: Option<f64>,
    /// Raised share of the goal, capped at 100, null for unknown ids
    pub percent_funded: Option<f64>,
}

/// Current amount raised by a startup or token; polled by the funding widget
#[utoipa::path(
    get,
    path = "/funding/{id}",
    params(("id" = String, Path, description = "Startup or token id")),
    responses(
        (status = 200, description = "Amount raised so far", body = FundingResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_funding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FundingResponse>> {
    let snapshot = funding::funding_for(&state.db, &id).await?;

    Ok(Json(FundingResponse {
        amount_raised: cents_to_usd(snapshot.amount_raised_cents),
        funding_goal: snapshot.funding_goal_cents.map(cents_to_usd),
        percent_funded: snapshot.percent_funded(),
    }))
}
