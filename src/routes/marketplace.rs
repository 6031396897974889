use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{
    document, due_diligence_report, startup, token, Document, DueDiligenceReport, EntityType, FundingStage,
    Startup, Token,
};
use crate::error::{AppError, AppResult};
use crate::funding::{self, cents_to_usd, format_percent, percent_funded};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StartupFilters {
    /// Optional: exact industry, e.g. `FinTech`
    #[serde(default)]
    #[param(required = false)]
    industry: Option<String>,
    /// Optional: funding stage, e.g. `Seed` or `SERIES_A`
    #[serde(default)]
    #[param(required = false)]
    stage: Option<String>,
    /// Optional: case-insensitive substring of the startup name
    #[serde(default)]
    #[param(required = false)]
    search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TokenFilters {
    /// Optional: case-insensitive substring of the token name or symbol
    #[serde(default)]
    #[param(required = false)]
    search: Option<String>,
}

/// Marketplace card for a startup or token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityCard {
    pub id: String,
    pub kind: EntityType,
    pub name: String,
    pub description: String,
    /// Funding goal in USD
    pub funding_goal: f64,
    /// Sum of all recorded investments in USD
    pub amount_raised: f64,
    /// Raised share of the goal, capped at 100
    pub percent_funded: f64,
    /// `percent_funded` with one decimal, e.g. `35.0%`
    pub percent_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<FundingStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EntityCard {
    fn from_startup(startup: startup::Model, raised_cents: i64) -> Self {
        let pct = percent_funded(raised_cents, startup.funding_goal_cents);
        EntityCard {
            id: startup.id,
            kind: EntityType::Startup,
            name: startup.name,
            description: startup.description,
            funding_goal: cents_to_usd(startup.funding_goal_cents),
            amount_raised: cents_to_usd(raised_cents),
            percent_funded: pct,
            percent_label: format_percent(pct),
            industry: Some(startup.industry),
            stage: Some(startup.stage),
            symbol: None,
            created_at: startup.created_at,
        }
    }

    fn from_token(token: token::Model, raised_cents: i64) -> Self {
        let pct = percent_funded(raised_cents, token.funding_goal_cents);
        EntityCard {
            id: token.id,
            kind: EntityType::Token,
            name: token.name,
            description: token.description,
            funding_goal: cents_to_usd(token.funding_goal_cents),
            amount_raised: cents_to_usd(raised_cents),
            percent_funded: pct,
            percent_label: format_percent(pct),
            industry: None,
            stage: None,
            symbol: Some(token.symbol),
            created_at: token.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: String,
    pub title: String,
    pub url: String,
    pub doc_type: String,
}

impl From<document::Model> for DocumentView {
    fn from(doc: document::Model) -> Self {
        DocumentView {
            id: doc.id,
            title: doc.title,
            url: doc.url,
            doc_type: doc.doc_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DueDiligenceView {
    pub id: String,
    pub summary: String,
    /// 0 (low risk) to 100
    pub risk_score: i32,
    pub created_at: DateTime<Utc>,
}

impl From<due_diligence_report::Model> for DueDiligenceView {
    fn from(report: due_diligence_report::Model) -> Self {
        DueDiligenceView {
            id: report.id,
            summary: report.summary,
            risk_score: report.risk_score,
            created_at: report.created_at,
        }
    }
}

/// Everything the entity page shows
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetail {
    #[serde(flatten)]
    pub card: EntityCard,
    pub documents: Vec<DocumentView>,
    pub due_diligence_reports: Vec<DueDiligenceView>,
}

/// Empty query values behave like absent ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `needle` with LIKE wildcards escaped, so it only matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive substring match.
fn lower_contains(column: SimpleExpr, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(column)).like(LikeExpr::new(pattern).escape('\\'))
}

/// List approved startups, newest first, with their funding progress
#[utoipa::path(
    get,
    path = "/marketplace/startups",
    params(StartupFilters),
    responses(
        (status = 200, description = "Approved startups matching the filters", body = Vec<EntityCard>),
        (status = 400, description = "Unknown funding stage")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_startups(
    State(state): State<AppState>,
    Query(filters): Query<StartupFilters>,
) -> AppResult<Json<Vec<EntityCard>>> {
    let mut condition = Condition::all().add(startup::Column::IsApproved.eq(true));

    if let Some(industry) = non_empty(filters.industry) {
        condition = condition.add(startup::Column::Industry.eq(industry));
    }
    if let Some(stage) = non_empty(filters.stage) {
        let stage: FundingStage = stage.parse().map_err(AppError::InvalidRequest)?;
        condition = condition.add(startup::Column::Stage.eq(stage));
    }
    if let Some(search) = non_empty(filters.search) {
        condition = condition.add(lower_contains(Expr::col((Startup, startup::Column::Name)).into(), &search));
    }

    let startups = Startup::find()
        .filter(condition)
        .order_by_desc(startup::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let ids: Vec<String> = startups.iter().map(|s| s.id.clone()).collect();
    let raised = funding::raised_by_entity(&state.db, EntityType::Startup, &ids).await?;

    tracing::info!("Found {} startups", startups.len());
    let cards = startups
        .into_iter()
        .map(|s| {
            let raised_cents = raised.get(&s.id).copied().unwrap_or(0);
            EntityCard::from_startup(s, raised_cents)
        })
        .collect();
    Ok(Json(cards))
}

/// List approved tokens, newest first, with their funding progress
#[utoipa::path(
    get,
    path = "/marketplace/tokens",
    params(TokenFilters),
    responses(
        (status = 200, description = "Approved tokens matching the search", body = Vec<EntityCard>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_tokens(
    State(state): State<AppState>,
    Query(filters): Query<TokenFilters>,
) -> AppResult<Json<Vec<EntityCard>>> {
    let mut condition = Condition::all().add(token::Column::IsApproved.eq(true));

    if let Some(search) = non_empty(filters.search) {
        condition = condition.add(
            Condition::any()
                .add(lower_contains(Expr::col((Token, token::Column::Name)).into(), &search))
                .add(lower_contains(Expr::col((Token, token::Column::Symbol)).into(), &search)),
        );
    }

    let tokens = Token::find()
        .filter(condition)
        .order_by_desc(token::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let ids: Vec<String> = tokens.iter().map(|t| t.id.clone()).collect();
    let raised = funding::raised_by_entity(&state.db, EntityType::Token, &ids).await?;

    let cards = tokens
        .into_iter()
        .map(|t| {
            let raised_cents = raised.get(&t.id).copied().unwrap_or(0);
            EntityCard::from_token(t, raised_cents)
        })
        .collect();
    Ok(Json(cards))
}

/// Entity page: card data plus documents and due-diligence reports
#[utoipa::path(
    get,
    path = "/marketplace/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "`startup` or `token`"),
        ("id" = String, Path, description = "Entity id")
    ),
    responses(
        (status = 200, description = "Entity found", body = EntityDetail),
        (status = 404, description = "No such entity")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_entity(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> AppResult<Json<EntityDetail>> {
    let kind: EntityType = kind
        .parse()
        .map_err(|_| AppError::NotFound(format!("{} {}", kind, id)))?;
    let not_found = || AppError::NotFound(format!("{} {}", kind.as_str().to_lowercase(), id));

    let (card, documents, reports) = match kind {
        EntityType::Startup => {
            let startup = Startup::find_by_id(id.clone())
                .one(&state.db)
                .await?
                .ok_or_else(not_found)?;
            let (documents, reports) = futures::try_join!(
                Document::find()
                    .filter(document::Column::StartupId.eq(id.as_str()))
                    .all(&state.db),
                DueDiligenceReport::find()
                    .filter(due_diligence_report::Column::StartupId.eq(id.as_str()))
                    .order_by_desc(due_diligence_report::Column::CreatedAt)
                    .all(&state.db),
            )?;
            let snapshot = funding::funding_for(&state.db, &id).await?;
            (
                EntityCard::from_startup(startup, snapshot.amount_raised_cents),
                documents,
                reports,
            )
        }
        EntityType::Token => {
            let token = Token::find_by_id(id.clone())
                .one(&state.db)
                .await?
                .ok_or_else(not_found)?;
            let (documents, reports) = futures::try_join!(
                Document::find()
                    .filter(document::Column::TokenId.eq(id.as_str()))
                    .all(&state.db),
                DueDiligenceReport::find()
                    .filter(due_diligence_report::Column::TokenId.eq(id.as_str()))
                    .order_by_desc(due_diligence_report::Column::CreatedAt)
                    .all(&state.db),
            )?;
            let snapshot = funding::funding_for(&state.db, &id).await?;
            (
                EntityCard::from_token(token, snapshot.amount_raised_cents),
                documents,
                reports,
            )
        }
    };

    Ok(Json(EntityDetail {
        card,
        documents: documents.into_iter().map(DocumentView::from).collect(),
        due_diligence_reports: reports.into_iter().map(DueDiligenceView::from).collect(),
    }))
}
