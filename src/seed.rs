//! Demo catalog used by the `hexmarket-seed` binary.

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait};

use crate::entities::{document, due_diligence_report, startup, token, FundingStage, Startup, Token};
use crate::error::AppResult;

struct DemoStartup {
    name: &'static str,
    description: &'static str,
    industry: &'static str,
    stage: FundingStage,
    goal_usd: i64,
    approved: bool,
    risk_score: i32,
}

struct DemoToken {
    name: &'static str,
    symbol: &'static str,
    description: &'static str,
    goal_usd: i64,
    risk_score: i32,
}

const DEMO_STARTUPS: &[DemoStartup] = &[
    DemoStartup {
        name: "Aurora Labs",
        description: "Foundation models for industrial maintenance forecasting.",
        industry: "AI",
        stage: FundingStage::Seed,
        goal_usd: 500_000,
        approved: true,
        risk_score: 42,
    },
    DemoStartup {
        name: "LedgerLeaf",
        description: "Automated bookkeeping for independent retailers.",
        industry: "FinTech",
        stage: FundingStage::SeriesA,
        goal_usd: 2_000_000,
        approved: true,
        risk_score: 35,
    },
    DemoStartup {
        name: "PulseBridge",
        description: "Remote cardiac monitoring for rural clinics.",
        industry: "HealthTech",
        stage: FundingStage::SeriesB,
        goal_usd: 5_000_000,
        approved: true,
        risk_score: 28,
    },
    DemoStartup {
        name: "Quill Robotics",
        description: "Warehouse picking arms with vision guided grasping.",
        industry: "AI",
        stage: FundingStage::PreSeed,
        goal_usd: 250_000,
        approved: false,
        risk_score: 71,
    },
];

const DEMO_TOKENS: &[DemoToken] = &[
    DemoToken {
        name: "Hex Utility Token",
        symbol: "HEXU",
        description: "Fee discounts and governance votes on the Hex marketplace.",
        goal_usd: 1_000_000,
        risk_score: 55,
    },
    DemoToken {
        name: "Solar Yield Share",
        symbol: "SOLY",
        description: "Tokenized revenue share of a community solar array.",
        goal_usd: 750_000,
        risk_score: 48,
    },
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub startups: usize,
    pub tokens: usize,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Inserts the demo catalog unless any startup or token already exists.
pub async fn seed_demo_catalog(db: &DatabaseConnection) -> AppResult<SeedSummary> {
    let existing = Startup::find().count(db).await? + Token::find().count(db).await?;
    if existing > 0 {
        tracing::info!("Catalog already has {} entries, skipping seed", existing);
        return Ok(SeedSummary::default());
    }

    let txn = db.begin().await?;
    let now = Utc::now();
    let mut summary = SeedSummary::default();

    // staggered timestamps keep "newest first" stable
    for (i, demo) in DEMO_STARTUPS.iter().enumerate() {
        let created_at = now - Duration::hours(i as i64);
        let id = new_id();
        startup::ActiveModel {
            id: Set(id.clone()),
            name: Set(demo.name.to_string()),
            description: Set(demo.description.to_string()),
            funding_goal_cents: Set(demo.goal_usd * 100),
            is_approved: Set(demo.approved),
            industry: Set(demo.industry.to_string()),
            stage: Set(demo.stage),
            created_at: Set(created_at),
        }
        .insert(&txn)
        .await?;

        document::ActiveModel {
            id: Set(new_id()),
            startup_id: Set(Some(id.clone())),
            token_id: Set(None),
            title: Set(format!("{} pitch deck", demo.name)),
            url: Set(format!("https://example.com/docs/{}/deck.pdf", id)),
            doc_type: Set("PITCH_DECK".to_string()),
        }
        .insert(&txn)
        .await?;

        due_diligence_report::ActiveModel {
            id: Set(new_id()),
            startup_id: Set(Some(id)),
            token_id: Set(None),
            summary: Set(format!("{} stage {} company with a clear go-to-market.", demo.stage, demo.industry)),
            risk_score: Set(demo.risk_score),
            created_at: Set(created_at),
        }
        .insert(&txn)
        .await?;

        summary.startups += 1;
    }

    for (i, demo) in DEMO_TOKENS.iter().enumerate() {
        let created_at = now - Duration::hours(i as i64);
        let id = new_id();
        token::ActiveModel {
            id: Set(id.clone()),
            name: Set(demo.name.to_string()),
            description: Set(demo.description.to_string()),
            symbol: Set(demo.symbol.to_string()),
            funding_goal_cents: Set(demo.goal_usd * 100),
            is_approved: Set(true),
            created_at: Set(created_at),
        }
        .insert(&txn)
        .await?;

        document::ActiveModel {
            id: Set(new_id()),
            startup_id: Set(None),
            token_id: Set(Some(id.clone())),
            title: Set(format!("{} whitepaper", demo.symbol)),
            url: Set(format!("https://example.com/docs/{}/whitepaper.pdf", id)),
            doc_type: Set("WHITEPAPER".to_string()),
        }
        .insert(&txn)
        .await?;

        due_diligence_report::ActiveModel {
            id: Set(new_id()),
            startup_id: Set(None),
            token_id: Set(Some(id)),
            summary: Set(format!("{} tokenomics reviewed; vesting schedule published.", demo.symbol)),
            risk_score: Set(demo.risk_score),
            created_at: Set(created_at),
        }
        .insert(&txn)
        .await?;

        summary.tokens += 1;
    }

    txn.commit().await?;
    tracing::info!(
        startups = summary.startups,
        tokens = summary.tokens,
        "Seeded demo catalog"
    );
    Ok(summary)
}
