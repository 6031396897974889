use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "INVESTOR")]
    Investor,
    #[sea_orm(string_value = "FOUNDER")]
    Founder,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingStage {
    #[sea_orm(string_value = "PRE_SEED")]
    PreSeed,
    #[sea_orm(string_value = "SEED")]
    Seed,
    #[sea_orm(string_value = "SERIES_A")]
    SeriesA,
    #[sea_orm(string_value = "SERIES_B")]
    SeriesB,
    #[sea_orm(string_value = "SERIES_C")]
    SeriesC,
}

impl FundingStage {
    /// Label shown on marketplace cards, e.g. "Series A".
    pub fn label(&self) -> &'static str {
        match self {
            FundingStage::PreSeed => "Pre-Seed",
            FundingStage::Seed => "Seed",
            FundingStage::SeriesA => "Series A",
            FundingStage::SeriesB => "Series B",
            FundingStage::SeriesC => "Series C",
        }
    }
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts both the stored form (`SERIES_A`) and the label form (`Series A`).
impl FromStr for FundingStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "PRE_SEED" | "PRESEED" => Ok(FundingStage::PreSeed),
            "SEED" => Ok(FundingStage::Seed),
            "SERIES_A" => Ok(FundingStage::SeriesA),
            "SERIES_B" => Ok(FundingStage::SeriesB),
            "SERIES_C" => Ok(FundingStage::SeriesC),
            _ => Err(format!("unknown funding stage: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "SUCCEEDED")]
    Succeeded,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Which kind of offering an investment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    #[sea_orm(string_value = "STARTUP")]
    Startup,
    #[sea_orm(string_value = "TOKEN")]
    Token,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Startup => "STARTUP",
            EntityType::Token => "TOKEN",
        }
    }
}

/// Path segment form used by `/marketplace/{kind}/{id}`.
impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "startup" => Ok(EntityType::Startup),
            "token" => Ok(EntityType::Token),
            _ => Err(format!("unknown entity type: {}", s)),
        }
    }
}
