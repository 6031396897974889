use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::FundingStage;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "startups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub funding_goal_cents: i64,
    pub is_approved: bool,
    pub industry: String,
    pub stage: FundingStage,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment::Entity")]
    Investments,
    #[sea_orm(has_many = "super::document::Entity")]
    Documents,
    #[sea_orm(has_many = "super::due_diligence_report::Entity")]
    DueDiligenceReports,
}

impl Related<super::investment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investments.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl Related<super::due_diligence_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DueDiligenceReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
