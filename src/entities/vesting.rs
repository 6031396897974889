use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vestings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub investment_id: String,
    pub cliff_date: DateTimeUtc,
    pub unlock_date: DateTimeUtc,
    #[sea_orm(column_type = "Double")]
    pub percentage: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investment::Entity",
        from = "Column::InvestmentId",
        to = "super::investment::Column::Id",
        on_delete = "Cascade"
    )]
    Investment,
}

impl Related<super::investment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
