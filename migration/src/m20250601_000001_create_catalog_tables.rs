use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Startups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Startups::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Startups::Name).string().not_null())
                    .col(ColumnDef::new(Startups::Description).text().not_null())
                    .col(ColumnDef::new(Startups::FundingGoalCents).big_integer().not_null())
                    .col(ColumnDef::new(Startups::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Startups::Industry).string().not_null())
                    .col(ColumnDef::new(Startups::Stage).string().not_null())
                    .col(
                        ColumnDef::new(Startups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tokens::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tokens::Name).string().not_null())
                    .col(ColumnDef::new(Tokens::Description).text().not_null())
                    .col(ColumnDef::new(Tokens::Symbol).string().not_null())
                    .col(ColumnDef::new(Tokens::FundingGoalCents).big_integer().not_null())
                    .col(ColumnDef::new(Tokens::IsApproved).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Tokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Documents::StartupId).string().null())
                    .col(ColumnDef::new(Documents::TokenId).string().null())
                    .col(ColumnDef::new(Documents::Title).string().not_null())
                    .col(ColumnDef::new(Documents::Url).string().not_null())
                    .col(ColumnDef::new(Documents::DocType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_startup")
                            .from(Documents::Table, Documents::StartupId)
                            .to(Startups::Table, Startups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_token")
                            .from(Documents::Table, Documents::TokenId)
                            .to(Tokens::Table, Tokens::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DueDiligenceReports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DueDiligenceReports::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(DueDiligenceReports::StartupId).string().null())
                    .col(ColumnDef::new(DueDiligenceReports::TokenId).string().null())
                    .col(ColumnDef::new(DueDiligenceReports::Summary).text().not_null())
                    .col(ColumnDef::new(DueDiligenceReports::RiskScore).integer().not_null())
                    .col(
                        ColumnDef::new(DueDiligenceReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dd_reports_startup")
                            .from(DueDiligenceReports::Table, DueDiligenceReports::StartupId)
                            .to(Startups::Table, Startups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dd_reports_token")
                            .from(DueDiligenceReports::Table, DueDiligenceReports::TokenId)
                            .to(Tokens::Table, Tokens::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DueDiligenceReports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Startups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    Name,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Startups {
    Table,
    Id,
    Name,
    Description,
    FundingGoalCents,
    IsApproved,
    Industry,
    Stage,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Tokens {
    Table,
    Id,
    Name,
    Description,
    Symbol,
    FundingGoalCents,
    IsApproved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    StartupId,
    TokenId,
    Title,
    Url,
    DocType,
}

#[derive(DeriveIden)]
enum DueDiligenceReports {
    Table,
    Id,
    StartupId,
    TokenId,
    Summary,
    RiskScore,
    CreatedAt,
}
