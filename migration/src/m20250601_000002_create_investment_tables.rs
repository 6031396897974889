use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_catalog_tables::{Startups, Tokens, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Investments::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Investments::UserId).string().not_null())
                    .col(ColumnDef::new(Investments::StartupId).string().null())
                    .col(ColumnDef::new(Investments::TokenId).string().null())
                    .col(ColumnDef::new(Investments::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Investments::Ownership).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Investments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_user")
                            .from(Investments::Table, Investments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_startup")
                            .from(Investments::Table, Investments::StartupId)
                            .to(Startups::Table, Startups::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_token")
                            .from(Investments::Table, Investments::TokenId)
                            .to(Tokens::Table, Tokens::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Funding progress filters on these on every poll
        manager
            .create_index(
                Index::create()
                    .name("idx_investments_startup_id")
                    .table(Investments::Table)
                    .col(Investments::StartupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_investments_token_id")
                    .table(Investments::Table)
                    .col(Investments::TokenId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vestings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vestings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Vestings::InvestmentId).string().not_null())
                    .col(ColumnDef::new(Vestings::CliffDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Vestings::UnlockDate).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Vestings::Percentage).double().not_null())
                    .col(
                        ColumnDef::new(Vestings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vestings_investment")
                            .from(Vestings::Table, Vestings::InvestmentId)
                            .to(Investments::Table, Investments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentIntents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentIntents::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(PaymentIntents::UserId).string().not_null())
                    .col(ColumnDef::new(PaymentIntents::Provider).string().not_null())
                    .col(ColumnDef::new(PaymentIntents::ProviderId).string().not_null())
                    .col(ColumnDef::new(PaymentIntents::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(PaymentIntents::Status).string().not_null())
                    .col(ColumnDef::new(PaymentIntents::Metadata).json_binary().null())
                    .col(
                        ColumnDef::new(PaymentIntents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_intents_user")
                            .from(PaymentIntents::Table, PaymentIntents::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Wallets::UserId).string().not_null())
                    .col(ColumnDef::new(Wallets::Address).string().not_null())
                    .col(ColumnDef::new(Wallets::Chain).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallets_user")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_wallets_chain_address")
                    .table(Wallets::Table)
                    .col(Wallets::Chain)
                    .col(Wallets::Address)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CryptoTxs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CryptoTxs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CryptoTxs::WalletId).string().not_null())
                    .col(ColumnDef::new(CryptoTxs::EntityType).string().not_null())
                    .col(ColumnDef::new(CryptoTxs::EntityId).string().not_null())
                    .col(ColumnDef::new(CryptoTxs::TxHash).string().not_null())
                    .col(ColumnDef::new(CryptoTxs::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(CryptoTxs::Status).string().not_null())
                    .col(
                        ColumnDef::new(CryptoTxs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crypto_txs_wallet")
                            .from(CryptoTxs::Table, CryptoTxs::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notifications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::Read).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CryptoTxs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentIntents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vestings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Investments {
    Table,
    Id,
    UserId,
    StartupId,
    TokenId,
    AmountCents,
    Ownership,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vestings {
    Table,
    Id,
    InvestmentId,
    CliffDate,
    UnlockDate,
    Percentage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentIntents {
    Table,
    Id,
    UserId,
    Provider,
    ProviderId,
    AmountCents,
    Status,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Wallets {
    Table,
    Id,
    UserId,
    Address,
    Chain,
}

#[derive(DeriveIden)]
enum CryptoTxs {
    Table,
    Id,
    WalletId,
    EntityType,
    EntityId,
    TxHash,
    AmountCents,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Kind,
    Message,
    Read,
    CreatedAt,
}
