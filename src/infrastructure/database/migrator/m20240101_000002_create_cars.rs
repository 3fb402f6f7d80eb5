//! Create cars table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cars::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cars::Brand).string_len(50).not_null())
                    .col(ColumnDef::new(Cars::Model).string_len(50).not_null())
                    .col(ColumnDef::new(Cars::Year).integer().not_null())
                    .col(ColumnDef::new(Cars::Price).double().not_null())
                    .col(ColumnDef::new(Cars::Color).string_len(30).null())
                    .col(ColumnDef::new(Cars::Mileage).big_integer().null())
                    .col(ColumnDef::new(Cars::Description).text().null())
                    .col(ColumnDef::new(Cars::Image).text().null())
                    .col(ColumnDef::new(Cars::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Cars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Cars::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_owner_id")
                            .from(Cars::Table, Cars::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cars_owner_id")
                    .table(Cars::Table)
                    .col(Cars::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    Brand,
    Model,
    Year,
    Price,
    Color,
    Mileage,
    Description,
    Image,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}
