//! Create fuel_entries table migration

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_cars::Cars;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FuelEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelEntries::CarId).string().not_null())
                    .col(
                        ColumnDef::new(FuelEntries::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelEntries::FuelAmount).double().not_null())
                    .col(ColumnDef::new(FuelEntries::Cost).double().not_null())
                    .col(ColumnDef::new(FuelEntries::Mileage).big_integer().not_null())
                    .col(
                        ColumnDef::new(FuelEntries::FuelType)
                            .string_len(20)
                            .not_null()
                            .default("gasoline"),
                    )
                    .col(ColumnDef::new(FuelEntries::Notes).text().null())
                    .col(ColumnDef::new(FuelEntries::CreatedBy).string().null())
                    .col(
                        ColumnDef::new(FuelEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fuel_entries_car_id")
                            .from(FuelEntries::Table, FuelEntries::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fuel_entries_car_id")
                    .table(FuelEntries::Table)
                    .col(FuelEntries::CarId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FuelEntries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FuelEntries {
    Table,
    Id,
    CarId,
    Date,
    FuelAmount,
    Cost,
    Mileage,
    FuelType,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
