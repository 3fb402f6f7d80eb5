//! Create services table migration

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
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::CarId).string().not_null())
                    .col(ColumnDef::new(Services::Description).text().not_null())
                    .col(
                        ColumnDef::new(Services::Cost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Services::ServiceType)
                            .string_len(20)
                            .not_null()
                            .default("maintenance"),
                    )
                    .col(ColumnDef::new(Services::ServiceProvider).string_len(100).null())
                    .col(
                        ColumnDef::new(Services::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_car_id")
                            .from(Services::Table, Services::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_car_id")
                    .table(Services::Table)
                    .col(Services::CarId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Services {
    Table,
    Id,
    CarId,
    Description,
    Cost,
    ServiceType,
    ServiceProvider,
    Date,
    CreatedAt,
    UpdatedAt,
}
