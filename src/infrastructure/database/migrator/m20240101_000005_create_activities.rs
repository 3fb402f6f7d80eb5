//! Create activities table migration

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::Action).string_len(32).not_null())
                    .col(ColumnDef::new(Activities::EntityType).string_len(32).not_null())
                    .col(ColumnDef::new(Activities::EntityId).string().null())
                    .col(ColumnDef::new(Activities::UserId).string().null())
                    .col(
                        ColumnDef::new(Activities::Details)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(Activities::UserAgent).text().null())
                    .col(ColumnDef::new(Activities::Url).text().null())
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Stats and list queries filter on these
        manager
            .create_index(
                Index::create()
                    .name("idx_activities_created_at")
                    .table(Activities::Table)
                    .col(Activities::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_user_id")
                    .table(Activities::Table)
                    .col(Activities::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Activities {
    Table,
    Id,
    Action,
    EntityType,
    EntityId,
    UserId,
    Details,
    UserAgent,
    Url,
    CreatedAt,
}
