use sea_orm_migration::prelude::*;

use crate::common::Common;
use crate::m20260301_000001_create_core_tables::Organizations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 操作日志只追加，不做软删除；用户删除后日志保留原 user_id
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Common::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Common::OrganizationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Common::SchoolId).big_integer().null())
                    .col(ColumnDef::new(ActivityLogs::UserId).big_integer().null())
                    .col(ColumnDef::new(ActivityLogs::Event).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::SubjectType).string().not_null())
                    .col(
                        ColumnDef::new(ActivityLogs::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivityLogs::Description).text().not_null())
                    .col(ColumnDef::new(ActivityLogs::Properties).text().null())
                    .col(ColumnDef::new(Common::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActivityLogs::Table, Common::OrganizationId)
                            .to(Organizations::Table, Common::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_organization_created")
                    .table(ActivityLogs::Table)
                    .col(Common::OrganizationId)
                    .col(Common::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_subject")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::SubjectType)
                    .col(ActivityLogs::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    UserId,
    Event,
    SubjectType,
    SubjectId,
    Description,
    Properties,
}
