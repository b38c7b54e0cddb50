//! 各业务表共用的列定义

use sea_orm_migration::prelude::*;

/// 租户与时间戳列
#[derive(DeriveIden)]
pub enum Common {
    Id,
    OrganizationId,
    SchoolId,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

pub trait TableExt {
    /// 自增主键
    fn id(&mut self) -> &mut Self;
    /// organization_id + school_id
    fn tenant(&mut self) -> &mut Self;
    /// created_at + updated_at
    fn timestamps(&mut self) -> &mut Self;
    /// deleted_at
    fn soft_delete(&mut self) -> &mut Self;
}

impl TableExt for TableCreateStatement {
    fn id(&mut self) -> &mut Self {
        self.col(
            ColumnDef::new(Common::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
    }

    fn tenant(&mut self) -> &mut Self {
        self.col(
            ColumnDef::new(Common::OrganizationId)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(Common::SchoolId).big_integer().not_null())
    }

    fn timestamps(&mut self) -> &mut Self {
        self.col(ColumnDef::new(Common::CreatedAt).big_integer().not_null())
            .col(ColumnDef::new(Common::UpdatedAt).big_integer().not_null())
    }

    fn soft_delete(&mut self) -> &mut Self {
        self.col(ColumnDef::new(Common::DeletedAt).big_integer().null())
    }
}

/// 租户范围索引 (organization_id, school_id)
pub fn tenant_index<T>(name: &str, table: T) -> IndexCreateStatement
where
    T: IntoIden,
{
    Index::create()
        .if_not_exists()
        .name(name)
        .table(table)
        .col(Common::OrganizationId)
        .col(Common::SchoolId)
        .to_owned()
}
