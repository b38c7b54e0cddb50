//! 学年实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_current: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_academic_year(self) -> crate::models::academic::AcademicYear {
        use super::timestamp_to_datetime as ts;

        crate::models::academic::AcademicYear {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            is_current: self.is_current,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
