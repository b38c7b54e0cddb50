//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::academic::Subject {
        use super::timestamp_to_datetime as ts;

        crate::models::academic::Subject {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            name: self.name,
            code: self.code,
            description: self.description,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
