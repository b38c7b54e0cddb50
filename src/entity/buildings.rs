//! 教学楼实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "buildings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub floors: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rooms::Entity")]
    Rooms,
}

impl Related<super::rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_building(self) -> crate::models::academic::Building {
        use super::timestamp_to_datetime as ts;

        crate::models::academic::Building {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            name: self.name,
            description: self.description,
            floors: self.floors,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
