//! 教室实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub building_id: Option<i64>,
    pub room_number: String,
    pub capacity: Option<i32>,
    pub room_type: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::buildings::Entity",
        from = "Column::BuildingId",
        to = "super::buildings::Column::Id"
    )]
    Building,
}

impl Related<super::buildings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_room(self) -> crate::models::academic::Room {
        use super::timestamp_to_datetime as ts;

        crate::models::academic::Room {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            building_id: self.building_id,
            room_number: self.room_number,
            capacity: self.capacity,
            room_type: self.room_type,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
