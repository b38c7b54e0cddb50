//! 宿舍房间实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hostel_rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub hostel_name: String,
    pub room_number: String,
    pub floor: Option<i32>,
    pub capacity: i32,
    pub occupied: i32,
    pub room_type: Option<String>,
    pub monthly_fee: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hostel_allocations::Entity")]
    Allocations,
}

impl Related<super::hostel_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Allocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_room(self) -> crate::models::hostel::HostelRoom {
        use super::timestamp_to_datetime as ts;

        crate::models::hostel::HostelRoom {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            hostel_name: self.hostel_name,
            room_number: self.room_number,
            floor: self.floor,
            capacity: self.capacity,
            occupied: self.occupied,
            room_type: self.room_type,
            monthly_fee: self.monthly_fee,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
