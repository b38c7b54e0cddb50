//! 宿舍分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hostel_allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub room_id: i64,
    pub student_id: i64,
    pub allocated_on: Date,
    pub checkout_on: Option<Date>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hostel_rooms::Entity",
        from = "Column::RoomId",
        to = "super::hostel_rooms::Column::Id"
    )]
    Room,
}

impl Related<super::hostel_rooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_allocation(self) -> crate::models::hostel::HostelAllocation {
        use super::timestamp_to_datetime as ts;
        use crate::models::hostel::{AllocationStatus, HostelAllocation};

        HostelAllocation {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            room_id: self.room_id,
            student_id: self.student_id,
            allocated_on: self.allocated_on,
            checkout_on: self.checkout_on,
            status: self.status.parse().unwrap_or(AllocationStatus::Active),
            notes: self.notes,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
