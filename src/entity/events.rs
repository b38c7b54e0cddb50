//! 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_event(self) -> crate::models::communications::Event {
        use super::timestamp_to_datetime as ts;
        use crate::models::communications::{Event, EventStatus};

        Event {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            start_time: ts(self.start_time),
            end_time: ts(self.end_time),
            status: self.status.parse().unwrap_or(EventStatus::Scheduled),
            created_by: self.created_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
