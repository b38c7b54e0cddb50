//! 公告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub priority: String,
    /// JSON 数组
    pub target_audience: String,
    pub publish_date: Date,
    pub expires_on: Option<Date>,
    pub published_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::communications::Announcement {
        use super::timestamp_to_datetime as ts;
        use crate::models::communications::{Announcement, Priority};

        Announcement {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            title: self.title,
            content: self.content,
            priority: self.priority.parse().unwrap_or(Priority::Normal),
            target_audience: serde_json::from_str(&self.target_audience).unwrap_or_default(),
            publish_date: self.publish_date,
            expires_on: self.expires_on,
            published_by: self.published_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
