//! 操作日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: Option<i64>,
    pub user_id: Option<i64>,
    pub event: String,
    pub subject_type: String,
    pub subject_id: i64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// JSON 文本
    #[sea_orm(column_type = "Text", nullable)]
    pub properties: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_activity_log(self) -> crate::models::activity_logs::ActivityLog {
        use crate::models::activity_logs::{ActivityEvent, ActivityLog};

        ActivityLog {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            user_id: self.user_id,
            event: self.event.parse().unwrap_or(ActivityEvent::Updated),
            subject_type: self.subject_type,
            subject_id: self.subject_id,
            description: self.description,
            properties: self
                .properties
                .and_then(|raw| serde_json::from_str(&raw).ok()),
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
