//! 公告、活动与站内消息

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "communication.ts")]
    pub enum Priority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct Announcement {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    /// 面向的角色或群体
    pub target_audience: Vec<String>,
    pub publish_date: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub published_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub priority: Option<Priority>,
    /// 仅未过期
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    pub publish_date: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<Priority>,
    pub target_audience: Option<Vec<String>>,
    pub publish_date: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

string_enum! {
    #[ts(export, export_to = "communication.ts")]
    pub enum EventStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

impl EventStatus {
    /// 只允许 scheduled → completed / cancelled
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        *self == next || (*self == EventStatus::Scheduled && next != EventStatus::Scheduled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct Event {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub status: EventStatus,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct EventListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<EventStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub status: Option<EventStatus>,
}

// 站内消息，组织范围
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct Message {
    pub id: i64,
    pub organization_id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

string_enum! {
    #[ts(export, export_to = "communication.ts")]
    pub enum MessageFolder {
        Inbox => "inbox",
        Sent => "sent",
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct MessageListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 默认收件箱
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub folder: Option<MessageFolder>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub unread_only: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct SendMessageRequest {
    pub recipient_id: i64,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "communication.ts")]
pub struct UnreadCountResponse {
    pub unread: i64,
}

pub type AnnouncementListResponse = PaginatedResponse<Announcement>;
pub type EventListResponse = PaginatedResponse<Event>;
pub type MessageListResponse = PaginatedResponse<Message>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_status_transitions() {
        assert!(EventStatus::Scheduled.can_transition_to(EventStatus::Completed));
        assert!(EventStatus::Scheduled.can_transition_to(EventStatus::Cancelled));
        assert!(EventStatus::Completed.can_transition_to(EventStatus::Completed));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Scheduled));
        assert!(!EventStatus::Cancelled.can_transition_to(EventStatus::Completed));
    }
}
