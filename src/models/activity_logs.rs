//! 操作日志
//!
//! 记录谁在什么时候对哪条业务记录做了什么，目前由收费减免写入。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "activity_log.ts")]
    pub enum ActivityEvent {
        Created => "created",
        Updated => "updated",
        Deleted => "deleted",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "activity_log.ts")]
pub struct ActivityLog {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: Option<i64>,
    pub user_id: Option<i64>,
    pub event: ActivityEvent,
    /// 业务表名，例如 fee_exceptions
    pub subject_type: String,
    pub subject_id: i64,
    pub description: String,
    pub properties: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的日志，组织和学校取自调用方的租户范围
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: Option<i64>,
    pub event: ActivityEvent,
    pub subject_type: &'static str,
    pub subject_id: i64,
    pub description: String,
    pub properties: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "activity_log.ts")]
pub struct ActivityLogListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub subject_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub event: Option<ActivityEvent>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<i64>,
}

pub type ActivityLogListResponse = PaginatedResponse<ActivityLog>;
