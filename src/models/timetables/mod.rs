//! 课表

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "timetable.ts")]
    pub enum DayOfWeek {
        Monday => "monday",
        Tuesday => "tuesday",
        Wednesday => "wednesday",
        Thursday => "thursday",
        Friday => "friday",
        Saturday => "saturday",
        Sunday => "sunday",
    }
}

impl DayOfWeek {
    /// 排序用序号，周一为 1
    pub fn order(&self) -> u8 {
        match self {
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
            DayOfWeek::Sunday => 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct Timetable {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub timetable_type: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub timetable_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub room_id: Option<i64>,
    pub day_of_week: DayOfWeek,
    pub period_order: i32,
    pub start_time: String,
    pub end_time: String,
}

/// 新建或替换课表条目时的单条输入
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TimetableEntryInput {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub room_id: Option<i64>,
    pub day_of_week: DayOfWeek,
    pub period_order: i32,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TimetableListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct CreateTimetableRequest {
    pub academic_year_id: Option<i64>,
    pub name: String,
    /// 默认 teaching
    pub timetable_type: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub entries: Vec<TimetableEntryInput>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct UpdateTimetableRequest {
    pub academic_year_id: Option<i64>,
    pub name: Option<String>,
    pub timetable_type: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct ReplaceEntriesRequest {
    pub entries: Vec<TimetableEntryInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TimetableDetail {
    pub timetable: Timetable,
    pub entries: Vec<TimetableEntry>,
}

string_enum! {
    /// 冲突维度
    #[ts(export, export_to = "timetable.ts")]
    pub enum ConflictKind {
        Teacher => "teacher",
        Class => "class",
        Room => "room",
    }
}

/// 同一时段被重复占用的资源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TimetableConflict {
    pub kind: ConflictKind,
    pub resource_id: i64,
    pub day_of_week: DayOfWeek,
    pub period_order: i32,
    /// 发生冲突的两条输入下标
    pub first_index: usize,
    pub second_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TeacherPreference {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub academic_year_id: Option<i64>,
    pub preferred_days: Vec<DayOfWeek>,
    pub unavailable_periods: Vec<i32>,
    pub max_periods_per_day: Option<i32>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct UpsertTeacherPreferenceRequest {
    pub teacher_id: i64,
    pub academic_year_id: Option<i64>,
    #[serde(default)]
    pub preferred_days: Vec<DayOfWeek>,
    #[serde(default)]
    pub unavailable_periods: Vec<i32>,
    pub max_periods_per_day: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "timetable.ts")]
pub struct TeacherPreferenceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
}

pub type TimetableListResponse = PaginatedResponse<Timetable>;
pub type TeacherPreferenceListResponse = PaginatedResponse<TeacherPreference>;
