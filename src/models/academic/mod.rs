//! 教务基础数据：学年、班级、科目、教学楼与教室

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct AcademicYear {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 每个学校同时只有一个当前学年
    pub is_current: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateAcademicYearRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateAcademicYearRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Class {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub section: Option<String>,
    pub grade_level: Option<i32>,
    /// 班主任（staff.id）
    pub class_teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub capacity: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateClassRequest {
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub section: Option<String>,
    pub grade_level: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateClassRequest {
    pub academic_year_id: Option<i64>,
    pub name: Option<String>,
    pub section: Option<String>,
    pub grade_level: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Subject {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Building {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub floors: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateBuildingRequest {
    pub name: String,
    pub description: Option<String>,
    pub floors: Option<i32>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateBuildingRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub floors: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct Room {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub building_id: Option<i64>,
    pub room_number: String,
    pub capacity: Option<i32>,
    pub room_type: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct RoomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub building_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct CreateRoomRequest {
    pub building_id: Option<i64>,
    pub room_number: String,
    pub capacity: Option<i32>,
    pub room_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct UpdateRoomRequest {
    pub building_id: Option<i64>,
    pub room_number: Option<String>,
    pub capacity: Option<i32>,
    pub room_type: Option<String>,
}

/// 科目、教学楼等简单列表的通用筛选
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "academic.ts")]
pub struct AcademicListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

pub type ClassListResponse = PaginatedResponse<Class>;
pub type SubjectListResponse = PaginatedResponse<Subject>;
pub type BuildingListResponse = PaginatedResponse<Building>;
pub type RoomListResponse = PaginatedResponse<Room>;
