use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    /// 学籍状态
    #[ts(export, export_to = "student.ts")]
    pub enum StudentStatus {
        Active => "active",
        Inactive => "inactive",
        Graduated => "graduated",
        Transferred => "transferred",
        Suspended => "suspended",
    }
}

string_enum! {
    #[ts(export, export_to = "student.ts")]
    pub enum Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub class_id: Option<i64>,
    pub admission_no: String,
    pub full_name: String,
    pub father_name: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<StudentStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub class_id: Option<i64>,
    /// 学校内唯一
    pub admission_no: String,
    pub full_name: String,
    pub father_name: Option<String>,
    pub gender: Gender,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub class_id: Option<i64>,
    pub admission_no: Option<String>,
    pub full_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub status: Option<StudentStatus>,
}

/// 分组计数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentStats {
    pub total: i64,
    pub by_status: Vec<CountBucket>,
    pub by_gender: Vec<CountBucket>,
    pub by_class: Vec<CountBucket>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentImportParams {
    /// 仅校验不写入
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct ImportRowError {
    /// 表格中的行号（含表头，从 1 开始）
    pub row: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentImportResponse {
    pub total_rows: usize,
    pub imported: usize,
    pub dry_run: bool,
    pub errors: Vec<ImportRowError>,
}

pub type StudentListResponse = PaginatedResponse<Student>;
