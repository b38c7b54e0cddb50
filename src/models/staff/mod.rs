use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "staff.ts")]
    pub enum StaffStatus {
        Active => "active",
        OnLeave => "on_leave",
        Terminated => "terminated",
    }
}

// 教职工档案，可关联登录账号
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "staff.ts")]
pub struct StaffMember {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub status: StaffStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "staff.ts")]
pub struct StaffListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "staff.ts")]
pub struct CreateStaffRequest {
    pub user_id: Option<i64>,
    /// 学校内唯一
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub status: Option<StaffStatus>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "staff.ts")]
pub struct UpdateStaffRequest {
    pub user_id: Option<i64>,
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub status: Option<StaffStatus>,
}

pub type StaffListResponse = PaginatedResponse<StaffMember>;
