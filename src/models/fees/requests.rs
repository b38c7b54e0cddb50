use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{AssignmentStatus, ExceptionType, FeeType, PaymentMethod};
use crate::models::common::{PaginationQuery, empty_string_as_none};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeStructureListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeeStructureRequest {
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub fee_type: FeeType,
    pub amount: f64,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct UpdateFeeStructureRequest {
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: Option<String>,
    pub fee_type: Option<FeeType>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeAssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fee_structure_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeeAssignmentRequest {
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    /// 缺省为收费项目金额
    pub original_amount: Option<f64>,
    /// 缺省为 original_amount
    pub assigned_amount: Option<f64>,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct BulkAssignRequest {
    pub fee_structure_id: i64,
    pub class_id: i64,
    pub academic_year_id: Option<i64>,
    pub assigned_amount: Option<f64>,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct BulkAssignResponse {
    pub created: usize,
    pub skipped: usize,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct UpdateFeeAssignmentRequest {
    pub fee_structure_id: Option<i64>,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub original_amount: Option<f64>,
    pub assigned_amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    /// 仅允许手动设为 cancelled
    pub status: Option<AssignmentStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeePaymentRequest {
    pub fee_assignment_id: i64,
    pub amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeePaymentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fee_assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CreateFeeExceptionRequest {
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub exception_type: ExceptionType,
    /// waiver 类型忽略该值
    #[serde(default)]
    pub value: f64,
    pub reason: String,
    /// 缺省为创建时刻
    pub approved_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 缺省为当天
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct UpdateFeeExceptionRequest {
    pub fee_assignment_id: Option<i64>,
    pub student_id: Option<i64>,
    pub reason: Option<String>,
    pub is_active: Option<bool>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeExceptionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub fee_assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exception_type: Option<ExceptionType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub is_active: Option<bool>,
}

/// 报表通用筛选
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeReportFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct StudentFeesParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<AssignmentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct CollectionParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct DefaultersParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_amount: Option<f64>,
    /// 导出格式：xlsx（默认）或 csv
    pub format: Option<String>,
}
