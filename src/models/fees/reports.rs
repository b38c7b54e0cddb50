//! 收费报表响应结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{AssignmentStatus, ExceptionType, FeeType, PaymentMethod};
use crate::models::common::PaginatedResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct StatusCounts {
    pub paid: i64,
    pub partial: i64,
    pub pending: i64,
    pub overdue: i64,
    pub waived: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct FeeSummary {
    pub total_assignments: i64,
    pub total_students: i64,
    pub total_assigned: f64,
    pub total_paid: f64,
    pub total_remaining: f64,
    pub collection_rate: f64,
    pub status_counts: StatusCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct ClassFeeBreakdown {
    pub class_id: i64,
    pub class_name: String,
    pub assignment_count: i64,
    pub student_count: i64,
    pub total_assigned: f64,
    pub total_paid: f64,
    pub total_remaining: f64,
    pub collection_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct StructureFeeBreakdown {
    pub fee_structure_id: i64,
    pub structure_name: String,
    pub fee_type: Option<FeeType>,
    pub assignment_count: i64,
    pub total_assigned: f64,
    pub total_paid: f64,
    pub total_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct RecentPayment {
    pub id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub student_id: i64,
    pub student_name: String,
    pub structure_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct ExceptionTypeStat {
    pub exception_type: ExceptionType,
    pub count: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct ExceptionImpact {
    pub original_total: f64,
    pub adjusted_total: f64,
    pub exception_reduction: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct ExceptionStats {
    pub total_count: i64,
    pub total_amount: f64,
    pub by_type: Vec<ExceptionTypeStat>,
    pub impact: ExceptionImpact,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct FeeDashboard {
    pub summary: FeeSummary,
    pub by_class: Vec<ClassFeeBreakdown>,
    pub by_structure: Vec<StructureFeeBreakdown>,
    pub recent_payments: Vec<RecentPayment>,
    pub exceptions: ExceptionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct StudentFeeRow {
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub class_id: Option<i64>,
    pub class_name: Option<String>,
    pub assignment_count: i64,
    pub total_assigned: f64,
    pub total_paid: f64,
    pub total_remaining: f64,
    pub overall_status: AssignmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct PeriodCollection {
    /// 月份为 YYYY-MM，日期为 YYYY-MM-DD
    pub period: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct MethodCollection {
    pub payment_method: PaymentMethod,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct CollectionReport {
    pub total_collected: f64,
    pub payment_count: i64,
    pub monthly: Vec<PeriodCollection>,
    pub by_method: Vec<MethodCollection>,
    pub daily: Vec<PeriodCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct DefaulterRow {
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub guardian_phone: Option<String>,
    pub class_name: Option<String>,
    pub structure_name: String,
    pub assigned_amount: f64,
    pub paid_amount: f64,
    pub remaining_amount: f64,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct DefaulterSummary {
    pub total_students: i64,
    pub total_assignments: i64,
    pub total_outstanding: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee_report.ts")]
pub struct DefaultersReport {
    pub summary: DefaulterSummary,
    pub defaulters: Vec<DefaulterRow>,
}

pub type StudentFeesResponse = PaginatedResponse<StudentFeeRow>;
