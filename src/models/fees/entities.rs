use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::PaginatedResponse;

string_enum! {
    #[ts(export, export_to = "fee.ts")]
    pub enum FeeType {
        OneTime => "one_time",
        Monthly => "monthly",
        Quarterly => "quarterly",
        Semester => "semester",
        Annual => "annual",
        Custom => "custom",
    }
}

string_enum! {
    /// 应收状态
    #[ts(export, export_to = "fee.ts")]
    pub enum AssignmentStatus {
        Pending => "pending",
        Partial => "partial",
        Paid => "paid",
        Overdue => "overdue",
        Waived => "waived",
        Cancelled => "cancelled",
    }
}

impl AssignmentStatus {
    /// 不随金额变化而重新计算的状态
    pub fn is_sticky(&self) -> bool {
        matches!(self, AssignmentStatus::Waived | AssignmentStatus::Cancelled)
    }

    /// 计入欠费名单的状态
    pub fn is_outstanding(&self) -> bool {
        matches!(
            self,
            AssignmentStatus::Pending | AssignmentStatus::Partial | AssignmentStatus::Overdue
        )
    }
}

string_enum! {
    #[ts(export, export_to = "fee.ts")]
    pub enum PaymentMethod {
        Cash => "cash",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        MobileMoney => "mobile_money",
        Other => "other",
    }
}

string_enum! {
    #[ts(export, export_to = "fee.ts")]
    pub enum ExceptionType {
        DiscountPercentage => "discount_percentage",
        DiscountFixed => "discount_fixed",
        Waiver => "waiver",
        Custom => "custom",
    }
}

// 收费项目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeStructure {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub fee_type: FeeType,
    pub amount: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学生应收
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeAssignment {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    /// 减免前金额
    pub original_amount: f64,
    /// 减免后应收
    pub assigned_amount: f64,
    pub paid_amount: f64,
    pub remaining_amount: f64,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeePayment {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub reference_no: Option<String>,
    pub received_by: Option<i64>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 减免记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "fee.ts")]
pub struct FeeException {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub exception_type: ExceptionType,
    /// 输入值：百分比、固定金额或自定义应收
    pub value: f64,
    /// 实际减少的应收金额
    pub exception_amount: f64,
    pub reason: String,
    pub approved_by: Option<i64>,
    pub approved_at: chrono::DateTime<chrono::Utc>,
    /// 生效区间，仅作记录，不影响金额计算
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub type FeeStructureListResponse = PaginatedResponse<FeeStructure>;
pub type FeeAssignmentListResponse = PaginatedResponse<FeeAssignment>;
pub type FeePaymentListResponse = PaginatedResponse<FeePayment>;
pub type FeeExceptionListResponse = PaginatedResponse<FeeException>;
