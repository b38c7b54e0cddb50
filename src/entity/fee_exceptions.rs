//! 减免记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_exceptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub exception_type: String,
    pub value: f64,
    pub exception_amount: f64,
    pub reason: String,
    pub approved_by: Option<i64>,
    pub approved_at: i64,
    pub valid_from: Date,
    pub valid_to: Option<Date>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_assignments::Entity",
        from = "Column::FeeAssignmentId",
        to = "super::fee_assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::fee_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn kind(&self) -> crate::models::fees::ExceptionType {
        self.exception_type
            .parse()
            .unwrap_or(crate::models::fees::ExceptionType::Custom)
    }

    /// 写入操作日志的字段快照
    pub fn audit_values(&self) -> serde_json::Value {
        serde_json::json!({
            "fee_assignment_id": self.fee_assignment_id,
            "student_id": self.student_id,
            "exception_type": self.exception_type,
            "exception_amount": self.exception_amount,
            "reason": self.reason,
            "is_active": self.is_active,
            "valid_from": self.valid_from,
            "valid_to": self.valid_to,
        })
    }

    pub fn into_exception(self) -> crate::models::fees::FeeException {
        use super::timestamp_to_datetime as ts;
        use crate::models::fees::FeeException;

        FeeException {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            fee_assignment_id: self.fee_assignment_id,
            student_id: self.student_id,
            exception_type: self.kind(),
            value: self.value,
            exception_amount: self.exception_amount,
            reason: self.reason,
            approved_by: self.approved_by,
            approved_at: ts(self.approved_at),
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            is_active: self.is_active,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
