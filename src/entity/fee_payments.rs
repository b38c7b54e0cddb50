//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub fee_assignment_id: i64,
    pub student_id: i64,
    pub amount: f64,
    pub payment_date: Date,
    pub payment_method: String,
    pub reference_no: Option<String>,
    pub received_by: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
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
    pub fn into_payment(self) -> crate::models::fees::FeePayment {
        use crate::models::fees::{FeePayment, PaymentMethod};

        FeePayment {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            fee_assignment_id: self.fee_assignment_id,
            student_id: self.student_id,
            amount: self.amount,
            payment_date: self.payment_date,
            payment_method: self.payment_method.parse().unwrap_or(PaymentMethod::Other),
            reference_no: self.reference_no,
            received_by: self.received_by,
            notes: self.notes,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
