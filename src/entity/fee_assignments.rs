//! 学生应收实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub fee_structure_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub original_amount: f64,
    pub assigned_amount: f64,
    pub paid_amount: f64,
    pub remaining_amount: f64,
    pub due_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_structures::Entity",
        from = "Column::FeeStructureId",
        to = "super::fee_structures::Column::Id"
    )]
    Structure,
    #[sea_orm(has_many = "super::fee_payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::fee_exceptions::Entity")]
    Exceptions,
}

impl Related<super::fee_structures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Structure.def()
    }
}

impl Related<super::fee_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::fee_exceptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exceptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> crate::models::fees::AssignmentStatus {
        self.status
            .parse()
            .unwrap_or(crate::models::fees::AssignmentStatus::Pending)
    }

    pub fn into_assignment(self) -> crate::models::fees::FeeAssignment {
        use super::timestamp_to_datetime as ts;

        crate::models::fees::FeeAssignment {
            status: self.status(),
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            student_id: self.student_id,
            fee_structure_id: self.fee_structure_id,
            academic_year_id: self.academic_year_id,
            class_id: self.class_id,
            original_amount: self.original_amount,
            assigned_amount: self.assigned_amount,
            paid_amount: self.paid_amount,
            remaining_amount: self.remaining_amount,
            due_date: self.due_date,
            notes: self.notes,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
