//! 收费项目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_structures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub name: String,
    pub fee_type: String,
    pub amount: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_assignments::Entity")]
    Assignments,
}

impl Related<super::fee_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_structure(self) -> crate::models::fees::FeeStructure {
        use super::timestamp_to_datetime as ts;
        use crate::models::fees::{FeeStructure, FeeType};

        FeeStructure {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            class_id: self.class_id,
            name: self.name,
            fee_type: self.fee_type.parse().unwrap_or(FeeType::OneTime),
            amount: self.amount,
            description: self.description,
            is_active: self.is_active,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
