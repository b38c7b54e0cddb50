//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub exam_type: String,
    pub exam_date: Option<Date>,
    pub total_marks: f64,
    pub pass_marks: f64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam_results::Entity")]
    Results,
}

impl Related<super::exam_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::Exam {
        use super::timestamp_to_datetime as ts;
        use crate::models::exams::{Exam, ExamType};

        Exam {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            name: self.name,
            exam_type: self.exam_type.parse().unwrap_or(ExamType::Quiz),
            exam_date: self.exam_date,
            total_marks: self.total_marks,
            pass_marks: self.pass_marks,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
