//! 考试成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub grade: String,
    pub is_pass: bool,
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id"
    )]
    Exam,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::exams::ExamResult {
        use super::timestamp_to_datetime as ts;

        crate::models::exams::ExamResult {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            marks_obtained: self.marks_obtained,
            percentage: self.percentage,
            grade: self.grade,
            is_pass: self.is_pass,
            remarks: self.remarks,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
