//! 考勤记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub date: Date,
    pub status: String,
    pub remarks: Option<String>,
    pub marked_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::attendance::AttendanceRecord {
        use super::timestamp_to_datetime as ts;
        use crate::models::attendance::{AttendanceRecord, AttendanceStatus};

        AttendanceRecord {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            class_id: self.class_id,
            student_id: self.student_id,
            date: self.date,
            status: self.status.parse().unwrap_or(AttendanceStatus::Absent),
            remarks: self.remarks,
            marked_by: self.marked_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
