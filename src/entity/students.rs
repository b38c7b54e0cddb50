//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub class_id: Option<i64>,
    pub admission_no: String,
    pub full_name: String,
    pub father_name: Option<String>,
    pub gender: String,
    pub date_of_birth: Option<Date>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub admission_date: Option<Date>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::Student {
        use super::timestamp_to_datetime as ts;
        use crate::models::students::{Gender, Student, StudentStatus};

        Student {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            class_id: self.class_id,
            admission_no: self.admission_no,
            full_name: self.full_name,
            father_name: self.father_name,
            gender: self.gender.parse().unwrap_or(Gender::Other),
            date_of_birth: self.date_of_birth,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            address: self.address,
            admission_date: self.admission_date,
            status: self.status.parse().unwrap_or(StudentStatus::Active),
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
