//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub section: Option<String>,
    pub grade_level: Option<i32>,
    pub class_teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub capacity: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_years::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_years::Column::Id"
    )]
    AcademicYear,
}

impl Related<super::academic_years::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::academic::Class {
        use super::timestamp_to_datetime as ts;

        crate::models::academic::Class {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            name: self.name,
            section: self.section,
            grade_level: self.grade_level,
            class_teacher_id: self.class_teacher_id,
            room_id: self.room_id,
            capacity: self.capacity,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }

    /// 报表中显示的班级名（含分班）
    pub fn display_name(&self) -> String {
        match &self.section {
            Some(section) if !section.is_empty() => format!("{} {}", self.name, section),
            _ => self.name.clone(),
        }
    }
}
