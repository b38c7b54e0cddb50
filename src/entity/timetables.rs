//! 课表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub name: String,
    pub timetable_type: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::timetable_entries::Entity")]
    Entries,
}

impl Related<super::timetable_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_timetable(self) -> crate::models::timetables::Timetable {
        use super::timestamp_to_datetime as ts;

        crate::models::timetables::Timetable {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            academic_year_id: self.academic_year_id,
            name: self.name,
            timetable_type: self.timetable_type,
            description: self.description,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
