//! 课表条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timetable_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub room_id: Option<i64>,
    pub day_of_week: String,
    pub period_order: i32,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::timetables::Entity",
        from = "Column::TimetableId",
        to = "super::timetables::Column::Id"
    )]
    Timetable,
}

impl Related<super::timetables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timetable.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(self) -> crate::models::timetables::TimetableEntry {
        use crate::models::timetables::{DayOfWeek, TimetableEntry};

        TimetableEntry {
            id: self.id,
            timetable_id: self.timetable_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            room_id: self.room_id,
            day_of_week: self.day_of_week.parse().unwrap_or(DayOfWeek::Monday),
            period_order: self.period_order,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}
