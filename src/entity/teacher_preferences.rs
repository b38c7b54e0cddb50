//! 教师排课偏好实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_preferences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub academic_year_id: Option<i64>,
    /// JSON 数组
    pub preferred_days: String,
    /// JSON 数组
    pub unavailable_periods: String,
    pub max_periods_per_day: Option<i32>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_preference(self) -> crate::models::timetables::TeacherPreference {
        use super::timestamp_to_datetime as ts;

        crate::models::timetables::TeacherPreference {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            teacher_id: self.teacher_id,
            academic_year_id: self.academic_year_id,
            preferred_days: serde_json::from_str(&self.preferred_days).unwrap_or_default(),
            unavailable_periods: serde_json::from_str(&self.unavailable_periods)
                .unwrap_or_default(),
            max_periods_per_day: self.max_periods_per_day,
            notes: self.notes,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
