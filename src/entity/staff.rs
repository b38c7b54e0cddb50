//! 教职工实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub user_id: Option<i64>,
    pub employee_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub hire_date: Option<Date>,
    pub salary: Option<f64>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_staff(self) -> crate::models::staff::StaffMember {
        use super::timestamp_to_datetime as ts;
        use crate::models::staff::{StaffMember, StaffStatus};

        StaffMember {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            user_id: self.user_id,
            employee_id: self.employee_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            department: self.department,
            designation: self.designation,
            hire_date: self.hire_date,
            salary: self.salary,
            status: self.status.parse().unwrap_or(StaffStatus::Active),
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
