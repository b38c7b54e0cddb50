//! 组织实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schools::Entity")]
    Schools,
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schools.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_organization(self) -> crate::models::organizations::Organization {
        use super::timestamp_to_datetime as ts;

        crate::models::organizations::Organization {
            id: self.id,
            name: self.name,
            slug: self.slug,
            email: self.email,
            phone: self.phone,
            address: self.address,
            is_active: self.is_active,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
