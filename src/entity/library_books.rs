//! 图书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "library_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub shelf_location: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_loans::Entity")]
    Loans,
}

impl Related<super::library_loans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_book(self) -> crate::models::library::Book {
        use super::timestamp_to_datetime as ts;

        crate::models::library::Book {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            category: self.category,
            publisher: self.publisher,
            total_copies: self.total_copies,
            available_copies: self.available_copies,
            shelf_location: self.shelf_location,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
