//! 借阅记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "library_loans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub book_id: i64,
    pub student_id: i64,
    pub issue_date: Date,
    pub due_date: Date,
    pub return_date: Option<Date>,
    pub status: String,
    pub fine_amount: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_books::Entity",
        from = "Column::BookId",
        to = "super::library_books::Column::Id"
    )]
    Book,
}

impl Related<super::library_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_loan(self) -> crate::models::library::Loan {
        use super::timestamp_to_datetime as ts;
        use crate::models::library::{Loan, LoanStatus};

        Loan {
            id: self.id,
            organization_id: self.organization_id,
            school_id: self.school_id,
            book_id: self.book_id,
            student_id: self.student_id,
            issue_date: self.issue_date,
            due_date: self.due_date,
            return_date: self.return_date,
            status: self.status.parse().unwrap_or(LoanStatus::Issued),
            fine_amount: self.fine_amount,
            notes: self.notes,
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
