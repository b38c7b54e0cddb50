use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct Book {
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
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct BookListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub available_only: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct CreateBookRequest {
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: i32,
    pub shelf_location: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub publisher: Option<String>,
    pub total_copies: Option<i32>,
    pub shelf_location: Option<String>,
}

string_enum! {
    #[ts(export, export_to = "library.ts")]
    pub enum LoanStatus {
        Issued => "issued",
        Returned => "returned",
        Lost => "lost",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct Loan {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub book_id: i64,
    pub student_id: i64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
    pub fine_amount: f64,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct IssueBookRequest {
    pub book_id: i64,
    pub student_id: i64,
    pub issue_date: Option<NaiveDate>,
    /// 缺省为借出日期 + library.loan_days
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct ReturnBookRequest {
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LoanListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub book_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<LoanStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub overdue_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "library.ts")]
pub struct LibraryStats {
    pub total_titles: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub issued_loans: i64,
    pub overdue_loans: i64,
    pub total_fines: f64,
}

pub type BookListResponse = PaginatedResponse<Book>;
pub type LoanListResponse = PaginatedResponse<Loan>;
