use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::LibraryService;
use crate::models::ApiResponse;
use crate::models::common::round2;
use crate::models::library::{Book, LibraryStats, Loan, LoanStatus};
use crate::services::{error_response, tenant_scope, today};

pub(crate) fn library_stats(books: &[Book], loans: &[Loan], today: NaiveDate) -> LibraryStats {
    let issued: Vec<&Loan> = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Issued)
        .collect();

    LibraryStats {
        total_titles: books.len() as i64,
        total_copies: books.iter().map(|b| b.total_copies as i64).sum(),
        available_copies: books.iter().map(|b| b.available_copies as i64).sum(),
        issued_loans: issued.len() as i64,
        overdue_loans: issued.iter().filter(|l| l.due_date < today).count() as i64,
        total_fines: round2(loans.iter().map(|l| l.fine_amount).sum()),
    }
}

impl LibraryService {
    pub async fn library_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let books = match storage.list_all_books(&scope).await {
            Ok(books) => books,
            Err(e) => return Ok(error_response(&e)),
        };
        let loans = match storage.list_all_loans(&scope).await {
            Ok(loans) => loans,
            Err(e) => return Ok(error_response(&e)),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            library_stats(&books, &loans, today()),
            "Library statistics retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::library::loans::tests::loan;
    use chrono::Utc;

    fn book(total: i32, available: i32) -> Book {
        Book {
            id: 1,
            organization_id: 1,
            school_id: 1,
            title: "Book".into(),
            author: None,
            isbn: None,
            category: None,
            publisher: None,
            total_copies: total,
            available_copies: available,
            shelf_location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_library_stats() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        let future = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let loans = vec![
            loan(1, past, LoanStatus::Issued, 0.0),
            loan(2, future, LoanStatus::Issued, 0.0),
            loan(3, past, LoanStatus::Returned, 2.5),
            loan(4, past, LoanStatus::Lost, 0.0),
        ];

        let stats = library_stats(&[book(5, 3), book(2, 2)], &loans, today);
        assert_eq!(stats.total_titles, 2);
        assert_eq!(stats.total_copies, 7);
        assert_eq!(stats.available_copies, 5);
        assert_eq!(stats.issued_loans, 2);
        assert_eq!(stats.overdue_loans, 1);
        assert_eq!(stats.total_fines, 2.5);
    }
}
