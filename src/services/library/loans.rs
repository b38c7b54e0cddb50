use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, NaiveDate};

use super::LibraryService;
use crate::config::AppConfig;
use crate::models::library::{
    IssueBookRequest, Loan, LoanListParams, LoanStatus, ReturnBookRequest,
};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{
    bad_request, error_response, error_response_with, not_found, tenant_scope, today,
};

const TABLE: &str = "library_loans";

fn loan_not_found() -> HttpResponse {
    not_found(ErrorCode::LoanNotFound, "Loan not found")
}

/// 缺省应还日期
pub(crate) fn default_due_date(issue_date: NaiveDate, loan_days: i64) -> NaiveDate {
    issue_date + Duration::days(loan_days.max(0))
}

/// 归还时的逾期天数
pub(crate) fn overdue_days(loan: &Loan, return_date: NaiveDate) -> i64 {
    (return_date - loan.due_date).num_days().max(0)
}

impl LibraryService {
    pub async fn list_loans(
        &self,
        params: LoanListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_loans(&scope, &params, today()).await {
            Ok(loans) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                loans,
                "Loans retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn issue_book(
        &self,
        req: IssueBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let issue_date = req.issue_date.unwrap_or_else(today);
        let due_date = req.due_date.unwrap_or_else(|| {
            default_due_date(issue_date, AppConfig::get().library.loan_days)
        });

        let storage = self.get_storage(request)?;
        match storage
            .issue_book(
                &scope,
                IssueBookRequest {
                    issue_date: Some(issue_date),
                    ..req
                },
                due_date,
            )
            .await
        {
            Ok(loan) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, loan.id);
                publish_school_change(&scope, "library_books", ChangeAction::Update, loan.book_id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    loan,
                    "Book issued successfully",
                )))
            }
            Err(e) => Ok(error_response_with(&e, ErrorCode::BookUnavailable)),
        }
    }

    /// 归还并按逾期天数计算罚款
    pub async fn return_book(
        &self,
        loan_id: i64,
        req: ReturnBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let loan = match storage.get_loan(&scope, loan_id).await {
            Ok(Some(loan)) => loan,
            Ok(None) => return Ok(loan_not_found()),
            Err(e) => return Ok(error_response(&e)),
        };
        if loan.status != LoanStatus::Issued {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::LoanAlreadyClosed,
                format!("Loan is already {}", loan.status),
            )));
        }

        let return_date = req.return_date.unwrap_or_else(today);
        if return_date < loan.issue_date {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Return date must not be before the issue date",
            ));
        }
        let fine = AppConfig::get().library_fine(overdue_days(&loan, return_date));

        match storage.return_book(&scope, loan_id, return_date, fine).await {
            Ok(loan) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, loan.id);
                publish_school_change(&scope, "library_books", ChangeAction::Update, loan.book_id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    loan,
                    "Book returned successfully",
                )))
            }
            Err(e) => Ok(error_response_with(&e, ErrorCode::LoanAlreadyClosed)),
        }
    }

    pub async fn mark_loan_lost(
        &self,
        loan_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.mark_loan_lost(&scope, loan_id).await {
            Ok(loan) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, loan.id);
                publish_school_change(&scope, "library_books", ChangeAction::Update, loan.book_id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    loan,
                    "Loan marked as lost",
                )))
            }
            Err(e) => Ok(error_response_with(&e, ErrorCode::LoanAlreadyClosed)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    pub(crate) fn loan(id: i64, due: NaiveDate, status: LoanStatus, fine: f64) -> Loan {
        Loan {
            id,
            organization_id: 1,
            school_id: 1,
            book_id: 1,
            student_id: 1,
            issue_date: due - Duration::days(14),
            due_date: due,
            return_date: None,
            status,
            fine_amount: fine,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_due_date() {
        assert_eq!(default_due_date(date(2024, 1, 25), 14), date(2024, 2, 8));
        assert_eq!(default_due_date(date(2024, 1, 25), -3), date(2024, 1, 25));
    }

    #[test]
    fn test_overdue_days() {
        let l = loan(1, date(2024, 3, 10), LoanStatus::Issued, 0.0);
        assert_eq!(overdue_days(&l, date(2024, 3, 9)), 0);
        assert_eq!(overdue_days(&l, date(2024, 3, 10)), 0);
        assert_eq!(overdue_days(&l, date(2024, 3, 13)), 3);
    }
}
