use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::LibraryService;
use crate::models::library::{BookListParams, CreateBookRequest, UpdateBookRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, not_found, tenant_scope};

const TABLE: &str = "library_books";

fn book_not_found() -> HttpResponse {
    not_found(ErrorCode::BookNotFound, "Book not found")
}

pub(crate) fn validate_book(title: Option<&str>, total_copies: Option<i32>) -> Result<(), &'static str> {
    if title.is_some_and(|t| t.trim().is_empty()) {
        return Err("Title is required");
    }
    if total_copies.is_some_and(|c| c < 0) {
        return Err("Total copies must not be negative");
    }
    Ok(())
}

impl LibraryService {
    pub async fn list_books(
        &self,
        params: BookListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_books(&scope, &params).await {
            Ok(books) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                books,
                "Books retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_book(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_book(&scope, id).await {
            Ok(Some(book)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                book,
                "Book retrieved successfully",
            ))),
            Ok(None) => Ok(book_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 新书的可借册数等于总册数
    pub async fn create_book(
        &self,
        mut req: CreateBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.title = req.title.trim().to_string();
        if let Err(msg) = validate_book(Some(&req.title), Some(req.total_copies)) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_book(&scope, req).await {
            Ok(book) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, book.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    book,
                    "Book created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_book(
        &self,
        id: i64,
        req: UpdateBookRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = validate_book(req.title.as_deref(), req.total_copies) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_book(&scope, id, req).await {
            Ok(Some(book)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, book.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    book,
                    "Book updated successfully",
                )))
            }
            Ok(None) => Ok(book_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_book(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_book(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Book deleted successfully")))
            }
            Ok(false) => Ok(book_not_found()),
            Err(e) => Ok(error_response_with(&e, ErrorCode::BookUnavailable)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_book() {
        assert!(validate_book(Some("Dune"), Some(3)).is_ok());
        assert!(validate_book(None, None).is_ok());
        assert!(validate_book(Some(" "), Some(3)).is_err());
        assert!(validate_book(Some("Dune"), Some(-1)).is_err());
    }
}
