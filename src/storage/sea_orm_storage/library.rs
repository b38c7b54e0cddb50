//! 图书与借阅

use super::SeaOrmStorage;
use super::scoped::{
    delete_scoped, ensure_scoped, fetch_page, find_scoped, now, scoped, search_condition,
};
use crate::entity::library_books::{self, Entity as LibraryBooks};
use crate::entity::library_loans::{self, Entity as LibraryLoans};
use crate::entity::students::Entity as Students;
use crate::errors::{NazimError, Result};
use crate::models::TenantScope;
use crate::models::library::{
    Book, BookListParams, BookListResponse, CreateBookRequest, IssueBookRequest, Loan,
    LoanListParams, LoanListResponse, LoanStatus, UpdateBookRequest,
};
use crate::storage::LibraryStorage;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};

/// 调整可借册数，`delta` 为负时要求库存足够
async fn adjust_available<C: ConnectionTrait>(db: &C, book_id: i64, delta: i32) -> Result<bool> {
    let mut update = LibraryBooks::update_many()
        .col_expr(
            library_books::Column::AvailableCopies,
            Expr::col(library_books::Column::AvailableCopies).add(delta),
        )
        .col_expr(library_books::Column::UpdatedAt, Expr::value(now()))
        .filter(library_books::Column::Id.eq(book_id));
    if delta < 0 {
        update = update.filter(library_books::Column::AvailableCopies.gte(-delta));
    }
    let result = update
        .exec(db)
        .await
        .map_err(|e| NazimError::database_operation(format!("更新可借册数失败: {e}")))?;
    Ok(result.rows_affected > 0)
}

/// 取出仍处于借出状态的记录
async fn open_loan<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    loan_id: i64,
) -> Result<library_loans::Model> {
    let loan = find_scoped::<LibraryLoans, _>(db, scope, loan_id)
        .await?
        .ok_or_else(|| NazimError::not_found(format!("Loan {loan_id} not found")))?;
    if loan.status != LoanStatus::Issued.as_str() {
        return Err(NazimError::conflict(format!(
            "Loan {loan_id} is already {}",
            loan.status
        )));
    }
    Ok(loan)
}

#[async_trait::async_trait]
impl LibraryStorage for SeaOrmStorage {
    async fn list_books(
        &self,
        scope: &TenantScope,
        params: &BookListParams,
    ) -> Result<BookListResponse> {
        let select = scoped::<LibraryBooks>(scope)
            .apply_if(
                search_condition(
                    params.search.as_deref(),
                    &[
                        library_books::Column::Title,
                        library_books::Column::Author,
                        library_books::Column::Isbn,
                    ],
                ),
                |q, cond| q.filter(cond),
            )
            .apply_if(params.category.clone(), |q, category| {
                q.filter(library_books::Column::Category.eq(category))
            })
            .apply_if(params.available_only.filter(|only| *only), |q, _| {
                q.filter(library_books::Column::AvailableCopies.gt(0))
            })
            .order_by_asc(library_books::Column::Title);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_book()).await
    }

    async fn get_book(&self, scope: &TenantScope, id: i64) -> Result<Option<Book>> {
        let result = find_scoped::<LibraryBooks, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_book()))
    }

    async fn create_book(&self, scope: &TenantScope, req: CreateBookRequest) -> Result<Book> {
        if req.total_copies < 0 {
            return Err(NazimError::validation("Total copies must not be negative"));
        }

        let now = now();
        let model = library_books::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            title: Set(req.title),
            author: Set(req.author),
            isbn: Set(req.isbn),
            category: Set(req.category),
            publisher: Set(req.publisher),
            total_copies: Set(req.total_copies),
            available_copies: Set(req.total_copies),
            shelf_location: Set(req.shelf_location),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建图书失败: {e}")))?;

        Ok(result.into_book())
    }

    async fn update_book(
        &self,
        scope: &TenantScope,
        id: i64,
        req: UpdateBookRequest,
    ) -> Result<Option<Book>> {
        let Some(existing) = find_scoped::<LibraryBooks, _>(&self.db, scope, id).await? else {
            return Ok(None);
        };

        let mut model = library_books::ActiveModel {
            id: Set(id),
            updated_at: Set(now()),
            ..Default::default()
        };

        if let Some(total) = req.total_copies {
            let on_loan = existing.total_copies - existing.available_copies;
            if total < on_loan {
                return Err(NazimError::validation(format!(
                    "Total copies cannot be less than the {on_loan} copies on loan"
                )));
            }
            let delta = total - existing.total_copies;
            model.total_copies = Set(total);
            model.available_copies = Set(std::cmp::Ord::max(existing.available_copies + delta, 0));
        }
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(author) = req.author {
            model.author = Set(Some(author));
        }
        if let Some(isbn) = req.isbn {
            model.isbn = Set(Some(isbn));
        }
        if let Some(category) = req.category {
            model.category = Set(Some(category));
        }
        if let Some(publisher) = req.publisher {
            model.publisher = Set(Some(publisher));
        }
        if let Some(shelf_location) = req.shelf_location {
            model.shelf_location = Set(Some(shelf_location));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新图书失败: {e}")))?;

        Ok(Some(result.into_book()))
    }

    async fn delete_book(&self, scope: &TenantScope, id: i64) -> Result<bool> {
        let outstanding = scoped::<LibraryLoans>(scope)
            .filter(library_loans::Column::BookId.eq(id))
            .filter(library_loans::Column::Status.eq(LoanStatus::Issued.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询借阅失败: {e}")))?;
        if outstanding > 0 {
            return Err(NazimError::conflict(format!(
                "Book still has {outstanding} outstanding loan(s)"
            )));
        }

        delete_scoped::<LibraryBooks, _>(&self.db, scope, id).await
    }

    async fn issue_book(
        &self,
        scope: &TenantScope,
        req: IssueBookRequest,
        due_date: NaiveDate,
    ) -> Result<Loan> {
        let issue_date = req
            .issue_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        if due_date < issue_date {
            return Err(NazimError::validation(
                "Due date must not be before the issue date",
            ));
        }
        ensure_scoped::<Students, _>(&self.db, scope, req.student_id, "Student").await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        find_scoped::<LibraryBooks, _>(&txn, scope, req.book_id)
            .await?
            .ok_or_else(|| NazimError::not_found(format!("Book {} not found", req.book_id)))?;
        if !adjust_available(&txn, req.book_id, -1).await? {
            return Err(NazimError::conflict("Book has no available copies"));
        }

        let now = now();
        let model = library_loans::ActiveModel {
            organization_id: Set(scope.organization_id),
            school_id: Set(scope.school_id),
            book_id: Set(req.book_id),
            student_id: Set(req.student_id),
            issue_date: Set(issue_date),
            due_date: Set(due_date),
            status: Set(LoanStatus::Issued.to_string()),
            fine_amount: Set(0.0),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let loan = model
            .insert(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("创建借阅记录失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(loan.into_loan())
    }

    async fn return_book(
        &self,
        scope: &TenantScope,
        loan_id: i64,
        return_date: NaiveDate,
        fine_amount: f64,
    ) -> Result<Loan> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let loan = open_loan(&txn, scope, loan_id).await?;
        let model = library_loans::ActiveModel {
            id: Set(loan.id),
            return_date: Set(Some(return_date)),
            status: Set(LoanStatus::Returned.to_string()),
            fine_amount: Set(fine_amount),
            updated_at: Set(now()),
            ..Default::default()
        };
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新借阅记录失败: {e}")))?;
        adjust_available(&txn, loan.book_id, 1).await?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_loan())
    }

    async fn mark_loan_lost(&self, scope: &TenantScope, loan_id: i64) -> Result<Loan> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| NazimError::database_operation(format!("开启事务失败: {e}")))?;

        let loan = open_loan(&txn, scope, loan_id).await?;
        let model = library_loans::ActiveModel {
            id: Set(loan.id),
            status: Set(LoanStatus::Lost.to_string()),
            updated_at: Set(now()),
            ..Default::default()
        };
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新借阅记录失败: {e}")))?;

        // 丢失的那一册从馆藏中扣除，可借册数借出时已扣减
        LibraryBooks::update_many()
            .col_expr(
                library_books::Column::TotalCopies,
                Expr::col(library_books::Column::TotalCopies).sub(1),
            )
            .col_expr(library_books::Column::UpdatedAt, Expr::value(now()))
            .filter(library_books::Column::Id.eq(loan.book_id))
            .filter(library_books::Column::TotalCopies.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| NazimError::database_operation(format!("更新馆藏失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| NazimError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_loan())
    }

    async fn get_loan(&self, scope: &TenantScope, id: i64) -> Result<Option<Loan>> {
        let result = find_scoped::<LibraryLoans, _>(&self.db, scope, id).await?;
        Ok(result.map(|m| m.into_loan()))
    }

    async fn list_loans(
        &self,
        scope: &TenantScope,
        params: &LoanListParams,
        today: NaiveDate,
    ) -> Result<LoanListResponse> {
        let select = scoped::<LibraryLoans>(scope)
            .apply_if(params.student_id, |q, id| {
                q.filter(library_loans::Column::StudentId.eq(id))
            })
            .apply_if(params.book_id, |q, id| {
                q.filter(library_loans::Column::BookId.eq(id))
            })
            .apply_if(params.status, |q, status| {
                q.filter(library_loans::Column::Status.eq(status.as_str()))
            })
            .apply_if(params.overdue_only.filter(|only| *only), |q, _| {
                q.filter(library_loans::Column::Status.eq(LoanStatus::Issued.as_str()))
                    .filter(library_loans::Column::DueDate.lt(today))
            })
            .order_by_desc(library_loans::Column::IssueDate)
            .order_by_desc(library_loans::Column::Id);

        fetch_page(select, &self.db, &params.pagination, |m| m.into_loan()).await
    }

    async fn list_all_books(&self, scope: &TenantScope) -> Result<Vec<Book>> {
        let books = scoped::<LibraryBooks>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询图书失败: {e}")))?;
        Ok(books.into_iter().map(|m| m.into_book()).collect())
    }

    async fn list_all_loans(&self, scope: &TenantScope) -> Result<Vec<Loan>> {
        let loans = scoped::<LibraryLoans>(scope)
            .all(&self.db)
            .await
            .map_err(|e| NazimError::database_operation(format!("查询借阅失败: {e}")))?;
        Ok(loans.into_iter().map(|m| m.into_loan()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{seed_school, seed_student};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn seed_book(storage: &SeaOrmStorage, scope: &TenantScope, copies: i32) -> Book {
        storage
            .create_book(
                scope,
                CreateBookRequest {
                    title: "Rust in Action".to_string(),
                    author: Some("T. McNamara".to_string()),
                    isbn: None,
                    category: Some("Programming".to_string()),
                    publisher: None,
                    total_copies: copies,
                    shelf_location: None,
                },
            )
            .await
            .unwrap()
    }

    fn issue(book_id: i64, student_id: i64) -> IssueBookRequest {
        IssueBookRequest {
            book_id,
            student_id,
            issue_date: Some(date("2026-03-01")),
            due_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_issue_and_return_adjust_copies() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "library").await;
        let student = seed_student(&storage, &scope, "L-1", None).await;
        let book = seed_book(&storage, &scope, 1).await;
        assert_eq!(book.available_copies, 1);

        let loan = storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-03-15"))
            .await
            .unwrap();
        let err = storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-03-15"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        let book_now = storage.get_book(&scope, book.id).await.unwrap().unwrap();
        assert_eq!(book_now.available_copies, 0);

        // 借出中的图书不能删除
        assert!(storage.delete_book(&scope, book.id).await.is_err());

        let returned = storage
            .return_book(&scope, loan.id, date("2026-03-18"), 30.0)
            .await
            .unwrap();
        assert_eq!(returned.status, LoanStatus::Returned);
        assert_eq!(returned.fine_amount, 30.0);

        let err = storage
            .return_book(&scope, loan.id, date("2026-03-18"), 0.0)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        let book_now = storage.get_book(&scope, book.id).await.unwrap().unwrap();
        assert_eq!(book_now.available_copies, 1);
    }

    #[tokio::test]
    async fn test_total_copies_update_respects_loans() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "stock").await;
        let student = seed_student(&storage, &scope, "L-2", None).await;
        let book = seed_book(&storage, &scope, 3).await;
        storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-03-15"))
            .await
            .unwrap();
        storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-03-15"))
            .await
            .unwrap();

        let shrink = UpdateBookRequest {
            total_copies: Some(1),
            ..Default::default()
        };
        assert!(storage.update_book(&scope, book.id, shrink).await.is_err());

        let grow = UpdateBookRequest {
            total_copies: Some(5),
            ..Default::default()
        };
        let updated = storage.update_book(&scope, book.id, grow).await.unwrap().unwrap();
        assert_eq!(updated.total_copies, 5);
        assert_eq!(updated.available_copies, 3);
    }

    #[tokio::test]
    async fn test_lost_loan_and_overdue_filter() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let scope = seed_school(&storage, "lost").await;
        let student = seed_student(&storage, &scope, "L-3", None).await;
        let book = seed_book(&storage, &scope, 2).await;

        let late = storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-03-05"))
            .await
            .unwrap();
        let lost = storage
            .issue_book(&scope, issue(book.id, student.id), date("2026-04-30"))
            .await
            .unwrap();

        let params = LoanListParams {
            pagination: Default::default(),
            student_id: None,
            book_id: None,
            status: None,
            overdue_only: Some(true),
        };
        let overdue = storage
            .list_loans(&scope, &params, date("2026-03-20"))
            .await
            .unwrap();
        assert_eq!(overdue.pagination.total, 1);
        assert_eq!(overdue.items[0].id, late.id);

        let marked = storage.mark_loan_lost(&scope, lost.id).await.unwrap();
        assert_eq!(marked.status, LoanStatus::Lost);
        let book_now = storage.get_book(&scope, book.id).await.unwrap().unwrap();
        assert_eq!(book_now.total_copies, 1);
        assert_eq!(book_now.available_copies, 0);
    }
}
