use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::library::{
    BookListParams, CreateBookRequest, IssueBookRequest, LoanListParams, ReturnBookRequest,
    UpdateBookRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::LibraryService;
use crate::utils::SafeIDI64;

static LIBRARY_SERVICE: Lazy<LibraryService> = Lazy::new(LibraryService::new_lazy);

pub async fn list_books(
    req: HttpRequest,
    query: web::Query<BookListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_books(query.into_inner(), &req).await
}

pub async fn create_book(
    req: HttpRequest,
    body: web::Json<CreateBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.create_book(body.into_inner(), &req).await
}

pub async fn get_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.get_book(id.0, &req).await
}

pub async fn update_book(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE
        .update_book(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_book(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.delete_book(id.0, &req).await
}

pub async fn list_loans(
    req: HttpRequest,
    query: web::Query<LoanListParams>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.list_loans(query.into_inner(), &req).await
}

pub async fn issue_book(
    req: HttpRequest,
    body: web::Json<IssueBookRequest>,
) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.issue_book(body.into_inner(), &req).await
}

// 请求体可省略
pub async fn return_book(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<ReturnBookRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    LIBRARY_SERVICE.return_book(id.0, body, &req).await
}

pub async fn mark_loan_lost(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.mark_loan_lost(id.0, &req).await
}

pub async fn library_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    LIBRARY_SERVICE.library_stats(&req).await
}

pub fn configure_library_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Library);
    let create = || RequirePermission::create(Resource::Library);
    let update = || RequirePermission::update(Resource::Library);

    cfg.service(
        web::scope("/api/v1/library")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("/stats", web::get().to(library_stats).wrap(read()))
            .route("/books", web::get().to(list_books).wrap(read()))
            .route("/books", web::post().to(create_book).wrap(create()))
            .route("/books/{id}", web::get().to(get_book).wrap(read()))
            .route("/books/{id}", web::put().to(update_book).wrap(update()))
            .route(
                "/books/{id}",
                web::delete()
                    .to(delete_book)
                    .wrap(RequirePermission::delete(Resource::Library)),
            )
            .route("/loans", web::get().to(list_loans).wrap(read()))
            .route("/loans", web::post().to(issue_book).wrap(create()))
            .route(
                "/loans/{id}/return",
                web::post().to(return_book).wrap(update()),
            )
            .route(
                "/loans/{id}/lost",
                web::post().to(mark_loan_lost).wrap(update()),
            ),
    );
}
