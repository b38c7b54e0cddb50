use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SchoolService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found, org_scope};

pub async fn get_school(
    service: &SchoolService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = org_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_school(&scope, id).await {
        Ok(Some(school)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            school,
            "School retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(error_response(&e)),
    }
}
