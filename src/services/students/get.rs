use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, student_not_found};
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_scope};

pub async fn get_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_student(&scope, id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
