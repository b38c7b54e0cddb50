use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StaffService;
use crate::models::ApiResponse;
use crate::models::staff::StaffListParams;
use crate::services::{error_response, tenant_scope};

pub async fn list_staff(
    service: &StaffService,
    params: StaffListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.list_staff(&scope, &params).await {
        Ok(staff) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            staff,
            "Staff retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
