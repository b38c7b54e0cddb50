use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, staff_not_found};
use crate::models::ApiResponse;
use crate::services::{error_response, tenant_scope};

pub async fn get_staff(
    service: &StaffService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_staff(&scope, id).await {
        Ok(Some(member)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            member,
            "Staff member retrieved successfully",
        ))),
        Ok(None) => Ok(staff_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
