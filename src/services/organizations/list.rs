use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::models::{ApiResponse, ErrorCode, organizations::OrganizationListParams};
use crate::services::{current_user, error_response};

pub async fn list_organizations(
    service: &OrganizationService,
    params: OrganizationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 其他角色只能通过 /current 查看本组织
    if !current_user(request)?.role.is_super_admin() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only platform administrators can list organizations",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.list_organizations(&params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Organizations retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
