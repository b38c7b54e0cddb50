use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response, not_found};

pub async fn get_organization(
    service: &OrganizationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if !user.role.is_super_admin() && user.organization_id != Some(id) {
        return Ok(not_found(
            ErrorCode::OrganizationNotFound,
            "Organization not found",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.get_organization(id).await {
        Ok(Some(org)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            org,
            "Organization retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::OrganizationNotFound,
            "Organization not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn current_organization(
    service: &OrganizationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let Some(organization_id) = user.organization_id else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::OrganizationRequired,
            "User must be assigned to an organization",
        )));
    };
    get_organization(service, organization_id, request).await
}
