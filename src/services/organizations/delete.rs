use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::OrganizationService;
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response_with, not_found, realtime::publish_change};

pub async fn delete_organization(
    service: &OrganizationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_organization(id).await {
        Ok(true) => {
            info!("Organization {} deleted", id);
            publish_change(id, None, "organizations", ChangeAction::Delete, id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Organization deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::OrganizationNotFound,
            "Organization not found",
        )),
        Err(e) => Ok(error_response_with(&e, ErrorCode::OrganizationHasSchools)),
    }
}
