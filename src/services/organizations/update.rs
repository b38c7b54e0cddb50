use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode, organizations::UpdateOrganizationRequest};
use crate::services::{bad_request, error_response, not_found, realtime::publish_change};
use crate::utils::validate::validate_email;

pub async fn update_organization(
    service: &OrganizationService,
    id: i64,
    mut req: UpdateOrganizationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = req.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Organization name cannot be empty",
            ));
        }
    }
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty())
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.update_organization(id, req).await {
        Ok(Some(org)) => {
            publish_change(org.id, None, "organizations", ChangeAction::Update, org.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                org,
                "Organization updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::OrganizationNotFound,
            "Organization not found",
        )),
        Err(e) => Ok(error_response(&e)),
    }
}
