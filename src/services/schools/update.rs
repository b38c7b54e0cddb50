use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SchoolService, evict_school_cache, validate_school_fields};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode, schools::UpdateSchoolRequest};
use crate::services::{
    bad_request, error_response_with, not_found, org_scope, realtime::publish_change,
};

pub async fn update_school(
    service: &SchoolService,
    id: i64,
    req: UpdateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_school_fields(
        req.name.as_deref(),
        req.code.as_deref(),
        req.email.as_deref(),
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let scope = org_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.update_school(&scope, id, req).await {
        Ok(Some(school)) => {
            evict_school_cache(request, scope.organization_id, school.id).await;
            publish_change(
                scope.organization_id,
                Some(school.id),
                "schools",
                ChangeAction::Update,
                school.id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                school,
                "School updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SchoolNotFound, "School not found")),
        Err(e) => Ok(error_response_with(&e, ErrorCode::SchoolCodeExists)),
    }
}
