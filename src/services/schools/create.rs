use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SchoolService, validate_school_fields};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode, schools::CreateSchoolRequest};
use crate::services::{bad_request, error_response_with, org_scope, realtime::publish_change};

pub async fn create_school(
    service: &SchoolService,
    mut req: CreateSchoolRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.name = req.name.trim().to_string();
    req.code = req.code.trim().to_string();
    if let Err(msg) =
        validate_school_fields(Some(&req.name), Some(&req.code), req.email.as_deref())
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let scope = org_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.create_school(&scope, req).await {
        Ok(school) => {
            publish_change(
                scope.organization_id,
                Some(school.id),
                "schools",
                ChangeAction::Insert,
                school.id,
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                school,
                "School created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::SchoolCodeExists)),
    }
}
