use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, validate_staff_fields};
use crate::models::realtime::ChangeAction;
use crate::models::staff::CreateStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response_with, realtime::publish_change, tenant_scope};

pub async fn create_staff(
    service: &StaffService,
    mut req: CreateStaffRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;

    req.employee_id = req.employee_id.trim().to_string();
    req.full_name = req.full_name.trim().to_string();
    if let Err(msg) = validate_staff_fields(
        Some(&req.employee_id),
        Some(&req.full_name),
        req.email.as_deref(),
        req.salary,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.create_staff(&scope, req).await {
        Ok(member) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "staff",
                ChangeAction::Insert,
                member.id,
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                member,
                "Staff member created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::StaffEmployeeIdExists)),
    }
}
