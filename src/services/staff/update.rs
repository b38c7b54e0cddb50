use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, staff_not_found, validate_staff_fields};
use crate::models::realtime::ChangeAction;
use crate::models::staff::UpdateStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response_with, realtime::publish_change, tenant_scope};

pub async fn update_staff(
    service: &StaffService,
    id: i64,
    mut req: UpdateStaffRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;

    req.employee_id = req.employee_id.map(|v| v.trim().to_string());
    if let Err(msg) = validate_staff_fields(
        req.employee_id.as_deref(),
        req.full_name.as_deref(),
        req.email.as_deref(),
        req.salary,
    ) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.update_staff(&scope, id, req).await {
        Ok(Some(member)) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "staff",
                ChangeAction::Update,
                member.id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                member,
                "Staff member updated successfully",
            )))
        }
        Ok(None) => Ok(staff_not_found()),
        Err(e) => Ok(error_response_with(&e, ErrorCode::StaffEmployeeIdExists)),
    }
}
