use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, staff_not_found};
use crate::models::ApiResponse;
use crate::models::realtime::ChangeAction;
use crate::services::{error_response, realtime::publish_change, tenant_scope};

pub async fn delete_staff(
    service: &StaffService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.delete_staff(&scope, id).await {
        Ok(true) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "staff",
                ChangeAction::Delete,
                id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Staff member deleted successfully",
            )))
        }
        Ok(false) => Ok(staff_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
