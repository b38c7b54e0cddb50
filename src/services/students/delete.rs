use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, student_not_found};
use crate::models::ApiResponse;
use crate::models::realtime::ChangeAction;
use crate::services::{error_response, realtime::publish_change, tenant_scope};

pub async fn delete_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;
    let storage = service.get_storage(request)?;

    match storage.delete_student(&scope, id).await {
        Ok(true) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "students",
                ChangeAction::Delete,
                id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
        }
        Ok(false) => Ok(student_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
