use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, student_not_found, validate_student_fields};
use crate::models::realtime::ChangeAction;
use crate::models::students::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response_with, realtime::publish_change, tenant_scope};

pub async fn update_student(
    service: &StudentService,
    id: i64,
    mut req: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;

    req.admission_no = req.admission_no.map(|v| v.trim().to_string());
    req.full_name = req.full_name.map(|v| v.trim().to_string());
    if let Err(msg) = validate_student_fields(req.admission_no.as_deref(), req.full_name.as_deref())
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.update_student(&scope, id, req).await {
        Ok(Some(student)) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "students",
                ChangeAction::Update,
                student.id,
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(student_not_found()),
        Err(e) => Ok(error_response_with(&e, ErrorCode::StudentAdmissionNoExists)),
    }
}
