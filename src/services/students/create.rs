use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, validate_student_fields};
use crate::models::realtime::ChangeAction;
use crate::models::students::CreateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, error_response_with, realtime::publish_change, tenant_scope};

pub async fn create_student(
    service: &StudentService,
    mut req: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let scope = tenant_scope(request)?;

    req.admission_no = req.admission_no.trim().to_string();
    req.full_name = req.full_name.trim().to_string();
    if let Err(msg) = validate_student_fields(Some(&req.admission_no), Some(&req.full_name)) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.create_student(&scope, req).await {
        Ok(student) => {
            publish_change(
                scope.organization_id,
                Some(scope.school_id),
                "students",
                ChangeAction::Insert,
                student.id,
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::StudentAdmissionNoExists)),
    }
}
