pub mod create;
pub mod delete;
pub mod get;
pub mod import;
pub mod list;
pub mod stats;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ErrorCode;
use crate::models::students::{
    CreateStudentRequest, StudentImportParams, StudentListParams, UpdateStudentRequest,
};

define_service!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        params: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, params, request).await
    }

    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, req, request).await
    }

    pub async fn get_student(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_student(self, id, request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        req: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, id, req, request).await
    }

    pub async fn delete_student(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, id, request).await
    }

    pub async fn student_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::student_stats(self, request).await
    }

    pub async fn import_students(
        &self,
        params: StudentImportParams,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_students(self, params, payload, request).await
    }
}

fn student_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::StudentNotFound, "Student not found")
}

/// 学号与姓名不能为空
pub(crate) fn validate_student_fields(
    admission_no: Option<&str>,
    full_name: Option<&str>,
) -> Result<(), &'static str> {
    if admission_no.is_some_and(|v| v.trim().is_empty()) {
        return Err("Admission number is required");
    }
    if admission_no.is_some_and(|v| v.trim().chars().count() > 50) {
        return Err("Admission number must be at most 50 characters");
    }
    if full_name.is_some_and(|v| v.trim().is_empty()) {
        return Err("Full name is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_student_fields() {
        assert!(validate_student_fields(Some("A-001"), Some("Ali Khan")).is_ok());
        assert!(validate_student_fields(None, None).is_ok());
        assert!(validate_student_fields(Some("  "), Some("Ali")).is_err());
        assert!(validate_student_fields(Some("A-1"), Some("")).is_err());
        assert!(validate_student_fields(Some(&"9".repeat(51)), None).is_err());
    }
}
