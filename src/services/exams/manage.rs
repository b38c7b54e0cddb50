use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ExamService, exam_not_found};
use crate::models::exams::{CreateExamRequest, ExamListParams, UpdateExamRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, tenant_scope};

const TABLE: &str = "exams";

impl ExamService {
    pub async fn list_exams(
        &self,
        params: ExamListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_exams(&scope, &params).await {
            Ok(exams) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                exams,
                "Exams retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_exam(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_exam(&scope, id).await {
            Ok(Some(exam)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                exam,
                "Exam retrieved successfully",
            ))),
            Ok(None) => Ok(exam_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_exam(
        &self,
        mut req: CreateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Exam name is required"));
        }

        let storage = self.get_storage(request)?;
        match storage.create_exam(&scope, req).await {
            Ok(exam) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, exam.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    exam,
                    "Exam created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_exam(
        &self,
        id: i64,
        req: UpdateExamRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Ok(bad_request(ErrorCode::ValidationFailed, "Exam name is required"));
        }

        let storage = self.get_storage(request)?;
        match storage.update_exam(&scope, id, req).await {
            Ok(Some(exam)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, exam.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    exam,
                    "Exam updated successfully",
                )))
            }
            Ok(None) => Ok(exam_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_exam(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_exam(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted successfully")))
            }
            Ok(false) => Ok(exam_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
