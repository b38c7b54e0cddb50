use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicService, check_required, record_not_found};
use crate::models::academic::{AcademicListParams, CreateSubjectRequest, UpdateSubjectRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, tenant_scope};

const TABLE: &str = "subjects";

fn check_subject(name: Option<&str>, code: Option<&str>) -> Result<(), String> {
    check_required(name, "Subject name")?;
    check_required(code, "Subject code")
}

impl AcademicService {
    pub async fn list_subjects(
        &self,
        params: AcademicListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_subjects(&scope, &params).await {
            Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                subjects,
                "Subjects retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_subject(
        &self,
        mut req: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        // 科目代码统一大写
        req.code = req.code.trim().to_uppercase();
        if let Err(msg) = check_subject(Some(&req.name), Some(&req.code)) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_subject(&scope, req).await {
            Ok(subject) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, subject.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    subject,
                    "Subject created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_subject(
        &self,
        id: i64,
        mut req: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.code = req.code.map(|c| c.trim().to_uppercase());
        if let Err(msg) = check_subject(req.name.as_deref(), req.code.as_deref()) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_subject(&scope, id, req).await {
            Ok(Some(subject)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, subject.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    subject,
                    "Subject updated successfully",
                )))
            }
            Ok(None) => Ok(record_not_found("Subject")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_subject(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Subject deleted successfully",
                )))
            }
            Ok(false) => Ok(record_not_found("Subject")),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
