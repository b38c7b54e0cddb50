use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicService, check_positive, check_required, record_not_found};
use crate::models::academic::{ClassListParams, CreateClassRequest, UpdateClassRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, tenant_scope};

const TABLE: &str = "classes";

fn check_class(name: Option<&str>, capacity: Option<i32>) -> Result<(), String> {
    check_required(name, "Class name")?;
    check_positive(capacity, "Capacity")
}

impl AcademicService {
    pub async fn list_classes(
        &self,
        params: ClassListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_classes(&scope, &params).await {
            Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                classes,
                "Classes retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_class(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_class(&scope, id).await {
            Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                class,
                "Class retrieved successfully",
            ))),
            Ok(None) => Ok(record_not_found("Class")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_class(
        &self,
        mut req: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        if let Err(msg) = check_class(Some(&req.name), req.capacity) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_class(&scope, req).await {
            Ok(class) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, class.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    class,
                    "Class created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_class(
        &self,
        id: i64,
        req: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_class(req.name.as_deref(), req.capacity) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_class(&scope, id, req).await {
            Ok(Some(class)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, class.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    class,
                    "Class updated successfully",
                )))
            }
            Ok(None) => Ok(record_not_found("Class")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_class(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_class(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
            }
            Ok(false) => Ok(record_not_found("Class")),
            Err(e) => Ok(error_response_with(&e, ErrorCode::AcademicRecordInUse)),
        }
    }
}
