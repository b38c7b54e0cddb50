use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AcademicService, check_required, record_not_found};
use crate::models::academic::{CreateAcademicYearRequest, UpdateAcademicYearRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, error_response_with, tenant_scope};

const TABLE: &str = "academic_years";

impl AcademicService {
    pub async fn list_academic_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_academic_years(&scope).await {
            Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                years,
                "Academic years retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_academic_year(
        &self,
        mut req: CreateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        req.name = req.name.trim().to_string();
        if let Err(msg) = check_required(Some(&req.name), "Name") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.create_academic_year(&scope, req).await {
            Ok(year) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, year.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    year,
                    "Academic year created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_academic_year(
        &self,
        id: i64,
        req: UpdateAcademicYearRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = check_required(req.name.as_deref(), "Name") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.update_academic_year(&scope, id, req).await {
            Ok(Some(year)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, year.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    year,
                    "Academic year updated successfully",
                )))
            }
            Ok(None) => Ok(record_not_found("Academic year")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 设为当前学年，同校其他学年的标记被清除
    pub async fn set_current_academic_year(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.set_current_academic_year(&scope, id).await {
            Ok(Some(year)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, year.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    year,
                    "Current academic year updated",
                )))
            }
            Ok(None) => Ok(record_not_found("Academic year")),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_academic_year(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_academic_year(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Academic year deleted successfully",
                )))
            }
            Ok(false) => Ok(record_not_found("Academic year")),
            Err(e) => Ok(error_response_with(&e, ErrorCode::AcademicRecordInUse)),
        }
    }
}
