use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TimetableService, check_entries, timetable_not_found};
use crate::models::realtime::ChangeAction;
use crate::models::timetables::{
    CreateTimetableRequest, ReplaceEntriesRequest, TimetableListParams, UpdateTimetableRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, current_user, error_response, tenant_scope};

const TABLE: &str = "timetables";

impl TimetableService {
    pub async fn list_timetables(
        &self,
        params: TimetableListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_timetables(&scope, &params).await {
            Ok(timetables) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                timetables,
                "Timetables retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 课表及其条目（按星期、节次排序）
    pub async fn get_timetable(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_timetable(&scope, id).await {
            Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Timetable retrieved successfully",
            ))),
            Ok(None) => Ok(timetable_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn create_timetable(
        &self,
        mut req: CreateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        let scope = tenant_scope(request)?;

        req.name = req.name.trim().to_string();
        if req.name.is_empty() {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Timetable name is required",
            ));
        }
        if let Err(resp) = check_entries(&req.entries) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage.create_timetable(&scope, user.id, req).await {
            Ok(detail) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, detail.timetable.id);
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    detail,
                    "Timetable created successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn update_timetable(
        &self,
        id: i64,
        req: UpdateTimetableRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Timetable name is required",
            ));
        }

        let storage = self.get_storage(request)?;
        match storage.update_timetable(&scope, id, req).await {
            Ok(Some(timetable)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, timetable.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    timetable,
                    "Timetable updated successfully",
                )))
            }
            Ok(None) => Ok(timetable_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 整体替换课表条目
    pub async fn replace_entries(
        &self,
        id: i64,
        req: ReplaceEntriesRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(resp) = check_entries(&req.entries) {
            return Ok(resp);
        }

        let storage = self.get_storage(request)?;
        match storage
            .replace_timetable_entries(&scope, id, req.entries)
            .await
        {
            Ok(Some(detail)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    detail,
                    "Timetable entries saved successfully",
                )))
            }
            Ok(None) => Ok(timetable_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_timetable(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_timetable(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Timetable deleted successfully",
                )))
            }
            Ok(false) => Ok(timetable_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
