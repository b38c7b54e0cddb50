pub mod mark;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::AttendanceListParams;
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{error_response, not_found, tenant_scope};

define_service!(AttendanceService);

impl AttendanceService {
    pub async fn list_attendance(
        &self,
        params: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_attendance(&scope, &params).await {
            Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                records,
                "Attendance records retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_attendance(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_attendance(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, "attendance", ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Attendance record deleted successfully",
                )))
            }
            Ok(false) => Ok(not_found(
                ErrorCode::NotFound,
                "Attendance record not found",
            )),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
