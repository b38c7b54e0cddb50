use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TimetableService;
use crate::models::realtime::ChangeAction;
use crate::models::timetables::{TeacherPreferenceListParams, UpsertTeacherPreferenceRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, not_found, tenant_scope};

const TABLE: &str = "teacher_preferences";

pub(crate) fn validate_preference(req: &UpsertTeacherPreferenceRequest) -> Result<(), String> {
    if let Some(bad) = req.unavailable_periods.iter().find(|p| **p < 1) {
        return Err(format!("Invalid period {bad}: periods start at 1"));
    }
    if req.max_periods_per_day.is_some_and(|m| m < 1) {
        return Err("Max periods per day must be at least 1".to_string());
    }
    Ok(())
}

impl TimetableService {
    pub async fn list_teacher_preferences(
        &self,
        params: TeacherPreferenceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_teacher_preferences(&scope, &params).await {
            Ok(prefs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                prefs,
                "Teacher preferences retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 按 (教师, 学年) 新建或覆盖
    pub async fn upsert_teacher_preference(
        &self,
        mut req: UpsertTeacherPreferenceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        if let Err(msg) = validate_preference(&req) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        req.unavailable_periods.sort_unstable();
        req.unavailable_periods.dedup();
        req.preferred_days.sort_by_key(|d| d.order());
        req.preferred_days.dedup();

        let storage = self.get_storage(request)?;
        match storage.upsert_teacher_preference(&scope, req).await {
            Ok(pref) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, pref.id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    pref,
                    "Teacher preference saved successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn delete_teacher_preference(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.delete_teacher_preference(&scope, id).await {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Teacher preference deleted successfully",
                )))
            }
            Ok(false) => Ok(not_found(
                ErrorCode::NotFound,
                "Teacher preference not found",
            )),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(periods: Vec<i32>, max: Option<i32>) -> UpsertTeacherPreferenceRequest {
        UpsertTeacherPreferenceRequest {
            teacher_id: 1,
            academic_year_id: None,
            preferred_days: vec![],
            unavailable_periods: periods,
            max_periods_per_day: max,
            notes: None,
        }
    }

    #[test]
    fn test_validate_preference() {
        assert!(validate_preference(&request(vec![1, 4], Some(6))).is_ok());
        assert!(validate_preference(&request(vec![0], None)).is_err());
        assert!(validate_preference(&request(vec![], Some(0))).is_err());
    }
}
