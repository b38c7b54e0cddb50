use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::AttendanceService;
use crate::models::attendance::{AttendanceMark, MarkAttendanceRequest};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, current_user, error_response, tenant_scope};

/// 一次点名中每个学生只能出现一次
pub(crate) fn validate_marks(records: &[AttendanceMark]) -> Result<(), String> {
    if records.is_empty() {
        return Err("At least one attendance record is required".to_string());
    }
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.student_id) {
            return Err(format!(
                "Student {} appears more than once",
                record.student_id
            ));
        }
    }
    Ok(())
}

impl AttendanceService {
    /// 按 (学生, 日期) 插入或更新
    pub async fn mark_attendance(
        &self,
        req: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = current_user(request)?;
        let scope = tenant_scope(request)?;

        if let Err(msg) = validate_marks(&req.records) {
            return Ok(bad_request(ErrorCode::AttendanceInvalid, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.mark_attendance(&scope, user.id, req).await {
            Ok(result) => {
                for record in &result.records {
                    publish_school_change(&scope, "attendance", ChangeAction::Update, record.id);
                }
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    result,
                    "Attendance marked successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceStatus;

    fn mark(student_id: i64) -> AttendanceMark {
        AttendanceMark {
            student_id,
            status: AttendanceStatus::Present,
            remarks: None,
        }
    }

    #[test]
    fn test_validate_marks() {
        assert!(validate_marks(&[mark(1), mark(2)]).is_ok());
        assert!(validate_marks(&[]).is_err());
        let err = validate_marks(&[mark(1), mark(1)]).unwrap_err();
        assert!(err.contains("Student 1"));
    }
}
