pub mod conflicts;
pub mod preferences;
pub mod manage;

use actix_web::HttpResponse;

use crate::models::timetables::TimetableEntryInput;
use crate::models::{ApiResponse, ErrorCode};

define_service!(TimetableService);

fn timetable_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::TimetableNotFound, "Timetable not found")
}

/// 条目校验失败或存在冲突时返回错误响应
fn check_entries(entries: &[TimetableEntryInput]) -> Result<(), HttpResponse> {
    if let Err(msg) = conflicts::validate_entries(entries) {
        return Err(crate::services::bad_request(ErrorCode::ValidationFailed, msg));
    }
    let clashes = conflicts::detect_conflicts(entries);
    if !clashes.is_empty() {
        return Err(HttpResponse::Conflict().json(ApiResponse::error(
            ErrorCode::TimetableConflict,
            clashes,
            "Timetable has scheduling conflicts",
        )));
    }
    Ok(())
}
