//! 教务基础数据：学年、班级、科目、教学楼与教室

pub mod classes;
pub mod facilities;
pub mod subjects;
pub mod years;

use actix_web::HttpResponse;

use crate::models::ErrorCode;

define_service!(AcademicService);

fn record_not_found(what: &str) -> HttpResponse {
    crate::services::not_found(
        ErrorCode::AcademicRecordNotFound,
        &format!("{what} not found"),
    )
}

/// 必填文本字段：创建时必须提供，更新时若提供则不能为空
pub(crate) fn check_required(value: Option<&str>, field: &str) -> Result<(), String> {
    match value {
        Some(v) if v.trim().is_empty() => Err(format!("{field} is required")),
        Some(v) if v.trim().chars().count() > 100 => {
            Err(format!("{field} must be at most 100 characters"))
        }
        _ => Ok(()),
    }
}

pub(crate) fn check_positive(value: Option<i32>, field: &str) -> Result<(), String> {
    match value {
        Some(v) if v < 1 => Err(format!("{field} must be at least 1")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_required() {
        assert!(check_required(Some("Grade 1"), "Name").is_ok());
        assert!(check_required(None, "Name").is_ok());
        assert_eq!(
            check_required(Some("  "), "Name").unwrap_err(),
            "Name is required"
        );
        assert!(check_required(Some(&"x".repeat(101)), "Name").is_err());
    }

    #[test]
    fn test_check_positive() {
        assert!(check_positive(Some(1), "Capacity").is_ok());
        assert!(check_positive(None, "Capacity").is_ok());
        assert!(check_positive(Some(0), "Capacity").is_err());
    }
}
