use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::{FeeService, check_amount, domain_error};
use crate::models::activity_logs::ActivityLogListParams;
use crate::models::fees::requests::{
    CreateFeeExceptionRequest, FeeExceptionListParams, UpdateFeeExceptionRequest,
};
use crate::models::fees::{ExceptionType, FeeAssignment};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{
    bad_request, current_user, error_response, not_found, tenant_scope, today,
};

const TABLE: &str = "fee_exceptions";

fn exception_not_found() -> HttpResponse {
    not_found(ErrorCode::FeeExceptionNotFound, "Fee exception not found")
}

fn student_mismatch() -> HttpResponse {
    bad_request(
        ErrorCode::FeeExceptionStudentMismatch,
        "Exception student mismatch",
    )
}

pub(crate) fn validate_exception(
    kind: ExceptionType,
    value: f64,
    reason: &str,
) -> Result<(), String> {
    if reason.trim().is_empty() {
        return Err("Exception reason is required".to_string());
    }
    match kind {
        ExceptionType::Waiver => Ok(()),
        ExceptionType::DiscountPercentage if value > 100.0 => {
            Err("Discount percentage must not exceed 100".to_string())
        }
        _ => check_amount(Some(value), "Exception value"),
    }
}

/// 生效区间：结束日期不得早于开始日期
pub(crate) fn validate_period(
    valid_from: Option<NaiveDate>,
    valid_to: Option<NaiveDate>,
) -> Result<(), String> {
    match (valid_from, valid_to) {
        (Some(from), Some(to)) if to < from => {
            Err("Exception valid_to must not be earlier than valid_from".to_string())
        }
        _ => Ok(()),
    }
}

/// 减免的学生必须是应收的学生
fn student_matches(assignment: &FeeAssignment, student_id: i64) -> bool {
    assignment.student_id == student_id
}

impl FeeService {
    pub async fn list_exceptions(
        &self,
        params: FeeExceptionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_fee_exceptions(&scope, &params).await {
            Ok(exceptions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                exceptions,
                "Fee exceptions retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn get_exception(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_fee_exception(&scope, id).await {
            Ok(Some(exception)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                exception,
                "Fee exception retrieved successfully",
            ))),
            Ok(None) => Ok(exception_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 创建减免并立即作用到应收（同一事务）
    pub async fn create_exception(
        &self,
        req: CreateFeeExceptionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        if let Err(msg) = validate_exception(req.exception_type, req.value, &req.reason)
            .and_then(|_| validate_period(req.valid_from, req.valid_to))
        {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        let storage = self.get_storage(request)?;
        match storage.get_fee_assignment(&scope, req.fee_assignment_id).await {
            Ok(Some(assignment)) if !student_matches(&assignment, req.student_id) => {
                return Ok(student_mismatch());
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::ValidationFailed,
                    format!(
                        "Fee assignment {} does not exist in this school",
                        req.fee_assignment_id
                    ),
                ));
            }
            Err(e) => return Ok(error_response(&e)),
        }

        match storage
            .create_fee_exception(&scope, user.id, req, today())
            .await
        {
            Ok((exception, assignment)) => {
                publish_school_change(&scope, TABLE, ChangeAction::Insert, exception.id);
                publish_school_change(
                    &scope,
                    "fee_assignments",
                    ChangeAction::Update,
                    assignment.id,
                );
                Ok(HttpResponse::Created().json(ApiResponse::success(
                    exception,
                    "Fee exception created successfully",
                )))
            }
            Err(e) => Ok(domain_error(&e, ErrorCode::ValidationFailed)),
        }
    }

    /// 换挂应收或启停时应收随之撤销、重新应用
    pub async fn update_exception(
        &self,
        id: i64,
        req: UpdateFeeExceptionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        if req.reason.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Ok(bad_request(
                ErrorCode::ValidationFailed,
                "Exception reason is required",
            ));
        }

        let storage = self.get_storage(request)?;
        let existing = match storage.get_fee_exception(&scope, id).await {
            Ok(Some(exception)) => exception,
            Ok(None) => return Ok(exception_not_found()),
            Err(e) => return Ok(error_response(&e)),
        };
        if let Err(msg) = validate_period(
            req.valid_from.or(Some(existing.valid_from)),
            req.valid_to.or(existing.valid_to),
        ) {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }

        // 改挂到其他应收或改学生时重新校验归属
        if req.fee_assignment_id.is_some() || req.student_id.is_some() {
            let assignment_id = req.fee_assignment_id.unwrap_or(existing.fee_assignment_id);
            let student_id = req.student_id.unwrap_or(existing.student_id);
            match storage.get_fee_assignment(&scope, assignment_id).await {
                Ok(Some(assignment)) if !student_matches(&assignment, student_id) => {
                    return Ok(student_mismatch());
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    return Ok(bad_request(
                        ErrorCode::ValidationFailed,
                        format!("Fee assignment {assignment_id} does not exist in this school"),
                    ));
                }
                Err(e) => return Ok(error_response(&e)),
            }
        }

        match storage
            .update_fee_exception(&scope, user.id, id, req, today())
            .await
        {
            Ok(Some((exception, assignments))) => {
                publish_school_change(&scope, TABLE, ChangeAction::Update, exception.id);
                for assignment in &assignments {
                    publish_school_change(
                        &scope,
                        "fee_assignments",
                        ChangeAction::Update,
                        assignment.id,
                    );
                }
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    exception,
                    "Fee exception updated successfully",
                )))
            }
            Ok(None) => Ok(exception_not_found()),
            Err(e) => Ok(domain_error(&e, ErrorCode::ValidationFailed)),
        }
    }

    /// 删除减免时把减少的金额加回应收
    pub async fn delete_exception(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let user = current_user(request)?;
        let storage = self.get_storage(request)?;

        match storage
            .delete_fee_exception(&scope, user.id, id, today())
            .await
        {
            Ok(true) => {
                publish_school_change(&scope, TABLE, ChangeAction::Delete, id);
                Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                    "Fee exception deleted successfully",
                )))
            }
            Ok(false) => Ok(exception_not_found()),
            Err(e) => Ok(error_response(&e)),
        }
    }

    /// 收费操作日志，目前来自减免的创建、修改和删除
    pub async fn list_activity(
        &self,
        params: ActivityLogListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.list_activity_logs(&scope, &params).await {
            Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                logs,
                "Activity logs retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_exception() {
        assert!(validate_exception(ExceptionType::Waiver, -1.0, "hardship").is_ok());
        assert!(validate_exception(ExceptionType::DiscountPercentage, 20.0, "sibling").is_ok());
        assert!(validate_exception(ExceptionType::DiscountPercentage, 120.0, "sibling").is_err());
        assert!(validate_exception(ExceptionType::DiscountFixed, -5.0, "x").is_err());
        assert!(validate_exception(ExceptionType::Custom, 300.0, "  ").is_err());
    }

    #[test]
    fn test_validate_period() {
        let from = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        assert!(validate_period(Some(from), Some(to)).is_ok());
        assert!(validate_period(Some(from), None).is_ok());
        assert!(validate_period(None, Some(to)).is_ok());
        assert!(validate_period(Some(to), Some(from)).is_err());
    }
}
