//! 收费服务
//!
//! 金额与状态的计算规则在 `models::fees::calc`，存储层在事务中调用；
//! 这里负责请求校验、错误码映射和变更推送。

pub mod assignments;
pub mod exceptions;
pub mod payments;
pub mod reports;
pub mod structures;

use actix_web::HttpResponse;

use crate::errors::NazimError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, error_status, not_found};

define_service!(FeeService);

fn structure_not_found() -> HttpResponse {
    not_found(ErrorCode::FeeStructureNotFound, "Fee structure not found")
}

fn assignment_not_found() -> HttpResponse {
    not_found(ErrorCode::FeeAssignmentNotFound, "Fee assignment not found")
}

/// 金额必须是非负有限数
pub(crate) fn check_amount(amount: Option<f64>, label: &str) -> Result<(), String> {
    match amount {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(format!("{label} must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// 校验失败和冲突统一使用指定业务码，其余错误走通用映射
fn domain_error(err: &NazimError, code: ErrorCode) -> HttpResponse {
    match err {
        NazimError::Validation(_) | NazimError::Conflict(_) => {
            let (status, _) = error_status(err);
            HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
        }
        _ => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_check_amount() {
        assert!(check_amount(None, "Amount").is_ok());
        assert!(check_amount(Some(0.0), "Amount").is_ok());
        assert!(check_amount(Some(-0.5), "Amount").is_err());
        assert!(check_amount(Some(f64::INFINITY), "Amount").is_err());
    }

    #[test]
    fn test_domain_error_keeps_status() {
        let resp = domain_error(&NazimError::validation("bad"), ErrorCode::FeePaymentInvalid);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = domain_error(&NazimError::conflict("sticky"), ErrorCode::FeePaymentInvalid);
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let resp = domain_error(&NazimError::not_found("x"), ErrorCode::FeePaymentInvalid);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
