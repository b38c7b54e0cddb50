//! 应收金额与状态计算
//!
//! 所有写操作（创建应收、缴费、减免、删除缴费）都通过这里重新计算剩余金额和状态。

use chrono::NaiveDate;

use super::entities::{AssignmentStatus, ExceptionType};
use crate::models::common::round2;

/// 剩余应收，不小于 0
pub fn remaining_amount(assigned: f64, paid: f64) -> f64 {
    round2((assigned - paid).max(0.0))
}

/// 根据金额和到期日推导状态
///
/// waived / cancelled 保持不变。
pub fn derive_status(
    current: AssignmentStatus,
    assigned: f64,
    paid: f64,
    due_date: NaiveDate,
    today: NaiveDate,
) -> AssignmentStatus {
    if current.is_sticky() {
        return current;
    }
    if remaining_amount(assigned, paid) <= 0.0 {
        AssignmentStatus::Paid
    } else if paid > 0.0 {
        AssignmentStatus::Partial
    } else if due_date < today {
        AssignmentStatus::Overdue
    } else {
        AssignmentStatus::Pending
    }
}

/// 收缴率（百分比，两位小数）
pub fn collection_rate(paid: f64, assigned: f64) -> f64 {
    if assigned <= 0.0 {
        0.0
    } else {
        round2(paid / assigned * 100.0)
    }
}

/// 应用减免后的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedException {
    pub assigned_amount: f64,
    /// 本次减免减少的应收
    pub exception_amount: f64,
    pub waived: bool,
}

/// 在当前应收 `assigned` 上应用一条减免
///
/// `custom` 直接把应收改为给定值，限制在 0..=original。
pub fn apply_exception(
    kind: ExceptionType,
    value: f64,
    original: f64,
    assigned: f64,
) -> AppliedException {
    let new_assigned = match kind {
        ExceptionType::DiscountPercentage => {
            let pct = value.clamp(0.0, 100.0);
            assigned - assigned * pct / 100.0
        }
        ExceptionType::DiscountFixed => (assigned - value.max(0.0)).max(0.0),
        ExceptionType::Waiver => 0.0,
        ExceptionType::Custom => value.clamp(0.0, original.max(0.0)),
    };
    let new_assigned = round2(new_assigned);
    AppliedException {
        assigned_amount: new_assigned,
        exception_amount: round2(assigned - new_assigned),
        waived: kind == ExceptionType::Waiver,
    }
}

/// 撤销一条减免，应收恢复且不超过原始金额
pub fn revert_exception(original: f64, assigned: f64, exception_amount: f64) -> f64 {
    round2((assigned + exception_amount).clamp(0.0, original.max(0.0)))
}

/// 校验缴费金额
pub fn validate_payment(amount: f64, remaining: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("Payment amount must be greater than zero".to_string());
    }
    if round2(amount) > round2(remaining) {
        return Err(format!(
            "Payment amount {amount:.2} exceeds remaining amount {remaining:.2}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(remaining_amount(1000.0, 400.0), 600.0);
        assert_eq!(remaining_amount(1000.0, 1200.0), 0.0);
    }

    #[test]
    fn test_derive_status() {
        let today = date(2026, 3, 10);
        let due_later = date(2026, 4, 1);
        let due_past = date(2026, 3, 1);

        assert_eq!(
            derive_status(AssignmentStatus::Pending, 500.0, 500.0, due_past, today),
            AssignmentStatus::Paid
        );
        assert_eq!(
            derive_status(AssignmentStatus::Pending, 500.0, 100.0, due_past, today),
            AssignmentStatus::Partial
        );
        assert_eq!(
            derive_status(AssignmentStatus::Pending, 500.0, 0.0, due_past, today),
            AssignmentStatus::Overdue
        );
        assert_eq!(
            derive_status(AssignmentStatus::Overdue, 500.0, 0.0, due_later, today),
            AssignmentStatus::Pending
        );
        // 到期当天不算逾期
        assert_eq!(
            derive_status(AssignmentStatus::Pending, 500.0, 0.0, today, today),
            AssignmentStatus::Pending
        );
    }

    #[test]
    fn test_sticky_status() {
        let today = date(2026, 3, 10);
        assert_eq!(
            derive_status(AssignmentStatus::Waived, 500.0, 0.0, date(2026, 1, 1), today),
            AssignmentStatus::Waived
        );
        assert_eq!(
            derive_status(AssignmentStatus::Cancelled, 500.0, 500.0, today, today),
            AssignmentStatus::Cancelled
        );
    }

    #[test]
    fn test_zero_assigned_is_paid() {
        let today = date(2026, 3, 10);
        assert_eq!(
            derive_status(AssignmentStatus::Pending, 0.0, 0.0, date(2026, 1, 1), today),
            AssignmentStatus::Paid
        );
    }

    #[test]
    fn test_collection_rate() {
        assert_eq!(collection_rate(250.0, 1000.0), 25.0);
        assert_eq!(collection_rate(1.0, 3.0), 33.33);
        assert_eq!(collection_rate(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_percentage_discount() {
        let applied = apply_exception(ExceptionType::DiscountPercentage, 25.0, 1000.0, 800.0);
        assert_eq!(applied.assigned_amount, 600.0);
        assert_eq!(applied.exception_amount, 200.0);
        assert!(!applied.waived);

        let clamped = apply_exception(ExceptionType::DiscountPercentage, 150.0, 1000.0, 800.0);
        assert_eq!(clamped.assigned_amount, 0.0);
    }

    #[test]
    fn test_fixed_discount_floors_at_zero() {
        let applied = apply_exception(ExceptionType::DiscountFixed, 300.0, 1000.0, 1000.0);
        assert_eq!(applied.assigned_amount, 700.0);
        assert_eq!(applied.exception_amount, 300.0);

        let floored = apply_exception(ExceptionType::DiscountFixed, 5000.0, 1000.0, 1000.0);
        assert_eq!(floored.assigned_amount, 0.0);
        assert_eq!(floored.exception_amount, 1000.0);
    }

    #[test]
    fn test_waiver() {
        let applied = apply_exception(ExceptionType::Waiver, 0.0, 1000.0, 900.0);
        assert_eq!(applied.assigned_amount, 0.0);
        assert_eq!(applied.exception_amount, 900.0);
        assert!(applied.waived);
    }

    #[test]
    fn test_custom_amount_clamped_to_original() {
        let applied = apply_exception(ExceptionType::Custom, 450.0, 1000.0, 1000.0);
        assert_eq!(applied.assigned_amount, 450.0);
        assert_eq!(applied.exception_amount, 550.0);

        let capped = apply_exception(ExceptionType::Custom, 2000.0, 1000.0, 800.0);
        assert_eq!(capped.assigned_amount, 1000.0);
        assert_eq!(capped.exception_amount, -200.0);
    }

    #[test]
    fn test_revert_exception() {
        let applied = apply_exception(ExceptionType::DiscountFixed, 300.0, 1000.0, 1000.0);
        assert_eq!(
            revert_exception(1000.0, applied.assigned_amount, applied.exception_amount),
            1000.0
        );
        assert_eq!(revert_exception(1000.0, 900.0, 500.0), 1000.0);
    }

    #[test]
    fn test_validate_payment() {
        assert!(validate_payment(100.0, 500.0).is_ok());
        assert!(validate_payment(500.0, 500.0).is_ok());
        assert!(validate_payment(0.0, 500.0).is_err());
        assert!(validate_payment(-5.0, 500.0).is_err());
        assert!(validate_payment(500.01, 500.0).is_err());
        assert!(validate_payment(f64::NAN, 500.0).is_err());
    }
}
