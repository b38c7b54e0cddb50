use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::models::common::round2;
use crate::models::fees::reports::{CollectionReport, MethodCollection, PeriodCollection};
use crate::models::fees::{FeePayment, PaymentMethod};

const MONTHS: usize = 12;

fn period_rows(groups: BTreeMap<String, (f64, i64)>) -> impl DoubleEndedIterator<Item = PeriodCollection> {
    groups.into_iter().map(|(period, (total, count))| PeriodCollection {
        period,
        total: round2(total),
        count,
    })
}

/// 月度（最近 12 个月，新的在前）、按方式（金额降序）、本月按日
pub(crate) fn collection_report(payments: &[FeePayment], today: NaiveDate) -> CollectionReport {
    let mut monthly: BTreeMap<String, (f64, i64)> = BTreeMap::new();
    let mut daily: BTreeMap<String, (f64, i64)> = BTreeMap::new();
    let mut methods: HashMap<PaymentMethod, (f64, i64)> = HashMap::new();

    for p in payments {
        let month = monthly
            .entry(p.payment_date.format("%Y-%m").to_string())
            .or_default();
        month.0 += p.amount;
        month.1 += 1;

        let method = methods.entry(p.payment_method).or_default();
        method.0 += p.amount;
        method.1 += 1;

        if p.payment_date.year() == today.year() && p.payment_date.month() == today.month() {
            let day = daily
                .entry(p.payment_date.format("%Y-%m-%d").to_string())
                .or_default();
            day.0 += p.amount;
            day.1 += 1;
        }
    }

    let mut by_method: Vec<MethodCollection> = methods
        .into_iter()
        .map(|(payment_method, (total, count))| MethodCollection {
            payment_method,
            total: round2(total),
            count,
        })
        .collect();
    by_method.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then(a.payment_method.as_str().cmp(b.payment_method.as_str()))
    });

    CollectionReport {
        total_collected: round2(payments.iter().map(|p| p.amount).sum()),
        payment_count: payments.len() as i64,
        monthly: period_rows(monthly).rev().take(MONTHS).collect(),
        by_method,
        daily: period_rows(daily).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fees::reports::tests::date;
    use chrono::Utc;

    fn payment(amount: f64, on: NaiveDate, method: PaymentMethod) -> FeePayment {
        FeePayment {
            id: 1,
            organization_id: 1,
            school_id: 1,
            fee_assignment_id: 1,
            student_id: 1,
            amount,
            payment_date: on,
            payment_method: method,
            reference_no: None,
            received_by: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_collection_report() {
        let today = date(2026, 3, 10);
        let payments = vec![
            payment(100.0, date(2026, 3, 2), PaymentMethod::Cash),
            payment(50.5, date(2026, 3, 2), PaymentMethod::BankTransfer),
            payment(200.0, date(2026, 3, 9), PaymentMethod::BankTransfer),
            payment(300.0, date(2026, 2, 15), PaymentMethod::Cash),
            payment(75.0, date(2025, 3, 5), PaymentMethod::Cheque),
        ];

        let report = collection_report(&payments, today);
        assert_eq!(report.total_collected, 725.5);
        assert_eq!(report.payment_count, 5);

        let months: Vec<_> = report.monthly.iter().map(|m| (m.period.as_str(), m.total)).collect();
        assert_eq!(
            months,
            vec![("2026-03", 350.5), ("2026-02", 300.0), ("2025-03", 75.0)]
        );

        let methods: Vec<_> = report.by_method.iter().map(|m| (m.payment_method, m.count)).collect();
        assert_eq!(
            methods,
            vec![
                (PaymentMethod::Cash, 2),
                (PaymentMethod::BankTransfer, 2),
                (PaymentMethod::Cheque, 1),
            ]
        );

        // 上一年同月不计入本月按日统计
        let days: Vec<_> = report.daily.iter().map(|d| (d.period.as_str(), d.count)).collect();
        assert_eq!(days, vec![("2026-03-02", 2), ("2026-03-09", 1)]);
    }

    #[test]
    fn test_monthly_keeps_latest_twelve() {
        let payments: Vec<_> = (1..=14)
            .map(|i| {
                let on = date(2025, 1, 1) + chrono::Months::new(i);
                payment(10.0, on, PaymentMethod::Cash)
            })
            .collect();
        let report = collection_report(&payments, date(2026, 3, 10));
        assert_eq!(report.monthly.len(), 12);
        assert_eq!(report.monthly[0].period, "2026-03");
        assert_eq!(report.monthly[11].period, "2025-04");
    }
}
