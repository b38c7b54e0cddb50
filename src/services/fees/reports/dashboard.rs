use std::collections::{HashMap, HashSet};

use super::ReportData;
use crate::models::common::round2;
use crate::models::fees::calc::collection_rate;
use crate::models::fees::reports::{
    ClassFeeBreakdown, ExceptionImpact, ExceptionStats, ExceptionTypeStat, FeeDashboard,
    FeeSummary, RecentPayment, StatusCounts, StructureFeeBreakdown,
};
use crate::models::fees::{AssignmentStatus, ExceptionType, FeeAssignment, FeeException, FeePayment};

const RECENT_PAYMENTS: usize = 10;

#[derive(Default)]
struct Totals {
    count: i64,
    students: HashSet<i64>,
    assigned: f64,
    paid: f64,
    remaining: f64,
}

impl Totals {
    fn add(&mut self, a: &FeeAssignment) {
        self.count += 1;
        self.students.insert(a.student_id);
        self.assigned += a.assigned_amount;
        self.paid += a.paid_amount;
        self.remaining += a.remaining_amount;
    }
}

pub(crate) fn build_dashboard(
    data: &ReportData,
    payments: &[FeePayment],
    exceptions: &[FeeException],
) -> FeeDashboard {
    FeeDashboard {
        summary: summarize(&data.assignments),
        by_class: by_class(data),
        by_structure: by_structure(data),
        recent_payments: recent_payments(data, payments),
        exceptions: exception_stats(&data.assignments, exceptions),
    }
}

pub(crate) fn summarize(assignments: &[FeeAssignment]) -> FeeSummary {
    let mut totals = Totals::default();
    let mut counts = StatusCounts::default();
    for a in assignments {
        totals.add(a);
        match a.status {
            AssignmentStatus::Paid => counts.paid += 1,
            AssignmentStatus::Partial => counts.partial += 1,
            AssignmentStatus::Pending => counts.pending += 1,
            AssignmentStatus::Overdue => counts.overdue += 1,
            AssignmentStatus::Waived => counts.waived += 1,
            AssignmentStatus::Cancelled => {}
        }
    }

    FeeSummary {
        total_assignments: totals.count,
        total_students: totals.students.len() as i64,
        total_assigned: round2(totals.assigned),
        total_paid: round2(totals.paid),
        total_remaining: round2(totals.remaining),
        collection_rate: collection_rate(totals.paid, totals.assigned),
        status_counts: counts,
    }
}

/// 仅统计带班级的应收，按班级名排序
fn by_class(data: &ReportData) -> Vec<ClassFeeBreakdown> {
    let mut groups: HashMap<i64, Totals> = HashMap::new();
    for a in &data.assignments {
        if let Some(class_id) = a.class_id {
            groups.entry(class_id).or_default().add(a);
        }
    }

    let mut rows: Vec<ClassFeeBreakdown> = groups
        .into_iter()
        .map(|(class_id, t)| ClassFeeBreakdown {
            class_id,
            class_name: data.class_name(Some(class_id)).unwrap_or_default(),
            assignment_count: t.count,
            student_count: t.students.len() as i64,
            total_assigned: round2(t.assigned),
            total_paid: round2(t.paid),
            total_remaining: round2(t.remaining),
            collection_rate: collection_rate(t.paid, t.assigned),
        })
        .collect();
    rows.sort_by(|a, b| a.class_name.cmp(&b.class_name).then(a.class_id.cmp(&b.class_id)));
    rows
}

fn by_structure(data: &ReportData) -> Vec<StructureFeeBreakdown> {
    let mut groups: HashMap<i64, Totals> = HashMap::new();
    for a in &data.assignments {
        groups.entry(a.fee_structure_id).or_default().add(a);
    }

    let mut rows: Vec<StructureFeeBreakdown> = groups
        .into_iter()
        .map(|(id, t)| StructureFeeBreakdown {
            fee_structure_id: id,
            structure_name: data.structure_name(id),
            fee_type: data.structures.get(&id).map(|s| s.fee_type),
            assignment_count: t.count,
            total_assigned: round2(t.assigned),
            total_paid: round2(t.paid),
            total_remaining: round2(t.remaining),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.structure_name
            .cmp(&b.structure_name)
            .then(a.fee_structure_id.cmp(&b.fee_structure_id))
    });
    rows
}

fn recent_payments(data: &ReportData, payments: &[FeePayment]) -> Vec<RecentPayment> {
    let assignments: HashMap<i64, &FeeAssignment> =
        data.assignments.iter().map(|a| (a.id, a)).collect();

    let mut recent: Vec<(&FeePayment, &FeeAssignment)> = payments
        .iter()
        .filter_map(|p| assignments.get(&p.fee_assignment_id).map(|a| (p, *a)))
        .collect();
    recent.sort_by(|(a, _), (b, _)| b.payment_date.cmp(&a.payment_date).then(b.id.cmp(&a.id)));

    recent
        .into_iter()
        .take(RECENT_PAYMENTS)
        .map(|(p, a)| RecentPayment {
            id: p.id,
            amount: p.amount,
            payment_date: p.payment_date,
            payment_method: p.payment_method,
            student_id: p.student_id,
            student_name: data.student_name(p.student_id),
            structure_name: data.structure_name(a.fee_structure_id),
        })
        .collect()
}

/// 只统计当前报表范围内应收上的生效减免；四种类型都会列出
pub(crate) fn exception_stats(
    assignments: &[FeeAssignment],
    exceptions: &[FeeException],
) -> ExceptionStats {
    let ids: HashSet<i64> = assignments.iter().map(|a| a.id).collect();
    let active: Vec<&FeeException> = exceptions
        .iter()
        .filter(|e| e.is_active && ids.contains(&e.fee_assignment_id))
        .collect();

    let mut by_type: Vec<ExceptionTypeStat> = ExceptionType::ALL
        .iter()
        .map(|kind| ExceptionTypeStat {
            exception_type: *kind,
            count: 0,
            amount: 0.0,
        })
        .collect();
    for e in &active {
        if let Some(stat) = by_type.iter_mut().find(|s| s.exception_type == e.exception_type) {
            stat.count += 1;
            stat.amount += e.exception_amount;
        }
    }
    for stat in &mut by_type {
        stat.amount = round2(stat.amount);
    }

    let original: f64 = assignments.iter().map(|a| a.original_amount).sum();
    let adjusted: f64 = assignments.iter().map(|a| a.assigned_amount).sum();
    let original = if original == 0.0 { adjusted } else { original };

    ExceptionStats {
        total_count: active.len() as i64,
        total_amount: round2(active.iter().map(|e| e.exception_amount).sum()),
        by_type,
        impact: ExceptionImpact {
            original_total: round2(original),
            adjusted_total: round2(adjusted),
            exception_reduction: round2(original - adjusted),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::PaymentMethod;
    use crate::services::fees::reports::tests::{date, sample_data};
    use chrono::{NaiveDate, Utc};

    fn payment(id: i64, assignment_id: i64, student_id: i64, amount: f64, on: NaiveDate) -> FeePayment {
        FeePayment {
            id,
            organization_id: 1,
            school_id: 1,
            fee_assignment_id: assignment_id,
            student_id,
            amount,
            payment_date: on,
            payment_method: PaymentMethod::Cash,
            reference_no: None,
            received_by: Some(1),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn exception(id: i64, assignment_id: i64, kind: ExceptionType, amount: f64) -> FeeException {
        FeeException {
            id,
            organization_id: 1,
            school_id: 1,
            fee_assignment_id: assignment_id,
            student_id: 2,
            exception_type: kind,
            value: amount,
            exception_amount: amount,
            reason: "sibling".into(),
            approved_by: Some(1),
            approved_at: Utc::now(),
            valid_from: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            valid_to: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&sample_data().assignments);
        assert_eq!(summary.total_assignments, 4);
        assert_eq!(summary.total_students, 3);
        assert_eq!(summary.total_assigned, 2200.0);
        assert_eq!(summary.total_paid, 1050.0);
        assert_eq!(summary.total_remaining, 1150.0);
        assert_eq!(summary.collection_rate, 47.73);
        assert_eq!(
            summary.status_counts,
            StatusCounts {
                paid: 1,
                partial: 1,
                pending: 1,
                overdue: 1,
                waived: 0,
            }
        );
    }

    #[test]
    fn test_breakdowns_are_sorted_by_name() {
        let dashboard = build_dashboard(&sample_data(), &[], &[]);

        let classes: Vec<_> = dashboard.by_class.iter().map(|c| c.class_name.as_str()).collect();
        assert_eq!(classes, vec!["Grade 5 A", "Grade 6"]);
        let grade5 = &dashboard.by_class[0];
        assert_eq!(grade5.assignment_count, 3);
        assert_eq!(grade5.student_count, 2);
        assert_eq!(grade5.total_remaining, 950.0);
        assert_eq!(grade5.collection_rate, 52.5);

        let structures: Vec<_> = dashboard
            .by_structure
            .iter()
            .map(|s| (s.structure_name.as_str(), s.total_assigned))
            .collect();
        assert_eq!(structures, vec![("Library", 400.0), ("Tuition", 1800.0)]);
    }

    #[test]
    fn test_recent_payments_newest_first() {
        let payments: Vec<FeePayment> = (1..=12)
            .map(|i| payment(i, 1, 1, 10.0, date(2026, 1, i as u32)))
            .chain(std::iter::once(payment(99, 5, 3, 10.0, date(2026, 2, 1))))
            .collect();

        let recent = recent_payments(&sample_data(), &payments);
        assert_eq!(recent.len(), 10);
        // 已取消应收上的缴费不计入
        assert_eq!(recent[0].id, 12);
        assert_eq!(recent[0].student_name, "Student 1");
        assert_eq!(recent[0].structure_name, "Tuition");
    }

    #[test]
    fn test_exception_stats() {
        let data = sample_data();
        let exceptions = vec![
            exception(1, 3, ExceptionType::DiscountFixed, 200.0),
            exception(2, 5, ExceptionType::Waiver, 100.0),
        ];

        let stats = exception_stats(&data.assignments, &exceptions);
        assert_eq!(stats.total_count, 1);
        assert_eq!(stats.total_amount, 200.0);
        assert_eq!(stats.by_type.len(), ExceptionType::ALL.len());
        let fixed = stats
            .by_type
            .iter()
            .find(|s| s.exception_type == ExceptionType::DiscountFixed)
            .unwrap();
        assert_eq!((fixed.count, fixed.amount), (1, 200.0));
        assert_eq!(
            stats.impact,
            ExceptionImpact {
                original_total: 2400.0,
                adjusted_total: 2200.0,
                exception_reduction: 200.0,
            }
        );
    }

    #[test]
    fn test_impact_falls_back_to_assigned_total() {
        let mut data = sample_data();
        for a in &mut data.assignments {
            a.original_amount = 0.0;
        }
        let stats = exception_stats(&data.assignments, &[]);
        assert_eq!(stats.impact.original_total, 2200.0);
        assert_eq!(stats.impact.exception_reduction, 0.0);
    }
}
