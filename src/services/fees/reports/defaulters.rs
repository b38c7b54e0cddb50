use std::collections::HashSet;

use super::ReportData;
use crate::models::common::round2;
use crate::models::fees::reports::{DefaulterRow, DefaulterSummary, DefaultersReport};

/// 未结清的 pending / partial / overdue 应收，按剩余金额降序
pub(crate) fn defaulters_report(data: &ReportData, min_amount: Option<f64>) -> DefaultersReport {
    let min_amount = min_amount.unwrap_or(0.0);

    let mut defaulters: Vec<DefaulterRow> = data
        .assignments
        .iter()
        .filter(|a| a.status.is_outstanding() && a.remaining_amount > 0.0)
        .filter(|a| a.remaining_amount >= min_amount)
        .map(|a| {
            let student = data.students.get(&a.student_id);
            DefaulterRow {
                fee_assignment_id: a.id,
                student_id: a.student_id,
                student_name: data.student_name(a.student_id),
                admission_no: student.map(|s| s.admission_no.clone()).unwrap_or_default(),
                guardian_phone: student.and_then(|s| s.guardian_phone.clone()),
                class_name: data.class_name(a.class_id.or(student.and_then(|s| s.class_id))),
                structure_name: data.structure_name(a.fee_structure_id),
                assigned_amount: a.assigned_amount,
                paid_amount: a.paid_amount,
                remaining_amount: a.remaining_amount,
                due_date: a.due_date,
                status: a.status,
            }
        })
        .collect();
    defaulters.sort_by(|a, b| {
        b.remaining_amount
            .total_cmp(&a.remaining_amount)
            .then(a.due_date.cmp(&b.due_date))
            .then(a.fee_assignment_id.cmp(&b.fee_assignment_id))
    });

    let students: HashSet<i64> = defaulters.iter().map(|d| d.student_id).collect();
    DefaultersReport {
        summary: DefaulterSummary {
            total_students: students.len() as i64,
            total_assignments: defaulters.len() as i64,
            total_outstanding: round2(defaulters.iter().map(|d| d.remaining_amount).sum()),
        },
        defaulters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fees::reports::tests::sample_data;

    #[test]
    fn test_defaulters_sorted_by_remaining() {
        let report = defaulters_report(&sample_data(), None);
        let remaining: Vec<_> = report.defaulters.iter().map(|d| d.remaining_amount).collect();
        assert_eq!(remaining, vec![800.0, 200.0, 150.0]);
        assert_eq!(
            report.summary,
            DefaulterSummary {
                total_students: 3,
                total_assignments: 3,
                total_outstanding: 1150.0,
            }
        );
        assert_eq!(report.defaulters[0].structure_name, "Tuition");
        assert_eq!(report.defaulters[0].class_name.as_deref(), Some("Grade 5 A"));
    }

    #[test]
    fn test_defaulters_min_amount() {
        let report = defaulters_report(&sample_data(), Some(200.0));
        assert_eq!(report.summary.total_assignments, 2);
        assert_eq!(report.summary.total_students, 2);
        assert_eq!(report.summary.total_outstanding, 1000.0);
    }
}
