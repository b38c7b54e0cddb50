use std::collections::HashMap;

use super::ReportData;
use crate::models::common::round2;
use crate::models::fees::AssignmentStatus;
use crate::models::fees::reports::StudentFeeRow;

/// 学生汇总状态
pub(crate) fn overall_status(remaining: f64, paid: f64, any_overdue: bool) -> AssignmentStatus {
    if remaining <= 0.0 {
        AssignmentStatus::Paid
    } else if paid > 0.0 {
        AssignmentStatus::Partial
    } else if any_overdue {
        AssignmentStatus::Overdue
    } else {
        AssignmentStatus::Pending
    }
}

#[derive(Default)]
struct Group {
    count: i64,
    assigned: f64,
    paid: f64,
    remaining: f64,
    any_overdue: bool,
}

/// 每个学生（按班级区分）一行，按姓名排序
pub(crate) fn student_fee_rows(
    data: &ReportData,
    status: Option<AssignmentStatus>,
    search: Option<&str>,
) -> Vec<StudentFeeRow> {
    let mut groups: HashMap<(i64, Option<i64>), Group> = HashMap::new();
    for a in &data.assignments {
        let class_id = a
            .class_id
            .or_else(|| data.students.get(&a.student_id).and_then(|s| s.class_id));
        let group = groups.entry((a.student_id, class_id)).or_default();
        group.count += 1;
        group.assigned += a.assigned_amount;
        group.paid += a.paid_amount;
        group.remaining += a.remaining_amount;
        group.any_overdue |= a.status == AssignmentStatus::Overdue;
    }

    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut rows: Vec<StudentFeeRow> = groups
        .into_iter()
        .map(|((student_id, class_id), g)| {
            let student = data.students.get(&student_id);
            StudentFeeRow {
                student_id,
                student_name: data.student_name(student_id),
                admission_no: student.map(|s| s.admission_no.clone()).unwrap_or_default(),
                class_id,
                class_name: data.class_name(class_id),
                assignment_count: g.count,
                total_assigned: round2(g.assigned),
                total_paid: round2(g.paid),
                total_remaining: round2(g.remaining),
                overall_status: overall_status(round2(g.remaining), g.paid, g.any_overdue),
            }
        })
        .filter(|row| status.is_none_or(|s| row.overall_status == s))
        .filter(|row| {
            needle.as_deref().is_none_or(|n| {
                row.student_name.to_lowercase().contains(n)
                    || row.admission_no.to_lowercase().contains(n)
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.student_name
            .cmp(&b.student_name)
            .then(a.student_id.cmp(&b.student_id))
            .then(a.class_id.cmp(&b.class_id))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fees::reports::tests::sample_data;

    #[test]
    fn test_overall_status() {
        assert_eq!(overall_status(0.0, 100.0, true), AssignmentStatus::Paid);
        assert_eq!(overall_status(50.0, 10.0, true), AssignmentStatus::Partial);
        assert_eq!(overall_status(50.0, 0.0, true), AssignmentStatus::Overdue);
        assert_eq!(overall_status(50.0, 0.0, false), AssignmentStatus::Pending);
    }

    #[test]
    fn test_student_rows() {
        let rows = student_fee_rows(&sample_data(), None, None);
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.student_name.as_str(), r.assignment_count, r.total_remaining, r.overall_status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Student 1", 2, 150.0, AssignmentStatus::Partial),
                ("Student 2", 1, 800.0, AssignmentStatus::Overdue),
                ("Student 3", 1, 200.0, AssignmentStatus::Pending),
            ]
        );
        assert_eq!(rows[2].class_name.as_deref(), Some("Grade 6"));
    }

    #[test]
    fn test_student_rows_filters() {
        let data = sample_data();
        let overdue = student_fee_rows(&data, Some(AssignmentStatus::Overdue), None);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].student_id, 2);

        let searched = student_fee_rows(&data, None, Some(" adm-3 "));
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].student_id, 3);

        assert_eq!(student_fee_rows(&data, None, Some("")).len(), 3);
    }
}
