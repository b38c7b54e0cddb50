//! 成绩计算
//!
//! 百分比 = 得分 / 满分 × 100（两位小数），等级按下表划分：
//! A+ ≥ 90, A ≥ 80, B+ ≥ 75, B ≥ 70, C+ ≥ 65, C ≥ 60, D ≥ 50, 其余 F。

use std::collections::HashSet;

use crate::models::common::round2;
use crate::models::exams::{Exam, ExamResult, ExamStatistics, GradedResult, ResultInput};

const GRADE_SCALE: [(f64, &str); 7] = [
    (90.0, "A+"),
    (80.0, "A"),
    (75.0, "B+"),
    (70.0, "B"),
    (65.0, "C+"),
    (60.0, "C"),
    (50.0, "D"),
];

pub fn percentage(marks: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    round2(marks / total * 100.0)
}

pub fn grade_for(percentage: f64) -> &'static str {
    GRADE_SCALE
        .iter()
        .find(|(min, _)| percentage >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or("F")
}

/// 校验并计算一次录入的全部成绩
pub(crate) fn grade_results(
    exam: &Exam,
    inputs: Vec<ResultInput>,
) -> Result<Vec<GradedResult>, String> {
    if inputs.is_empty() {
        return Err("At least one result is required".to_string());
    }

    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .map(|input| {
            if !seen.insert(input.student_id) {
                return Err(format!(
                    "Student {} appears more than once",
                    input.student_id
                ));
            }
            if !input.marks_obtained.is_finite()
                || !(0.0..=exam.total_marks).contains(&input.marks_obtained)
            {
                return Err(format!(
                    "Marks for student {} must be between 0 and {}",
                    input.student_id, exam.total_marks
                ));
            }
            let pct = percentage(input.marks_obtained, exam.total_marks);
            Ok(GradedResult {
                student_id: input.student_id,
                marks_obtained: input.marks_obtained,
                percentage: pct,
                grade: grade_for(pct).to_string(),
                is_pass: input.marks_obtained >= exam.pass_marks,
                remarks: input.remarks,
            })
        })
        .collect()
}

/// 及格以考试当前的及格线为准，而不是录入时保存的结果
pub(crate) fn statistics(exam: &Exam, results: &[ExamResult]) -> ExamStatistics {
    if results.is_empty() {
        return ExamStatistics::default();
    }

    let marks = results.iter().map(|r| r.marks_obtained);
    let count = results.len() as i64;
    let sum: f64 = marks.clone().sum();
    let pass_count = results
        .iter()
        .filter(|r| r.marks_obtained >= exam.pass_marks)
        .count() as i64;

    ExamStatistics {
        count,
        average: round2(sum / count as f64),
        highest: marks.clone().fold(f64::MIN, f64::max),
        lowest: marks.fold(f64::MAX, f64::min),
        pass_count,
        pass_rate: round2(pass_count as f64 / count as f64 * 100.0),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::exams::ExamType;
    use chrono::Utc;

    pub(crate) fn exam(id: i64, total: f64, pass: f64) -> Exam {
        Exam {
            id,
            organization_id: 1,
            school_id: 1,
            academic_year_id: Some(1),
            class_id: 10,
            subject_id: 5,
            name: format!("Exam {id}"),
            exam_type: ExamType::Midterm,
            exam_date: None,
            total_marks: total,
            pass_marks: pass,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub(crate) fn result(exam_id: i64, student_id: i64, marks: f64, total: f64) -> ExamResult {
        let pct = percentage(marks, total);
        ExamResult {
            id: exam_id * 1000 + student_id,
            exam_id,
            student_id,
            marks_obtained: marks,
            percentage: pct,
            grade: grade_for(pct).to_string(),
            is_pass: true,
            remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn input(student_id: i64, marks: f64) -> ResultInput {
        ResultInput {
            student_id,
            marks_obtained: marks,
            remarks: None,
        }
    }

    #[test]
    fn test_grade_scale_boundaries() {
        assert_eq!(grade_for(100.0), "A+");
        assert_eq!(grade_for(90.0), "A+");
        assert_eq!(grade_for(89.99), "A");
        assert_eq!(grade_for(75.0), "B+");
        assert_eq!(grade_for(70.0), "B");
        assert_eq!(grade_for(65.0), "C+");
        assert_eq!(grade_for(60.0), "C");
        assert_eq!(grade_for(50.0), "D");
        assert_eq!(grade_for(49.99), "F");
        assert_eq!(grade_for(0.0), "F");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(45.0, 60.0), 75.0);
        assert_eq!(percentage(1.0, 3.0), 33.33);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_grade_results() {
        let exam = exam(1, 50.0, 20.0);
        let graded = grade_results(&exam, vec![input(1, 45.0), input(2, 19.5)]).unwrap();
        assert_eq!(graded[0].percentage, 90.0);
        assert_eq!(graded[0].grade, "A+");
        assert!(graded[0].is_pass);
        assert_eq!(graded[1].percentage, 39.0);
        assert_eq!(graded[1].grade, "F");
        assert!(!graded[1].is_pass);
    }

    #[test]
    fn test_grade_results_rejects_invalid_marks() {
        let exam = exam(1, 50.0, 20.0);
        assert!(grade_results(&exam, vec![input(1, 50.5)]).is_err());
        assert!(grade_results(&exam, vec![input(1, -1.0)]).is_err());
        assert!(grade_results(&exam, vec![input(1, 10.0), input(1, 12.0)]).is_err());
        assert!(grade_results(&exam, vec![]).is_err());
    }

    #[test]
    fn test_statistics() {
        let exam = exam(1, 100.0, 40.0);
        let results = vec![
            result(1, 1, 90.0, 100.0),
            result(1, 2, 35.0, 100.0),
            result(1, 3, 61.0, 100.0),
        ];
        let stats = statistics(&exam, &results);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, 62.0);
        assert_eq!(stats.highest, 90.0);
        assert_eq!(stats.lowest, 35.0);
        assert_eq!(stats.pass_count, 2);
        assert_eq!(stats.pass_rate, 66.67);

        assert_eq!(statistics(&exam, &[]), ExamStatistics::default());
    }
}
