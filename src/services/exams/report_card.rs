//! 学生成绩单

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::ExamService;
use super::grading::{grade_for, percentage};
use crate::models::academic::Subject;
use crate::models::exams::{Exam, ExamResult, ReportCard, ReportCardParams, ReportCardRow};
use crate::models::students::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found, tenant_scope};

pub(crate) fn build_report_card(
    student: &Student,
    academic_year_id: Option<i64>,
    results: Vec<(ExamResult, Exam)>,
    subjects: &[Subject],
) -> ReportCard {
    let subject_names: HashMap<i64, &str> =
        subjects.iter().map(|s| (s.id, s.name.as_str())).collect();

    let mut rows: Vec<ReportCardRow> = results
        .into_iter()
        .map(|(result, exam)| ReportCardRow {
            exam_id: exam.id,
            exam_name: exam.name,
            exam_type: exam.exam_type,
            exam_date: exam.exam_date,
            subject_id: exam.subject_id,
            subject_name: subject_names
                .get(&exam.subject_id)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            total_marks: exam.total_marks,
            marks_obtained: result.marks_obtained,
            percentage: result.percentage,
            grade: result.grade,
            is_pass: result.marks_obtained >= exam.pass_marks,
        })
        .collect();
    // 无日期的考试排在最后
    rows.sort_by(|a, b| {
        (a.exam_date.is_none(), a.exam_date, a.exam_id).cmp(&(
            b.exam_date.is_none(),
            b.exam_date,
            b.exam_id,
        ))
    });

    let total_obtained: f64 = rows.iter().map(|r| r.marks_obtained).sum();
    let total_possible: f64 = rows.iter().map(|r| r.total_marks).sum();
    let overall_percentage = percentage(total_obtained, total_possible);
    let overall_grade = if rows.is_empty() {
        String::new()
    } else {
        grade_for(overall_percentage).to_string()
    };

    ReportCard {
        student_id: student.id,
        student_name: student.full_name.clone(),
        admission_no: student.admission_no.clone(),
        academic_year_id,
        rows,
        total_obtained,
        total_possible,
        overall_percentage,
        overall_grade,
    }
}

impl ExamService {
    pub async fn report_card(
        &self,
        student_id: i64,
        params: ReportCardParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let student = match storage.get_student(&scope, student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
            Err(e) => return Ok(error_response(&e)),
        };
        let results = match storage
            .list_student_results(&scope, student_id, params.academic_year_id)
            .await
        {
            Ok(results) => results,
            Err(e) => return Ok(error_response(&e)),
        };
        let subjects = match storage.list_all_subjects(&scope).await {
            Ok(subjects) => subjects,
            Err(e) => return Ok(error_response(&e)),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            build_report_card(&student, params.academic_year_id, results, &subjects),
            "Report card retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::Gender;
    use crate::services::exams::grading::tests::{exam, result};
    use crate::services::students::stats::tests::student;
    use chrono::{NaiveDate, Utc};

    fn subject(id: i64, name: &str) -> Subject {
        Subject {
            id,
            organization_id: 1,
            school_id: 1,
            name: name.into(),
            code: name.to_uppercase(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_report_card() {
        let pupil = student(7, Some(10), Gender::Male);
        let mut math = exam(1, 100.0, 40.0);
        math.exam_date = NaiveDate::from_ymd_opt(2024, 10, 1);
        let mut science = exam(2, 50.0, 20.0);
        science.subject_id = 6;
        science.exam_date = NaiveDate::from_ymd_opt(2024, 9, 1);

        let card = build_report_card(
            &pupil,
            Some(1),
            vec![
                (result(1, 7, 85.0, 100.0), math),
                (result(2, 7, 15.0, 50.0), science),
            ],
            &[subject(5, "Math"), subject(6, "Science")],
        );

        assert_eq!(card.rows.len(), 2);
        assert_eq!(card.rows[0].subject_name, "Science");
        assert!(!card.rows[0].is_pass);
        assert_eq!(card.rows[1].grade, "A");
        assert_eq!(card.total_obtained, 100.0);
        assert_eq!(card.total_possible, 150.0);
        assert_eq!(card.overall_percentage, 66.67);
        assert_eq!(card.overall_grade, "C+");
    }

    #[test]
    fn test_empty_report_card() {
        let card = build_report_card(&student(7, None, Gender::Male), None, vec![], &[]);
        assert!(card.rows.is_empty());
        assert_eq!(card.overall_percentage, 0.0);
        assert_eq!(card.overall_grade, "");
    }
}
