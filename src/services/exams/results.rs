use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::grading::{grade_results, statistics};
use super::{ExamService, exam_not_found};
use crate::models::exams::{ExamResult, ExamResultRow, ExamResultsResponse, RecordResultsRequest};
use crate::models::realtime::ChangeAction;
use crate::models::students::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_school_change;
use crate::services::{bad_request, error_response, tenant_scope};

/// 成绩行附带学生姓名与学号，按姓名排序
pub(crate) fn attach_students(results: Vec<ExamResult>, students: &[Student]) -> Vec<ExamResultRow> {
    let by_id: HashMap<i64, &Student> = students.iter().map(|s| (s.id, s)).collect();
    let mut rows: Vec<ExamResultRow> = results
        .into_iter()
        .map(|result| {
            let student = by_id.get(&result.student_id);
            ExamResultRow {
                student_name: student.map(|s| s.full_name.clone()).unwrap_or_default(),
                admission_no: student.map(|s| s.admission_no.clone()).unwrap_or_default(),
                result,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.student_name.cmp(&b.student_name));
    rows
}

impl ExamService {
    /// 按 (考试, 学生) 录入或覆盖成绩
    pub async fn record_results(
        &self,
        exam_id: i64,
        req: RecordResultsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let exam = match storage.get_exam(&scope, exam_id).await {
            Ok(Some(exam)) => exam,
            Ok(None) => return Ok(exam_not_found()),
            Err(e) => return Ok(error_response(&e)),
        };
        let graded = match grade_results(&exam, req.results) {
            Ok(graded) => graded,
            Err(msg) => return Ok(bad_request(ErrorCode::ExamMarksInvalid, msg)),
        };

        match storage.save_exam_results(&scope, exam_id, graded).await {
            Ok(saved) => {
                publish_school_change(&scope, "exam_results", ChangeAction::Update, exam_id);
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    saved,
                    "Exam results saved successfully",
                )))
            }
            Err(e) => Ok(error_response(&e)),
        }
    }

    pub async fn list_results(
        &self,
        exam_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        let exam = match storage.get_exam(&scope, exam_id).await {
            Ok(Some(exam)) => exam,
            Ok(None) => return Ok(exam_not_found()),
            Err(e) => return Ok(error_response(&e)),
        };
        let results = match storage.list_exam_results(&scope, exam_id).await {
            Ok(results) => results,
            Err(e) => return Ok(error_response(&e)),
        };
        let students = match storage.list_all_students(&scope, None).await {
            Ok(students) => students,
            Err(e) => return Ok(error_response(&e)),
        };

        let statistics = statistics(&exam, &results);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamResultsResponse {
                exam,
                results: attach_students(results, &students),
                statistics,
            },
            "Exam results retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::Gender;
    use crate::services::exams::grading::tests::result;
    use crate::services::students::stats::tests::student;

    #[test]
    fn test_attach_students() {
        let mut zara = student(1, Some(10), Gender::Female);
        zara.full_name = "Zara".into();
        let mut adam = student(2, Some(10), Gender::Male);
        adam.full_name = "Adam".into();

        let rows = attach_students(
            vec![
                result(1, 1, 70.0, 100.0),
                result(1, 2, 80.0, 100.0),
                result(1, 99, 10.0, 100.0),
            ],
            &[zara, adam],
        );

        // 找不到学生的成绩行姓名为空，排在最前
        let names: Vec<&str> = rows.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["", "Adam", "Zara"]);
        assert_eq!(rows[1].admission_no, "ADM-2");
    }
}
