//! 出勤汇总：出勤率 = (出勤 + 迟到) / 总数 × 100

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AttendanceService;
use crate::models::attendance::{
    AttendanceRecord, AttendanceStatus, AttendanceSummaryParams, AttendanceSummaryResponse,
    AttendanceTotals, StudentAttendanceSummary,
};
use crate::models::common::round2;
use crate::models::students::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found, tenant_scope};

impl AttendanceTotals {
    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Excused => self.excused += 1,
        }
        self.total += 1;
    }

    fn finish(mut self) -> Self {
        self.attendance_rate = attendance_rate(self.present, self.late, self.total);
        self
    }
}

pub(crate) fn attendance_rate(present: i64, late: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2((present + late) as f64 / total as f64 * 100.0)
}

/// 班级内每个学生一行（包括没有记录的学生），外加班级合计
pub(crate) fn summarize(
    students: &[Student],
    records: &[AttendanceRecord],
) -> (Vec<StudentAttendanceSummary>, AttendanceTotals) {
    let mut per_student: HashMap<i64, AttendanceTotals> = HashMap::new();
    let mut class_totals = AttendanceTotals::default();

    for record in records {
        per_student
            .entry(record.student_id)
            .or_default()
            .add(record.status);
        class_totals.add(record.status);
    }

    let rows = students
        .iter()
        .map(|student| StudentAttendanceSummary {
            student_id: student.id,
            student_name: student.full_name.clone(),
            admission_no: student.admission_no.clone(),
            totals: per_student
                .remove(&student.id)
                .unwrap_or_default()
                .finish(),
        })
        .collect();

    (rows, class_totals.finish())
}

impl AttendanceService {
    pub async fn attendance_summary(
        &self,
        params: AttendanceSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let scope = tenant_scope(request)?;
        let storage = self.get_storage(request)?;

        match storage.get_class(&scope, params.class_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(not_found(
                    ErrorCode::AcademicRecordNotFound,
                    "Class not found",
                ));
            }
            Err(e) => return Ok(error_response(&e)),
        }

        let students = match storage
            .list_all_students(&scope, Some(params.class_id))
            .await
        {
            Ok(students) => students,
            Err(e) => return Ok(error_response(&e)),
        };
        let records = match storage
            .list_class_attendance(&scope, params.class_id, params.date_from, params.date_to)
            .await
        {
            Ok(records) => records,
            Err(e) => return Ok(error_response(&e)),
        };

        let (rows, totals) = summarize(&students, &records);
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceSummaryResponse {
                class_id: params.class_id,
                date_from: params.date_from,
                date_to: params.date_to,
                students: rows,
                totals,
            },
            "Attendance summary retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::Gender;
    use crate::services::students::stats::tests::student;
    use chrono::{NaiveDate, Utc};

    fn record(student_id: i64, day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: student_id * 100 + day as i64,
            organization_id: 1,
            school_id: 1,
            class_id: 10,
            student_id,
            date: NaiveDate::from_ymd_opt(2024, 9, day).unwrap(),
            status,
            remarks: None,
            marked_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_attendance_rate() {
        assert_eq!(attendance_rate(0, 0, 0), 0.0);
        assert_eq!(attendance_rate(2, 1, 3), 100.0);
        assert_eq!(attendance_rate(1, 0, 3), 33.33);
        assert_eq!(attendance_rate(1, 1, 3), 66.67);
    }

    #[test]
    fn test_summarize() {
        let students = vec![
            student(1, Some(10), Gender::Male),
            student(2, Some(10), Gender::Female),
            student(3, Some(10), Gender::Male),
        ];
        let records = vec![
            record(1, 1, AttendanceStatus::Present),
            record(1, 2, AttendanceStatus::Late),
            record(1, 3, AttendanceStatus::Absent),
            record(2, 1, AttendanceStatus::Excused),
        ];

        let (rows, totals) = summarize(&students, &records);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].totals.total, 3);
        assert_eq!(rows[0].totals.attendance_rate, 66.67);
        assert_eq!(rows[1].totals.excused, 1);
        assert_eq!(rows[1].totals.attendance_rate, 0.0);
        assert_eq!(rows[2].totals, AttendanceTotals::default());

        assert_eq!(totals.total, 4);
        assert_eq!(totals.present, 1);
        assert_eq!(totals.late, 1);
        assert_eq!(totals.attendance_rate, 50.0);
    }
}
