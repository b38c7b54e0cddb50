use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginatedResponse, PaginationQuery, empty_string_as_none};

string_enum! {
    #[ts(export, export_to = "exam.ts")]
    pub enum ExamType {
        Midterm => "midterm",
        Final => "final",
        Quiz => "quiz",
        Assignment => "assignment",
        Omr => "omr",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct Exam {
    pub id: i64,
    pub organization_id: i64,
    pub school_id: i64,
    pub academic_year_id: Option<i64>,
    pub class_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub exam_type: ExamType,
    pub exam_date: Option<NaiveDate>,
    pub total_marks: f64,
    pub pass_marks: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exam_type: Option<ExamType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct CreateExamRequest {
    pub academic_year_id: Option<i64>,
    pub class_id: i64,
    pub subject_id: i64,
    pub name: String,
    pub exam_type: ExamType,
    pub exam_date: Option<NaiveDate>,
    pub total_marks: f64,
    pub pass_marks: f64,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct UpdateExamRequest {
    pub academic_year_id: Option<i64>,
    pub class_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub name: Option<String>,
    pub exam_type: Option<ExamType>,
    pub exam_date: Option<NaiveDate>,
    pub total_marks: Option<f64>,
    pub pass_marks: Option<f64>,
}

// 考试成绩，(exam_id, student_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub grade: String,
    pub is_pass: bool,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ResultInput {
    pub student_id: i64,
    pub marks_obtained: f64,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct RecordResultsRequest {
    pub results: Vec<ResultInput>,
}

/// 已计算好的成绩行（写入前）
#[derive(Debug, Clone, PartialEq)]
pub struct GradedResult {
    pub student_id: i64,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub grade: String,
    pub is_pass: bool,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamResultRow {
    #[serde(flatten)]
    #[ts(flatten)]
    pub result: ExamResult,
    pub student_name: String,
    pub admission_no: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamStatistics {
    pub count: i64,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub pass_count: i64,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ExamResultsResponse {
    pub exam: Exam,
    pub results: Vec<ExamResultRow>,
    pub statistics: ExamStatistics,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ReportCardParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub academic_year_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ReportCardRow {
    pub exam_id: i64,
    pub exam_name: String,
    pub exam_type: ExamType,
    pub exam_date: Option<NaiveDate>,
    pub subject_id: i64,
    pub subject_name: String,
    pub total_marks: f64,
    pub marks_obtained: f64,
    pub percentage: f64,
    pub grade: String,
    pub is_pass: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "exam.ts")]
pub struct ReportCard {
    pub student_id: i64,
    pub student_name: String,
    pub admission_no: String,
    pub academic_year_id: Option<i64>,
    pub rows: Vec<ReportCardRow>,
    pub total_obtained: f64,
    pub total_possible: f64,
    pub overall_percentage: f64,
    pub overall_grade: String,
}

pub type ExamListResponse = PaginatedResponse<Exam>;
