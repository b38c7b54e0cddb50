pub mod grading;
pub mod manage;
pub mod report_card;
pub mod results;

use actix_web::HttpResponse;

use crate::models::ErrorCode;

define_service!(ExamService);

fn exam_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::ExamNotFound, "Exam not found")
}
