use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::exams::{
    CreateExamRequest, ExamListParams, RecordResultsRequest, ReportCardParams, UpdateExamRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::ExamService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_exams(
    req: HttpRequest,
    query: web::Query<ExamListParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(query.into_inner(), &req).await
}

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(body.into_inner(), &req).await
}

pub async fn get_exam(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(id.0, &req).await
}

pub async fn update_exam(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .update_exam(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_exam(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(id.0, &req).await
}

pub async fn record_results(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<RecordResultsRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .record_results(id.0, body.into_inner(), &req)
        .await
}

pub async fn list_results(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_results(id.0, &req).await
}

pub async fn report_card(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<ReportCardParams>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .report_card(student_id.0, query.into_inner(), &req)
        .await
}

pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Exams);

    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_exams).wrap(read()))
            .route(
                "",
                web::post()
                    .to(create_exam)
                    .wrap(RequirePermission::create(Resource::Exams)),
            )
            .route(
                "/report-card/{student_id}",
                web::get().to(report_card).wrap(read()),
            )
            .route("/{id}", web::get().to(get_exam).wrap(read()))
            .route(
                "/{id}",
                web::put()
                    .to(update_exam)
                    .wrap(RequirePermission::update(Resource::Exams)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_exam)
                    .wrap(RequirePermission::delete(Resource::Exams)),
            )
            .route("/{id}/results", web::get().to(list_results).wrap(read()))
            .route(
                "/{id}/results",
                web::post()
                    .to(record_results)
                    .wrap(RequirePermission::update(Resource::Exams)),
            ),
    );
}
