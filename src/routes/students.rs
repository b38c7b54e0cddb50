use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission, RequireTenant};
use crate::models::students::{
    CreateStudentRequest, StudentImportParams, StudentListParams, UpdateStudentRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn student_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.student_stats(&req).await
}

pub async fn import_students(
    req: HttpRequest,
    query: web::Query<StudentImportParams>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .import_students(query.into_inner(), payload, &req)
        .await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(id.0, &req).await
}

pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_students)
                    .wrap(RequirePermission::read(Resource::Students)),
            )
            .route(
                "",
                web::post()
                    .to(create_student)
                    .wrap(RequirePermission::create(Resource::Students)),
            )
            .route(
                "/stats",
                web::get()
                    .to(student_stats)
                    .wrap(RequirePermission::read(Resource::Students)),
            )
            .route(
                "/import",
                web::post()
                    .to(import_students)
                    .wrap(RateLimit::student_import())
                    .wrap(RequirePermission::create(Resource::Students)),
            )
            .route(
                "/{id}",
                web::get()
                    .to(get_student)
                    .wrap(RequirePermission::read(Resource::Students)),
            )
            .route(
                "/{id}",
                web::put()
                    .to(update_student)
                    .wrap(RequirePermission::update(Resource::Students)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_student)
                    .wrap(RequirePermission::delete(Resource::Students)),
            ),
    );
}
