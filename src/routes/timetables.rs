use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::timetables::{
    CreateTimetableRequest, ReplaceEntriesRequest, TeacherPreferenceListParams,
    TimetableListParams, UpdateTimetableRequest, UpsertTeacherPreferenceRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::TimetableService;
use crate::utils::SafeIDI64;

static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_timetables(
    req: HttpRequest,
    query: web::Query<TimetableListParams>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .list_timetables(query.into_inner(), &req)
        .await
}

pub async fn create_timetable(
    req: HttpRequest,
    body: web::Json<CreateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .create_timetable(body.into_inner(), &req)
        .await
}

pub async fn get_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.get_timetable(id.0, &req).await
}

pub async fn update_timetable(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateTimetableRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .update_timetable(id.0, body.into_inner(), &req)
        .await
}

pub async fn replace_entries(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ReplaceEntriesRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .replace_entries(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_timetable(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_timetable(id.0, &req).await
}

pub async fn list_teacher_preferences(
    req: HttpRequest,
    query: web::Query<TeacherPreferenceListParams>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .list_teacher_preferences(query.into_inner(), &req)
        .await
}

pub async fn upsert_teacher_preference(
    req: HttpRequest,
    body: web::Json<UpsertTeacherPreferenceRequest>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .upsert_teacher_preference(body.into_inner(), &req)
        .await
}

pub async fn delete_teacher_preference(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE.delete_teacher_preference(id.0, &req).await
}

pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Timetables);
    let create = || RequirePermission::create(Resource::Timetables);
    let update = || RequirePermission::update(Resource::Timetables);
    let delete = || RequirePermission::delete(Resource::Timetables);

    cfg.service(
        web::scope("/api/v1/timetables")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_timetables).wrap(read()))
            .route("", web::post().to(create_timetable).wrap(create()))
            // 需在 /{id} 之前注册
            .route(
                "/preferences",
                web::get().to(list_teacher_preferences).wrap(read()),
            )
            .route(
                "/preferences",
                web::put().to(upsert_teacher_preference).wrap(update()),
            )
            .route(
                "/preferences/{id}",
                web::delete().to(delete_teacher_preference).wrap(delete()),
            )
            .route("/{id}", web::get().to(get_timetable).wrap(read()))
            .route("/{id}", web::put().to(update_timetable).wrap(update()))
            .route("/{id}/entries", web::put().to(replace_entries).wrap(update()))
            .route("/{id}", web::delete().to(delete_timetable).wrap(delete())),
    );
}
