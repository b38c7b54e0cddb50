use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::academic::{
    AcademicListParams, ClassListParams, CreateAcademicYearRequest, CreateBuildingRequest,
    CreateClassRequest, CreateRoomRequest, CreateSubjectRequest, RoomListParams,
    UpdateAcademicYearRequest, UpdateBuildingRequest, UpdateClassRequest, UpdateRoomRequest,
    UpdateSubjectRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::AcademicService;
use crate::utils::SafeIDI64;

static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

// 学年
pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_academic_years(&req).await
}

pub async fn create_academic_year(
    req: HttpRequest,
    body: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_academic_year(body.into_inner(), &req)
        .await
}

pub async fn update_academic_year(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_academic_year(id.0, body.into_inner(), &req)
        .await
}

pub async fn set_current_academic_year(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.set_current_academic_year(id.0, &req).await
}

pub async fn delete_academic_year(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_academic_year(id.0, &req).await
}

// 班级
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_classes(query.into_inner(), &req).await
}

pub async fn get_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_class(id.0, &req).await
}

pub async fn create_class(
    req: HttpRequest,
    body: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_class(body.into_inner(), &req).await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_class(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_class(id.0, &req).await
}

// 科目
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<AcademicListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_subject(body.into_inner(), &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_subject(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_subject(id.0, &req).await
}

// 教学楼
pub async fn list_buildings(
    req: HttpRequest,
    query: web::Query<AcademicListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_buildings(query.into_inner(), &req).await
}

pub async fn create_building(
    req: HttpRequest,
    body: web::Json<CreateBuildingRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .create_building(body.into_inner(), &req)
        .await
}

pub async fn update_building(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateBuildingRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_building(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_building(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_building(id.0, &req).await
}

// 教室
pub async fn list_rooms(
    req: HttpRequest,
    query: web::Query<RoomListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_rooms(query.into_inner(), &req).await
}

pub async fn create_room(
    req: HttpRequest,
    body: web::Json<CreateRoomRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_room(body.into_inner(), &req).await
}

pub async fn update_room(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateRoomRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_room(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_room(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_room(id.0, &req).await
}

pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Academic);
    let create = || RequirePermission::create(Resource::Academic);
    let update = || RequirePermission::update(Resource::Academic);
    let delete = || RequirePermission::delete(Resource::Academic);

    cfg.service(
        web::scope("/api/v1/academic")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("/years", web::get().to(list_academic_years).wrap(read()))
            .route("/years", web::post().to(create_academic_year).wrap(create()))
            .route("/years/{id}", web::put().to(update_academic_year).wrap(update()))
            .route(
                "/years/{id}/current",
                web::post().to(set_current_academic_year).wrap(update()),
            )
            .route("/years/{id}", web::delete().to(delete_academic_year).wrap(delete()))
            .route("/classes", web::get().to(list_classes).wrap(read()))
            .route("/classes", web::post().to(create_class).wrap(create()))
            .route("/classes/{id}", web::get().to(get_class).wrap(read()))
            .route("/classes/{id}", web::put().to(update_class).wrap(update()))
            .route("/classes/{id}", web::delete().to(delete_class).wrap(delete()))
            .route("/subjects", web::get().to(list_subjects).wrap(read()))
            .route("/subjects", web::post().to(create_subject).wrap(create()))
            .route("/subjects/{id}", web::put().to(update_subject).wrap(update()))
            .route("/subjects/{id}", web::delete().to(delete_subject).wrap(delete()))
            .route("/buildings", web::get().to(list_buildings).wrap(read()))
            .route("/buildings", web::post().to(create_building).wrap(create()))
            .route("/buildings/{id}", web::put().to(update_building).wrap(update()))
            .route("/buildings/{id}", web::delete().to(delete_building).wrap(delete()))
            .route("/rooms", web::get().to(list_rooms).wrap(read()))
            .route("/rooms", web::post().to(create_room).wrap(create()))
            .route("/rooms/{id}", web::put().to(update_room).wrap(update()))
            .route("/rooms/{id}", web::delete().to(delete_room).wrap(delete())),
    );
}
