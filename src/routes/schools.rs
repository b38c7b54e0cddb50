use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::schools::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};
use crate::models::users::permissions::Resource;
use crate::services::SchoolService;
use crate::utils::SafeIDI64;

static SCHOOL_SERVICE: Lazy<SchoolService> = Lazy::new(SchoolService::new_lazy);

pub async fn list_schools(
    req: HttpRequest,
    query: web::Query<SchoolListParams>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.list_schools(query.into_inner(), &req).await
}

pub async fn create_school(
    req: HttpRequest,
    body: web::Json<CreateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.create_school(body.into_inner(), &req).await
}

pub async fn get_school(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.get_school(id.0, &req).await
}

pub async fn update_school(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSchoolRequest>,
) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE
        .update_school(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_school(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHOOL_SERVICE.delete_school(id.0, &req).await
}

pub fn configure_school_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schools")
            .wrap(RequireTenant::organization())
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_schools)
                    .wrap(RequirePermission::read(Resource::Schools)),
            )
            .route(
                "",
                web::post()
                    .to(create_school)
                    .wrap(RequirePermission::create(Resource::Schools)),
            )
            .route(
                "/{id}",
                web::get()
                    .to(get_school)
                    .wrap(RequirePermission::read(Resource::Schools)),
            )
            .route(
                "/{id}",
                web::put()
                    .to(update_school)
                    .wrap(RequirePermission::update(Resource::Schools)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_school)
                    .wrap(RequirePermission::delete(Resource::Schools)),
            ),
    );
}
