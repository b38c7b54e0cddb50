use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::hostel::{
    AllocateRoomRequest, AllocationListParams, CheckoutRequest, CreateHostelRoomRequest,
    HostelRoomListParams, UpdateHostelRoomRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::HostelService;
use crate::utils::SafeIDI64;

static HOSTEL_SERVICE: Lazy<HostelService> = Lazy::new(HostelService::new_lazy);

pub async fn list_rooms(
    req: HttpRequest,
    query: web::Query<HostelRoomListParams>,
) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE.list_rooms(query.into_inner(), &req).await
}

pub async fn create_room(
    req: HttpRequest,
    body: web::Json<CreateHostelRoomRequest>,
) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE.create_room(body.into_inner(), &req).await
}

pub async fn update_room(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateHostelRoomRequest>,
) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE
        .update_room(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_room(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE.delete_room(id.0, &req).await
}

pub async fn list_allocations(
    req: HttpRequest,
    query: web::Query<AllocationListParams>,
) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE
        .list_allocations(query.into_inner(), &req)
        .await
}

pub async fn allocate(
    req: HttpRequest,
    body: web::Json<AllocateRoomRequest>,
) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE.allocate(body.into_inner(), &req).await
}

pub async fn checkout(
    req: HttpRequest,
    id: SafeIDI64,
    body: Option<web::Json<CheckoutRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    HOSTEL_SERVICE.checkout(id.0, body, &req).await
}

pub async fn hostel_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    HOSTEL_SERVICE.hostel_stats(&req).await
}

pub fn configure_hostel_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Hostel);
    let update = || RequirePermission::update(Resource::Hostel);

    cfg.service(
        web::scope("/api/v1/hostel")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("/stats", web::get().to(hostel_stats).wrap(read()))
            .route("/rooms", web::get().to(list_rooms).wrap(read()))
            .route(
                "/rooms",
                web::post()
                    .to(create_room)
                    .wrap(RequirePermission::create(Resource::Hostel)),
            )
            .route("/rooms/{id}", web::put().to(update_room).wrap(update()))
            .route(
                "/rooms/{id}",
                web::delete()
                    .to(delete_room)
                    .wrap(RequirePermission::delete(Resource::Hostel)),
            )
            .route("/allocations", web::get().to(list_allocations).wrap(read()))
            .route(
                "/allocations",
                web::post()
                    .to(allocate)
                    .wrap(RequirePermission::create(Resource::Hostel)),
            )
            .route(
                "/allocations/{id}/checkout",
                web::post().to(checkout).wrap(update()),
            ),
    );
}
