use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::communications::{
    AnnouncementListParams, CreateAnnouncementRequest, CreateEventRequest, EventListParams,
    MessageListParams, SendMessageRequest, UpdateAnnouncementRequest, UpdateEventRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::CommunicationService;
use crate::utils::SafeIDI64;

static COMMUNICATION_SERVICE: Lazy<CommunicationService> =
    Lazy::new(CommunicationService::new_lazy);

// 公告
pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_announcements(query.into_inner(), &req)
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    body: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .create_announcement(body.into_inner(), &req)
        .await
}

pub async fn update_announcement(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .update_announcement(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.delete_announcement(id.0, &req).await
}

// 活动
pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_events(query.into_inner(), &req)
        .await
}

pub async fn create_event(
    req: HttpRequest,
    body: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .create_event(body.into_inner(), &req)
        .await
}

pub async fn get_event(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.get_event(id.0, &req).await
}

pub async fn update_event(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .update_event(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_event(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.delete_event(id.0, &req).await
}

// 消息
pub async fn list_messages(
    req: HttpRequest,
    query: web::Query<MessageListParams>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .list_messages(query.into_inner(), &req)
        .await
}

pub async fn send_message(
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE
        .send_message(body.into_inner(), &req)
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.unread_count(&req).await
}

pub async fn mark_message_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.mark_message_read(id.0, &req).await
}

pub async fn delete_message(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    COMMUNICATION_SERVICE.delete_message(id.0, &req).await
}

pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_announcements)
                    .wrap(RequirePermission::read(Resource::Communications)),
            )
            .route(
                "",
                web::post()
                    .to(create_announcement)
                    .wrap(RequirePermission::create(Resource::Communications)),
            )
            .route(
                "/{id}",
                web::put()
                    .to(update_announcement)
                    .wrap(RequirePermission::update(Resource::Communications)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_announcement)
                    .wrap(RequirePermission::delete(Resource::Communications)),
            ),
    );
}

pub fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Events);

    cfg.service(
        web::scope("/api/v1/events")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_events).wrap(read()))
            .route(
                "",
                web::post()
                    .to(create_event)
                    .wrap(RequirePermission::create(Resource::Events)),
            )
            .route("/{id}", web::get().to(get_event).wrap(read()))
            .route(
                "/{id}",
                web::put()
                    .to(update_event)
                    .wrap(RequirePermission::update(Resource::Events)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_event)
                    .wrap(RequirePermission::delete(Resource::Events)),
            ),
    );
}

// 消息只需要组织范围
pub fn configure_message_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Messages);

    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(RequireTenant::organization())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_messages).wrap(read()))
            .route(
                "",
                web::post()
                    .to(send_message)
                    .wrap(RequirePermission::create(Resource::Messages)),
            )
            .route("/unread-count", web::get().to(unread_count).wrap(read()))
            .route(
                "/{id}/read",
                web::post()
                    .to(mark_message_read)
                    .wrap(RequirePermission::update(Resource::Messages)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_message)
                    .wrap(RequirePermission::delete(Resource::Messages)),
            ),
    );
}
