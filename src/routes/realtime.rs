use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::services::realtime::{RealtimeQuery, RealtimeService};

// 令牌在查询串中校验，不经过 RequireJWT
pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<RealtimeQuery>,
) -> ActixResult<HttpResponse> {
    RealtimeService::connect(&req, body, query.into_inner()).await
}

pub fn configure_realtime_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/realtime", web::get().to(connect));
}
