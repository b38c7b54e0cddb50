use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::attendance::{
    AttendanceListParams, AttendanceSummaryParams, MarkAttendanceRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(query.into_inner(), &req)
        .await
}

pub async fn mark_attendance(
    req: HttpRequest,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(body.into_inner(), &req)
        .await
}

pub async fn attendance_summary(
    req: HttpRequest,
    query: web::Query<AttendanceSummaryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .attendance_summary(query.into_inner(), &req)
        .await
}

pub async fn delete_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(id.0, &req).await
}

pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_attendance)
                    .wrap(RequirePermission::read(Resource::Attendance)),
            )
            .route(
                "/mark",
                web::post()
                    .to(mark_attendance)
                    .wrap(RequirePermission::create(Resource::Attendance)),
            )
            .route(
                "/summary",
                web::get()
                    .to(attendance_summary)
                    .wrap(RequirePermission::read(Resource::Attendance)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_attendance)
                    .wrap(RequirePermission::delete(Resource::Attendance)),
            ),
    );
}
