use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequirePermission, RequireTenant};
use crate::models::activity_logs::ActivityLogListParams;
use crate::models::fees::requests::{
    BulkAssignRequest, CollectionParams, CreateFeeAssignmentRequest, CreateFeeExceptionRequest,
    CreateFeePaymentRequest, CreateFeeStructureRequest, DefaultersParams,
    FeeAssignmentListParams, FeeExceptionListParams, FeePaymentListParams, FeeReportFilter,
    FeeStructureListParams, StudentFeesParams, UpdateFeeAssignmentRequest,
    UpdateFeeExceptionRequest, UpdateFeeStructureRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

// 收费项目
pub async fn list_structures(
    req: HttpRequest,
    query: web::Query<FeeStructureListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_structures(query.into_inner(), &req).await
}

pub async fn create_structure(
    req: HttpRequest,
    body: web::Json<CreateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_structure(body.into_inner(), &req).await
}

pub async fn get_structure(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_structure(id.0, &req).await
}

pub async fn update_structure(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFeeStructureRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_structure(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_structure(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_structure(id.0, &req).await
}

// 学生应收
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<FeeAssignmentListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_assignments(query.into_inner(), &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateFeeAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_assignment(body.into_inner(), &req).await
}

pub async fn bulk_assign(
    req: HttpRequest,
    body: web::Json<BulkAssignRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.bulk_assign(body.into_inner(), &req).await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_assignment(id.0, &req).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFeeAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_assignment(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_assignment(id.0, &req).await
}

// 缴费
pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<FeePaymentListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_payments(query.into_inner(), &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    body: web::Json<CreateFeePaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.record_payment(body.into_inner(), &req).await
}

pub async fn delete_payment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_payment(id.0, &req).await
}

// 减免
pub async fn list_exceptions(
    req: HttpRequest,
    query: web::Query<FeeExceptionListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_exceptions(query.into_inner(), &req).await
}

pub async fn create_exception(
    req: HttpRequest,
    body: web::Json<CreateFeeExceptionRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_exception(body.into_inner(), &req).await
}

pub async fn get_exception(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_exception(id.0, &req).await
}

pub async fn update_exception(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFeeExceptionRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .update_exception(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_exception(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_exception(id.0, &req).await
}

pub async fn list_activity(
    req: HttpRequest,
    query: web::Query<ActivityLogListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_activity(query.into_inner(), &req).await
}

// 报表
pub async fn dashboard(
    req: HttpRequest,
    query: web::Query<FeeReportFilter>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.dashboard(query.into_inner(), &req).await
}

pub async fn student_fees(
    req: HttpRequest,
    query: web::Query<StudentFeesParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.student_fees(query.into_inner(), &req).await
}

pub async fn collection_report(
    req: HttpRequest,
    query: web::Query<CollectionParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.collection_report(query.into_inner(), &req).await
}

pub async fn defaulters(
    req: HttpRequest,
    query: web::Query<DefaultersParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.defaulters(query.into_inner(), &req).await
}

pub async fn export_defaulters(
    req: HttpRequest,
    query: web::Query<DefaultersParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.export_defaulters(query.into_inner(), &req).await
}

pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Fees);
    let create = || RequirePermission::create(Resource::Fees);
    let update = || RequirePermission::update(Resource::Fees);
    let delete = || RequirePermission::delete(Resource::Fees);

    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            // 收费项目
            .route("/structures", web::get().to(list_structures).wrap(read()))
            .route("/structures", web::post().to(create_structure).wrap(create()))
            .route("/structures/{id}", web::get().to(get_structure).wrap(read()))
            .route("/structures/{id}", web::put().to(update_structure).wrap(update()))
            .route(
                "/structures/{id}",
                web::delete().to(delete_structure).wrap(delete()),
            )
            // 学生应收
            .route("/assignments", web::get().to(list_assignments).wrap(read()))
            .route("/assignments", web::post().to(create_assignment).wrap(create()))
            .route("/assignments/bulk", web::post().to(bulk_assign).wrap(create()))
            .route("/assignments/{id}", web::get().to(get_assignment).wrap(read()))
            .route(
                "/assignments/{id}",
                web::put().to(update_assignment).wrap(update()),
            )
            .route(
                "/assignments/{id}",
                web::delete().to(delete_assignment).wrap(delete()),
            )
            // 缴费
            .route("/payments", web::get().to(list_payments).wrap(read()))
            .route("/payments", web::post().to(record_payment).wrap(create()))
            .route("/payments/{id}", web::delete().to(delete_payment).wrap(delete()))
            // 减免
            .route("/exceptions", web::get().to(list_exceptions).wrap(read()))
            .route("/exceptions", web::post().to(create_exception).wrap(create()))
            .route("/exceptions/{id}", web::get().to(get_exception).wrap(read()))
            .route(
                "/exceptions/{id}",
                web::put().to(update_exception).wrap(update()),
            )
            .route(
                "/exceptions/{id}",
                web::delete().to(delete_exception).wrap(delete()),
            )
            .route("/activity", web::get().to(list_activity).wrap(read()))
            // 报表
            .route("/reports/dashboard", web::get().to(dashboard).wrap(read()))
            .route("/reports/student-fees", web::get().to(student_fees).wrap(read()))
            .route("/reports/collection", web::get().to(collection_report).wrap(read()))
            .route("/reports/defaulters", web::get().to(defaulters).wrap(read()))
            .route(
                "/reports/defaulters/export",
                web::get()
                    .to(export_defaulters)
                    .wrap(RateLimit::report_export())
                    .wrap(read()),
            ),
    );
}
