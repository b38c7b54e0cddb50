use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission, RequireTenant};
use crate::models::donations::{CreateDonationRequest, DonationListParams, UpdateDonationRequest};
use crate::models::users::permissions::Resource;
use crate::services::DonationService;
use crate::utils::SafeIDI64;

static DONATION_SERVICE: Lazy<DonationService> = Lazy::new(DonationService::new_lazy);

pub async fn list_donations(
    req: HttpRequest,
    query: web::Query<DonationListParams>,
) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.list_donations(query.into_inner(), &req).await
}

pub async fn create_donation(
    req: HttpRequest,
    body: web::Json<CreateDonationRequest>,
) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.create_donation(body.into_inner(), &req).await
}

pub async fn donation_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.donation_summary(&req).await
}

pub async fn get_donation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.get_donation(id.0, &req).await
}

pub async fn update_donation(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateDonationRequest>,
) -> ActixResult<HttpResponse> {
    DONATION_SERVICE
        .update_donation(id.0, body.into_inner(), &req)
        .await
}

pub async fn generate_receipt(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.generate_receipt(id.0, &req).await
}

pub async fn delete_donation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    DONATION_SERVICE.delete_donation(id.0, &req).await
}

pub fn configure_donation_routes(cfg: &mut web::ServiceConfig) {
    let read = || RequirePermission::read(Resource::Donations);
    let update = || RequirePermission::update(Resource::Donations);

    cfg.service(
        web::scope("/api/v1/donations")
            .wrap(RequireTenant::school())
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_donations).wrap(read()))
            .route(
                "",
                web::post()
                    .to(create_donation)
                    .wrap(RequirePermission::create(Resource::Donations)),
            )
            .route("/summary", web::get().to(donation_summary).wrap(read()))
            .route("/{id}", web::get().to(get_donation).wrap(read()))
            .route("/{id}", web::put().to(update_donation).wrap(update()))
            .route(
                "/{id}",
                web::delete()
                    .to(delete_donation)
                    .wrap(RequirePermission::delete(Resource::Donations)),
            )
            .route("/{id}/receipt", web::post().to(generate_receipt).wrap(update())),
    );
}
