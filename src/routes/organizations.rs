use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::organizations::{
    CreateOrganizationRequest, OrganizationListParams, UpdateOrganizationRequest,
};
use crate::models::users::permissions::Resource;
use crate::services::OrganizationService;
use crate::utils::SafeIDI64;

static ORGANIZATION_SERVICE: Lazy<OrganizationService> =
    Lazy::new(OrganizationService::new_lazy);

pub async fn list_organizations(
    req: HttpRequest,
    query: web::Query<OrganizationListParams>,
) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE
        .list_organizations(query.into_inner(), &req)
        .await
}

pub async fn create_organization(
    req: HttpRequest,
    body: web::Json<CreateOrganizationRequest>,
) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE
        .create_organization(body.into_inner(), &req)
        .await
}

pub async fn current_organization(req: HttpRequest) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE.current_organization(&req).await
}

pub async fn get_organization(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE.get_organization(id.0, &req).await
}

pub async fn update_organization(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateOrganizationRequest>,
) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE
        .update_organization(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_organization(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE.delete_organization(id.0, &req).await
}

pub fn configure_organization_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/organizations")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_organizations)
                    .wrap(RequirePermission::read(Resource::Organizations)),
            )
            .route(
                "",
                web::post()
                    .to(create_organization)
                    .wrap(RequirePermission::create(Resource::Organizations)),
            )
            // 需在 /{id} 之前注册
            .route("/current", web::get().to(current_organization))
            .route(
                "/{id}",
                web::get()
                    .to(get_organization)
                    .wrap(RequirePermission::read(Resource::Organizations)),
            )
            .route(
                "/{id}",
                web::put()
                    .to(update_organization)
                    .wrap(RequirePermission::update(Resource::Organizations)),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(delete_organization)
                    .wrap(RequirePermission::delete(Resource::Organizations)),
            ),
    );
}
