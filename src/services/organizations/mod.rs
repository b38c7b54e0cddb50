pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::organizations::{
    CreateOrganizationRequest, OrganizationListParams, UpdateOrganizationRequest,
};

define_service!(OrganizationService);

impl OrganizationService {
    pub async fn list_organizations(
        &self,
        params: OrganizationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_organizations(self, params, request).await
    }

    pub async fn create_organization(
        &self,
        req: CreateOrganizationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_organization(self, req, request).await
    }

    pub async fn get_organization(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_organization(self, id, request).await
    }

    // 当前用户所属组织
    pub async fn current_organization(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::current_organization(self, request).await
    }

    pub async fn update_organization(
        &self,
        id: i64,
        req: UpdateOrganizationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_organization(self, id, req, request).await
    }

    pub async fn delete_organization(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_organization(self, id, request).await
    }
}
