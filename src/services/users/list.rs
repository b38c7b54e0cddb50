use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, managed_organization};
use crate::models::{
    ApiResponse,
    users::requests::{UserListParams, UserListQuery},
};
use crate::services::{current_user, error_response};

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let organization_id = match managed_organization(&caller, request) {
        Ok(org) => org,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        pagination: query.pagination,
        organization_id,
        role: query.role,
        status: query.status,
        search: query.search,
    };

    match storage.list_users(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
