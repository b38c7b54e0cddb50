use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, can_manage, managed_organization, user_not_found};
use crate::models::ApiResponse;
use crate::models::users::responses::UserResponse;
use crate::services::{current_user, error_response};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let managed = match managed_organization(&caller, request) {
        Ok(org) => org,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if can_manage(managed, &user) => Ok(HttpResponse::Ok().json(
            ApiResponse::success(UserResponse { user }, "User information retrieved successfully"),
        )),
        Ok(_) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
