use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, can_manage, managed_organization, user_not_found};
use crate::models::realtime::ChangeAction;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, realtime::publish_change};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if caller.id == user_id {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        ));
    }
    let managed = match managed_organization(&caller, request) {
        Ok(org) => org,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let target = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if can_manage(managed, &user) => user,
        Ok(_) => return Ok(user_not_found()),
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.delete_user(user_id).await {
        Ok(true) => {
            info!("User {} deleted by {}", target.username, caller.username);
            if let Some(org) = target.organization_id {
                publish_change(org, None, "users", ChangeAction::Delete, user_id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}
