use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, can_manage, managed_organization, user_not_found};
use crate::models::realtime::ChangeAction;
use crate::models::{
    ApiResponse, ErrorCode, OrgScope,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::{
    bad_request, current_user, error_response, error_response_with, realtime::publish_change,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
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

    if update_data.role.is_some_and(|r| r.is_super_admin()) && !caller.role.is_super_admin() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only platform administrators can grant the super admin role",
        )));
    }
    if let Some(email) = update_data.email.as_deref()
        && let Err(msg) = validate_email(email)
    {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Some(school_id) = update_data.default_school_id {
        let Some(organization_id) = target.organization_id else {
            return Ok(bad_request(
                ErrorCode::OrganizationRequired,
                "User has no organization",
            ));
        };
        match storage
            .get_school(&OrgScope { organization_id }, school_id)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::SchoolNotFound,
                    "Default school does not belong to the organization",
                ));
            }
            Err(e) => return Ok(error_response(&e)),
        }
    }
    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password(&password) {
            return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(error_response(&e)),
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            if let Some(org) = user.organization_id {
                publish_change(org, None, "users", ChangeAction::Update, user.id);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(error_response_with(&e, ErrorCode::UserAlreadyExists)),
    }
}
