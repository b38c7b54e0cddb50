use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, error_response, not_found};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password;

use super::AuthService;

/// 修改密码前的检查：必须提供正确的当前密码，新密码须满足密码策略
pub(crate) fn check_password_change(
    current_password: Option<&str>,
    new_password: &str,
    stored_hash: &str,
) -> Result<(), (ErrorCode, String)> {
    let Some(current) = current_password.filter(|p| !p.is_empty()) else {
        return Err((
            ErrorCode::UserPasswordInvalid,
            "Current password is required to change the password".to_string(),
        ));
    };
    if !verify_password(current, stored_hash) {
        return Err((
            ErrorCode::AuthFailed,
            "Current password is incorrect".to_string(),
        ));
    }
    validate_password(new_password).map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))
}

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    // 缓存中的用户不含密码哈希，校验时重新读取
    let stored = match storage.get_user_by_id(user.id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(error_response(&e)),
    };

    let password = match update_data.new_password.as_deref() {
        Some(new_password) => {
            if let Err((code, msg)) = check_password_change(
                update_data.current_password.as_deref(),
                new_password,
                &stored.password_hash,
            ) {
                return Ok(bad_request(code, msg));
            }
            match hash_password(new_password) {
                Ok(hash) => Some(hash),
                Err(e) => return Ok(error_response(&e)),
            }
        }
        None => None,
    };

    // 角色、状态、组织等字段不允许本人修改
    let update = UpdateUserRequest {
        password,
        full_name: update_data.full_name,
        phone: update_data.phone,
        avatar_url: update_data.avatar_url,
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(user)) => {
            super::logout::evict_cached_user(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::hash_password;

    #[test]
    fn test_password_change_requires_current_password() {
        let hash = hash_password("OldSecret9").unwrap();

        let err = check_password_change(None, "NewSecret9", &hash).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);

        let err = check_password_change(Some("Wrong1234"), "NewSecret9", &hash).unwrap_err();
        assert_eq!(err.0, ErrorCode::AuthFailed);

        let err = check_password_change(Some("OldSecret9"), "short", &hash).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);

        assert!(check_password_change(Some("OldSecret9"), "NewSecret9", &hash).is_ok());
    }
}
