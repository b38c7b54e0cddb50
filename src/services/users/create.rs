use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, managed_organization};
use crate::models::realtime::ChangeAction;
use crate::models::{
    ApiResponse, ErrorCode, OrgScope,
    users::{entities::User, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{
    bad_request, current_user, error_response, error_response_with, realtime::publish_change,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

/// 校验新用户的字段与角色，并确定其所属组织
pub(crate) fn prepare_new_user(
    caller: &User,
    managed_org: Option<i64>,
    req: &mut CreateUserRequest,
) -> Result<(), (ErrorCode, String)> {
    req.username = req.username.trim().to_string();
    req.email = req.email.trim().to_string();
    validate_username(&req.username).map_err(|m| (ErrorCode::UserNameInvalid, m.to_string()))?;
    validate_email(&req.email).map_err(|m| (ErrorCode::UserEmailInvalid, m.to_string()))?;
    validate_password(&req.password).map_err(|m| (ErrorCode::UserPasswordInvalid, m))?;

    if req.role.is_super_admin() {
        if !caller.role.is_super_admin() {
            return Err((
                ErrorCode::Forbidden,
                "Only platform administrators can create super admins".to_string(),
            ));
        }
        // 平台管理员不属于任何组织
        req.organization_id = None;
        req.default_school_id = None;
        return Ok(());
    }

    req.organization_id = match managed_org {
        Some(org) => Some(org),
        None => req.organization_id,
    };
    if req.organization_id.is_none() {
        return Err((
            ErrorCode::OrganizationRequired,
            "Organization is required for this role".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let managed = match managed_organization(&caller, request) {
        Ok(org) => org,
        Err(resp) => return Ok(resp),
    };

    if let Err((code, msg)) = prepare_new_user(&caller, managed, &mut user_data) {
        return Ok(bad_request(code, msg));
    }

    let storage = service.get_storage(request)?;

    // 默认学校必须属于同一组织
    if let (Some(organization_id), Some(school_id)) =
        (user_data.organization_id, user_data.default_school_id)
    {
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

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(&e)),
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created by {}", user.username, caller.username);
            if let Some(org) = user.organization_id {
                publish_change(org, None, "users", ChangeAction::Insert, user.id);
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User created successfully",
            )))
        }
        Err(e) => Ok(error_response_with(&e, ErrorCode::UserAlreadyExists)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn caller(role: UserRole, org: Option<i64>) -> User {
        User {
            id: 1,
            organization_id: org,
            default_school_id: None,
            username: "caller".into(),
            email: "caller@example.com".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            full_name: None,
            phone: None,
            avatar_url: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn request(role: UserRole, org: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            username: "new_teacher".into(),
            email: "teacher@example.com".into(),
            password: "Teach3rPass".into(),
            role,
            full_name: None,
            phone: None,
            organization_id: org,
            default_school_id: None,
        }
    }

    #[test]
    fn test_admin_creates_users_in_own_organization() {
        let admin = caller(UserRole::Admin, Some(3));
        let mut req = request(UserRole::Teacher, Some(99));
        prepare_new_user(&admin, Some(3), &mut req).unwrap();
        assert_eq!(req.organization_id, Some(3));
    }

    #[test]
    fn test_admin_cannot_create_super_admin() {
        let admin = caller(UserRole::Admin, Some(3));
        let mut req = request(UserRole::SuperAdmin, None);
        let err = prepare_new_user(&admin, Some(3), &mut req).unwrap_err();
        assert_eq!(err.0, ErrorCode::Forbidden);
    }

    #[test]
    fn test_super_admin_must_pick_organization_for_members() {
        let root = caller(UserRole::SuperAdmin, None);
        let mut req = request(UserRole::Staff, None);
        let err = prepare_new_user(&root, None, &mut req).unwrap_err();
        assert_eq!(err.0, ErrorCode::OrganizationRequired);

        let mut req = request(UserRole::Staff, Some(8));
        assert!(prepare_new_user(&root, None, &mut req).is_ok());

        let mut req = request(UserRole::SuperAdmin, Some(8));
        prepare_new_user(&root, None, &mut req).unwrap();
        assert_eq!(req.organization_id, None);
    }

    #[test]
    fn test_weak_password_rejected() {
        let admin = caller(UserRole::Admin, Some(3));
        let mut req = request(UserRole::Teacher, None);
        req.password = "weak".into();
        let err = prepare_new_user(&admin, Some(3), &mut req).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserPasswordInvalid);
    }
}
