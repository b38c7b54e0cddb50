pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_tenant::{ORGANIZATION_HEADER, resolve_organization};
use crate::models::users::entities::User;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, ErrorCode};

define_service!(UserService);

impl UserService {
    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

/// 调用者可管理的组织；平台管理员未指定组织时为 None（全部）
fn managed_organization(
    caller: &User,
    request: &HttpRequest,
) -> Result<Option<i64>, HttpResponse> {
    let header = request
        .headers()
        .get(ORGANIZATION_HEADER)
        .and_then(|h| h.to_str().ok());
    resolve_organization(caller, header).map_err(|failure| {
        HttpResponse::build(failure.status)
            .json(ApiResponse::error_empty(failure.code, failure.message))
    })
}

/// 目标用户是否在调用者的管理范围内
pub(crate) fn can_manage(managed_org: Option<i64>, target: &User) -> bool {
    match managed_org {
        None => true,
        Some(org) => target.organization_id == Some(org),
    }
}

fn user_not_found() -> HttpResponse {
    crate::services::not_found(ErrorCode::UserNotFound, "User not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user_in(org: Option<i64>) -> User {
        User {
            id: 2,
            organization_id: org,
            default_school_id: None,
            username: "member".into(),
            email: "member@example.com".into(),
            password_hash: String::new(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            full_name: None,
            phone: None,
            avatar_url: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_can_manage() {
        assert!(can_manage(None, &user_in(Some(4))));
        assert!(can_manage(Some(4), &user_in(Some(4))));
        assert!(!can_manage(Some(4), &user_in(Some(5))));
        assert!(!can_manage(Some(4), &user_in(None)));
    }
}
