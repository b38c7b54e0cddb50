//! 业务逻辑层
//!
//! 每个业务域一个 `XxxService`，路由层通过懒加载的静态实例调用。
//! 存储层返回的 `NazimError` 统一经 `error_response` 映射为 HTTP 响应。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error::InternalError};
use std::sync::Arc;
use tracing::error;

use crate::errors::NazimError;
use crate::middlewares::{RequireJWT, RequireTenant};
use crate::models::{ApiResponse, ErrorCode, OrgScope, TenantScope, users::entities::User};
use crate::storage::Storage;

/// 定义持有懒加载存储句柄的服务结构体
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> actix_web::Result<std::sync::Arc<dyn crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub mod academic;
pub mod attendance;
pub mod auth;
pub mod communications;
pub mod donations;
pub mod exams;
pub mod fees;
pub mod files;
pub mod hostel;
pub mod library;
pub mod organizations;
pub mod realtime;
pub mod schools;
pub mod staff;
pub mod students;
pub mod timetables;
pub mod users;

pub use academic::AcademicService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use communications::CommunicationService;
pub use donations::DonationService;
pub use exams::ExamService;
pub use fees::FeeService;
pub use files::FileService;
pub use hostel::HostelService;
pub use library::LibraryService;
pub use organizations::OrganizationService;
pub use schools::SchoolService;
pub use staff::StaffService;
pub use students::StudentService;
pub use timetables::TimetableService;
pub use users::UserService;

/// 构造直接返回给客户端的错误
pub(crate) fn reject(
    response: impl FnOnce() -> actix_web::HttpResponseBuilder,
    code: ErrorCode,
    message: &str,
) -> actix_web::Error {
    InternalError::from_response(
        message.to_string(),
        response().json(ApiResponse::error_empty(code, message)),
    )
    .into()
}

pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            reject(
                HttpResponse::InternalServerError,
                ErrorCode::InternalServerError,
                "Storage is not available",
            )
        })
}

/// 当前登录用户
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        reject(
            HttpResponse::Unauthorized,
            ErrorCode::Unauthorized,
            "Authentication required",
        )
    })
}

/// 学校级租户范围（由 RequireTenant::school 写入）
pub(crate) fn tenant_scope(request: &HttpRequest) -> ActixResult<TenantScope> {
    RequireTenant::scope(request).ok_or_else(|| {
        reject(
            HttpResponse::BadRequest,
            ErrorCode::SchoolRequired,
            "School scope is not resolved",
        )
    })
}

/// 组织级租户范围（由 RequireTenant 写入）
pub(crate) fn org_scope(request: &HttpRequest) -> ActixResult<OrgScope> {
    RequireTenant::org_scope(request).ok_or_else(|| {
        reject(
            HttpResponse::BadRequest,
            ErrorCode::OrganizationRequired,
            "Organization scope is not resolved",
        )
    })
}

/// 存储层错误的 HTTP 状态与业务错误码
pub(crate) fn error_status(err: &NazimError) -> (actix_web::http::StatusCode, ErrorCode) {
    let code = match err {
        NazimError::Validation(_) | NazimError::DateParse(_) => ErrorCode::ValidationFailed,
        NazimError::NotFound(_) => ErrorCode::NotFound,
        NazimError::Conflict(_) => ErrorCode::Conflict,
        NazimError::Authentication(_) => ErrorCode::Unauthorized,
        NazimError::Authorization(_) | NazimError::TenantScope(_) => ErrorCode::Forbidden,
        _ => ErrorCode::InternalServerError,
    };
    (err.status_code(), code)
}

/// 存储层错误转响应；服务端错误只记录日志，不把细节返回给客户端
pub(crate) fn error_response(err: &NazimError) -> HttpResponse {
    let (status, code) = error_status(err);
    let message = if status.is_server_error() {
        error!("{}", err.format_simple());
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}

/// 同 `error_response`，但冲突错误使用业务域更具体的错误码
pub(crate) fn error_response_with(err: &NazimError, conflict_code: ErrorCode) -> HttpResponse {
    match err {
        NazimError::Conflict(_) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(conflict_code, err.message())),
        _ => error_response(err),
    }
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 今天（UTC）
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&NazimError::validation("x")).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&NazimError::not_found("x")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&NazimError::conflict("x")),
            (StatusCode::CONFLICT, ErrorCode::Conflict)
        );
        assert_eq!(
            error_status(&NazimError::tenant_scope("x")).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_status(&NazimError::database_operation("x")).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_are_not_leaked() {
        let resp = error_response(&NazimError::database_operation("secret sql"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = error_response_with(&NazimError::conflict("taken"), ErrorCode::SchoolCodeExists);
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}
