/*!
 * 租户范围中间件
 *
 * 必须放在 RequireJWT 之后。解析当前请求所属的组织和学校：
 *
 * - 组织：用户所属组织；平台管理员必须通过 `X-Organization-Id` 指定
 * - 学校：`X-School-Id` 请求头，缺省时取用户的默认学校
 *
 * 学校必须存在、未删除且属于该组织。解析结果以 `OrgScope` / `TenantScope`
 * 放入请求扩展，处理程序通过 `RequireTenant::scope(&req)` 读取。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireTenant::school())
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use crate::cache::{CacheResult, ObjectCache, keys};
use crate::config::AppConfig;
use crate::models::{
    ErrorCode, OrgScope, TenantScope, schools::School, users::entities::User,
};
use crate::storage::Storage;

use super::create_error_response;

pub const ORGANIZATION_HEADER: &str = "X-Organization-Id";
pub const SCHOOL_HEADER: &str = "X-School-Id";

/// 解析失败
#[derive(Debug, Clone, PartialEq)]
pub struct TenantFailure {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl TenantFailure {
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

fn parse_id_header(value: Option<&str>, name: &str) -> Result<Option<i64>, TenantFailure> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
            TenantFailure::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                format!("Invalid {name} header"),
            )
        }),
    }
}

/// 解析组织
///
/// 平台管理员未指定组织时返回 `Ok(None)`，由调用方决定是否允许。
/// 普通用户的 `X-Organization-Id` 被忽略。
pub fn resolve_organization(
    user: &User,
    header: Option<&str>,
) -> Result<Option<i64>, TenantFailure> {
    if user.role.is_super_admin() {
        return parse_id_header(header, ORGANIZATION_HEADER);
    }
    match user.organization_id {
        Some(id) => Ok(Some(id)),
        None => Err(TenantFailure::new(
            StatusCode::FORBIDDEN,
            ErrorCode::OrganizationRequired,
            "User must be assigned to an organization",
        )),
    }
}

/// 选定学校编号：请求头优先，其次用户默认学校
pub fn select_school_id(user: &User, header: Option<&str>) -> Result<i64, TenantFailure> {
    parse_id_header(header, SCHOOL_HEADER)?
        .or(user.default_school_id)
        .ok_or_else(|| {
            TenantFailure::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::SchoolRequired,
                "No school selected: pass X-School-Id or set a default school",
            )
        })
}

/// 校验学校归属
pub fn check_school(
    school: Option<&School>,
    organization_id: i64,
) -> Result<(), TenantFailure> {
    match school {
        Some(s) if s.organization_id == organization_id => Ok(()),
        _ => Err(TenantFailure::new(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "School does not belong to your organization",
        )),
    }
}

async fn load_school(req: &ServiceRequest, organization_id: i64, school_id: i64) -> Option<School> {
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let key = keys::school(organization_id, school_id);

    if let Some(cache) = &cache
        && let CacheResult::Found(json) = cache.get_raw(&key).await
        && let Ok(school) = serde_json::from_str::<School>(&json)
    {
        return Some(school);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())?;
    let school = match storage.find_school(school_id).await {
        Ok(school) => school?,
        Err(e) => {
            info!("加载学校 {} 失败: {}", school_id, e);
            return None;
        }
    };

    if let Some(cache) = &cache
        && school.organization_id == organization_id
        && let Ok(json) = serde_json::to_string(&school)
    {
        cache
            .insert_raw(key, json, AppConfig::get().cache.default_ttl)
            .await;
    }
    Some(school)
}

async fn resolve_scope(req: &ServiceRequest, level: Level) -> Result<(), TenantFailure> {
    let user = req.extensions().get::<User>().cloned().ok_or_else(|| {
        TenantFailure::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Authentication required",
        )
    })?;

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
    };

    let organization_id = resolve_organization(&user, header(ORGANIZATION_HEADER).as_deref())?
        .ok_or_else(|| {
            TenantFailure::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::OrganizationRequired,
                "X-Organization-Id header is required",
            )
        })?;
    req.extensions_mut().insert(OrgScope { organization_id });

    if level == Level::Organization {
        return Ok(());
    }

    let school_id = select_school_id(&user, header(SCHOOL_HEADER).as_deref())?;
    let school = load_school(req, organization_id, school_id).await;
    check_school(school.as_ref(), organization_id)?;

    debug!(
        "Tenant scope resolved: organization {} school {}",
        organization_id, school_id
    );
    req.extensions_mut()
        .insert(TenantScope::new(organization_id, school_id));
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Organization,
    School,
}

#[derive(Clone, Copy)]
pub struct RequireTenant {
    level: Level,
}

impl RequireTenant {
    /// 仅解析组织
    pub fn organization() -> Self {
        Self {
            level: Level::Organization,
        }
    }

    /// 解析组织与学校
    pub fn school() -> Self {
        Self {
            level: Level::School,
        }
    }

    pub fn scope(req: &HttpRequest) -> Option<TenantScope> {
        req.extensions().get::<TenantScope>().copied()
    }

    pub fn org_scope(req: &HttpRequest) -> Option<OrgScope> {
        req.extensions().get::<OrgScope>().copied()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireTenant
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireTenantMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTenantMiddleware {
            service: Rc::new(service),
            level: self.level,
        }))
    }
}

pub struct RequireTenantMiddleware<S> {
    service: Rc<S>,
    level: Level,
}

impl<S, B> Service<ServiceRequest> for RequireTenantMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let level = self.level;

        Box::pin(async move {
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            if let Err(failure) = resolve_scope(&req, level).await {
                info!(
                    "Tenant scope rejected for {}: {}",
                    req.path(),
                    failure.message
                );
                return Ok(req.into_response(
                    create_error_response(failure.status, failure.code, &failure.message)
                        .map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(role: UserRole, organization_id: Option<i64>, default_school: Option<i64>) -> User {
        User {
            id: 1,
            organization_id,
            default_school_id: default_school,
            username: "someone".into(),
            email: "someone@example.com".into(),
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

    fn school(organization_id: i64) -> School {
        School {
            id: 5,
            organization_id,
            name: "Central".into(),
            code: "C1".into(),
            address: None,
            phone: None,
            email: None,
            principal_name: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_member_uses_own_organization() {
        let u = user(UserRole::Admin, Some(7), None);
        assert_eq!(resolve_organization(&u, Some("99")), Ok(Some(7)));
    }

    #[test]
    fn test_member_without_organization_is_forbidden() {
        let u = user(UserRole::Teacher, None, None);
        let err = resolve_organization(&u, None).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "User must be assigned to an organization");
    }

    #[test]
    fn test_super_admin_picks_organization_by_header() {
        let u = user(UserRole::SuperAdmin, None, None);
        assert_eq!(resolve_organization(&u, Some("3")), Ok(Some(3)));
        assert_eq!(resolve_organization(&u, None), Ok(None));
        assert_eq!(
            resolve_organization(&u, Some("abc")).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_school_header_overrides_default() {
        let u = user(UserRole::Staff, Some(1), Some(10));
        assert_eq!(select_school_id(&u, Some("11")), Ok(11));
        assert_eq!(select_school_id(&u, None), Ok(10));
        assert_eq!(select_school_id(&u, Some(" ")), Ok(10));

        let u = user(UserRole::Staff, Some(1), None);
        let err = select_school_id(&u, None).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::SchoolRequired);
    }

    #[test]
    fn test_school_must_belong_to_organization() {
        assert!(check_school(Some(&school(1)), 1).is_ok());
        assert_eq!(
            check_school(Some(&school(2)), 1).unwrap_err().status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            check_school(None, 1).unwrap_err().status,
            StatusCode::FORBIDDEN
        );
    }
}
