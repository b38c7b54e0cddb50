/*!
 * 速率限制中间件
 *
 * 固定窗口计数：已登录请求按用户计数，匿名请求按客户端 IP 计数。
 * 超限返回 429，并在 `Retry-After` 中给出当前窗口剩余秒数。
 *
 * ```rust,ignore
 * .route("/login", web::post().to(login).wrap(RateLimit::login()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// 键: 前缀:身份:窗口序号
static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub const fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix,
        }
    }

    /// 5 次/分钟/IP
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 10 次/分钟/用户
    pub fn file_upload() -> Self {
        Self::new("upload", 10, 60)
    }

    pub fn student_import() -> Self {
        Self::new("student_import", 5, 60)
    }

    /// Excel 渲染开销较大
    pub fn report_export() -> Self {
        Self::new("export", 10, 60)
    }
}

/// 当前窗口序号与窗口剩余秒数
fn window_position(now_secs: u64, window_secs: u64) -> (u64, u64) {
    let window_secs = window_secs.max(1);
    (
        now_secs / window_secs,
        window_secs - now_secs % window_secs,
    )
}

/// 客户端 IP：连接信息优先，其次反向代理头
///
/// 直接暴露在公网时转发头可被伪造，应由反向代理覆盖这些头。
fn client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);
    if let Some(ip) = connection_ip.as_deref().and_then(parse_ip) {
        return ip;
    }

    ["X-Forwarded-For", "X-Real-IP"]
        .iter()
        .filter_map(|name| req.headers().get(*name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .find_map(parse_ip)
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_ip(raw: &str) -> Option<String> {
    raw.trim().parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

fn too_many_requests(retry_after: u64, limit: u32) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header((LIMIT_HEADER, limit.to_string()))
        .insert_header((REMAINING_HEADER, "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<User>().map(|user| user.id);
            let identity = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", client_ip(&req)),
            };
            let now = chrono::Utc::now().timestamp().max(0) as u64;
            let (window, retry_after) = window_position(now, limit.window_secs);
            let key = format!("{}:{}:{}", limit.key_prefix, identity, window);

            let count = COUNTERS
                .entry(key)
                .and_upsert_with(|current| {
                    let next = current.map_or(1, |entry| entry.into_value().saturating_add(1));
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} on {} ({}/{})",
                    identity, limit.key_prefix, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(retry_after, limit.max_requests).map_into_right_body(),
                ));
            }

            let mut res = srv.call(req).await?;
            let remaining = limit.max_requests - count;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static(LIMIT_HEADER),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static(REMAINING_HEADER),
                HeaderValue::from(remaining),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::student_import().key_prefix, "student_import");
        assert_eq!(RateLimit::report_export().max_requests, 10);
    }

    #[test]
    fn test_window_position() {
        assert_eq!(window_position(120, 60), (2, 60));
        assert_eq!(window_position(179, 60), (2, 1));
        // 窗口为 0 时按 1 秒处理
        assert_eq!(window_position(5, 0), (5, 1));
    }

    #[test]
    fn test_parse_ip() {
        assert_eq!(parse_ip(" 10.0.0.1 ").as_deref(), Some("10.0.0.1"));
        assert_eq!(parse_ip("::1").as_deref(), Some("::1"));
        assert!(parse_ip("300.1.1.1").is_none());
        assert!(parse_ip("proxy").is_none());
    }
}
