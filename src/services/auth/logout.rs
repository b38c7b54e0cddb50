use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::{ObjectCache, keys};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 移除当前 access token 对应的用户缓存
pub(crate) async fn evict_cached_user(request: &HttpRequest) {
    if let Some(token) = RequireJWT::extract_bearer_token(request)
        && let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&keys::user_by_token(&token)).await;
    }
}

pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    evict_cached_user(request).await;

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out successfully")))
}
