use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

/// 登录成功后返回 access token；refresh token 写入 HttpOnly Cookie
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// access token 有效秒数
    pub expires_in: i64,
    pub user: User,
    /// 前端据此隐藏无权访问的菜单
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
    /// 当前角色拥有的权限列表（`资源.操作`）
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
}
