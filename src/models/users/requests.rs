use super::entities::{UserRole, UserStatus};
use crate::models::common::{PaginationQuery, empty_string_as_none};
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// 明文密码；进入存储层前会被替换为哈希值
    pub password: String,
    pub role: UserRole,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// 仅平台管理员可指定，其余情况取当前组织
    pub organization_id: Option<i64>,
    pub default_school_id: Option<i64>,
}

// 用户更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub default_school_id: Option<i64>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub pagination: PaginationQuery,
    /// None 表示不限组织（仅平台管理员）
    pub organization_id: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}
