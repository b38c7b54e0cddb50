use super::entities::User;
use crate::models::common::PaginatedResponse;
use serde::Serialize;
use ts_rs::TS;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
pub type UserListResponse = PaginatedResponse<User>;
