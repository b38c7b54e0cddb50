use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 用户角色
    #[ts(export, export_to = "user.ts")]
    pub enum UserRole {
        SuperAdmin => "super_admin", // 平台管理员，不属于任何组织
        Admin => "admin",            // 组织管理员
        Teacher => "teacher",
        Staff => "staff",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::SuperAdmin, &Self::Admin]
    }

    pub fn platform_roles() -> &'static [&'static UserRole] {
        &[&Self::SuperAdmin]
    }

    pub fn is_super_admin(&self) -> bool {
        *self == UserRole::SuperAdmin
    }
}

string_enum! {
    /// 用户状态
    #[ts(export, export_to = "user.ts")]
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub organization_id: Option<i64>,
    pub default_school_id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        remember_me: bool,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(self.id, self.role.as_str(), remember_me)
            .map_err(|e| format!("生成 token 对失败: {e}"))
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}
