//! 租户范围
//!
//! 所有业务数据按组织划分，学校级数据再按学校划分。
//! 范围由 `RequireTenant` 中间件解析后放入请求扩展。

/// 组织级范围（学校、用户、消息等）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgScope {
    pub organization_id: i64,
}

/// 学校级范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    pub organization_id: i64,
    pub school_id: i64,
}

impl TenantScope {
    pub fn new(organization_id: i64, school_id: i64) -> Self {
        Self {
            organization_id,
            school_id,
        }
    }

    pub fn org(&self) -> OrgScope {
        OrgScope {
            organization_id: self.organization_id,
        }
    }
}
