use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    /// 确定不存在
    NotFound,
    /// 存在但无法取得值（例如后端连接失败）
    ExistsButNoValue,
    /// 成功获取到缓存值
    Found(T),
}

impl<T> CacheResult<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认过期时间
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 缓存键
pub mod keys {
    /// 令牌对应的已认证用户
    pub fn user_by_token(token: &str) -> String {
        format!("user:{token}")
    }

    /// 已解析的学校（租户范围校验）
    pub fn school(organization_id: i64, school_id: i64) -> String {
        format!("school:{organization_id}:{school_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_result_into_option() {
        assert_eq!(CacheResult::Found(3).into_option(), Some(3));
        assert_eq!(CacheResult::<i32>::NotFound.into_option(), None);
        assert_eq!(CacheResult::<i32>::ExistsButNoValue.into_option(), None);
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(keys::user_by_token("abc"), "user:abc");
        assert_eq!(keys::school(1, 2), "school:1:2");
    }
}
