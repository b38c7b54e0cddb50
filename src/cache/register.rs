use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::{future::Future, pin::Pin, sync::Arc};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

/// 插件名 -> 构造器
static OBJECT_CACHE_PLUGINS: Lazy<DashMap<String, ObjectCacheConstructor>> =
    Lazy::new(DashMap::new);

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_PLUGINS.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_PLUGINS
        .get(name)
        .map(|entry| entry.value().clone())
}

/// 已注册插件名（按字母排序）
pub fn registered_object_cache_plugins() -> Vec<String> {
    let mut names: Vec<String> = OBJECT_CACHE_PLUGINS
        .iter()
        .map(|entry| entry.key().clone())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_registered() {
        let names = registered_object_cache_plugins();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
