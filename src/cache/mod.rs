//! 对象缓存层
//!
//! 缓存插件通过 `declare_object_cache_plugin!` 在加载期注册，
//! 启动时按配置选择具体实现。

pub mod macros;
pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache, keys};
