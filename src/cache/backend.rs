//! 缓存后端能力定义
//!
//! 定义统一的缓存后端trait，屏蔽不同缓存实现的差异。
//! 淘汰策略、TTL管理等均由注入的后端自行负责，装饰层不做任何假设

use crate::error::RepoCacheResult;
use async_trait::async_trait;
use bytes::Bytes;

/// 缓存后端trait，定义统一的键值操作接口
///
/// 后端必须容忍任意净化后的字符串键与不透明的序列化载荷。
/// 跨调用方共享后端时，线程安全由后端实现自行保证
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// 读取缓存条目，不存在时返回None
    async fn get(&self, key: &str) -> RepoCacheResult<Option<Bytes>>;

    /// 写入缓存条目，单次调用完成整个写入
    async fn set(&self, key: &str, value: Bytes) -> RepoCacheResult<()>;

    /// 删除指定键，键不存在时静默成功
    async fn delete(&self, key: &str) -> RepoCacheResult<()>;

    /// 清空整个后端
    async fn clear(&self) -> RepoCacheResult<()>;
}
