//! 内存缓存后端
//!
//! 基于DashMap的进程内缓存后端，作为开箱即用的默认实现。
//! 不提供淘汰与TTL，容量控制由使用方按需替换为功能更全的后端

use super::backend::CacheBackend;
use crate::error::RepoCacheResult;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use rat_logger::debug;

/// 基于DashMap的内存缓存后端
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: DashMap<String, Bytes>,
}

impl MemoryCacheBackend {
    /// 创建空的内存缓存后端
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// 当前缓存条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> RepoCacheResult<Option<Bytes>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Bytes) -> RepoCacheResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RepoCacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> RepoCacheResult<()> {
        let count = self.entries.len();
        self.entries.clear();
        debug!("已清空内存缓存后端: 条目数={}", count);
        Ok(())
    }
}
