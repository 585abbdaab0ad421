//! 缓存条目载荷
//!
//! 定义带标签的缓存条目类型，用结构化的NotFound变体替代魔法哨兵值，
//! 使负缓存条目与任何合法载荷在结构上不可能冲突

use crate::error::{RepoCacheError, RepoCacheResult};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 缓存条目
///
/// `Found`保存真实结果的JSON表示，`NotFound`记录一次确定性的查找失败
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CacheEntry {
    /// 真实结果载荷
    Found(JsonValue),
    /// 负缓存条目：此前的查找已确定失败
    NotFound,
}

impl CacheEntry {
    /// 将任意可序列化载荷包装为Found条目并编码
    pub fn encode_found<T: Serialize>(value: &T) -> RepoCacheResult<Bytes> {
        let json = serde_json::to_value(value).map_err(|e| RepoCacheError::CacheError {
            message: format!("缓存载荷序列化失败: {}", e),
        })?;
        CacheEntry::Found(json).encode()
    }

    /// 编码条目为后端存储格式
    pub fn encode(&self) -> RepoCacheResult<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| RepoCacheError::CacheError {
                message: format!("缓存条目编码失败: {}", e),
            })
    }

    /// 从后端存储格式解码条目
    pub fn decode(data: &Bytes) -> RepoCacheResult<Self> {
        serde_json::from_slice(data).map_err(|e| RepoCacheError::CacheError {
            message: format!("缓存条目解码失败: {}", e),
        })
    }
}

/// 将Found载荷还原为具体类型
pub fn from_found<T: DeserializeOwned>(value: JsonValue) -> RepoCacheResult<T> {
    serde_json::from_value(value).map_err(|e| RepoCacheError::CacheError {
        message: format!("缓存载荷反序列化失败: {}", e),
    })
}
