//! 错误类型定义
//!
//! 定义仓库缓存层的统一错误类型，底层客户端错误原样向上传播

use thiserror::Error;

/// 统一的Result类型别名
pub type RepoCacheResult<T> = Result<T, RepoCacheError>;

/// 仓库缓存层错误类型
#[derive(Error, Debug)]
pub enum RepoCacheError {
    /// 条目未找到（节点、路径或标识符不存在）
    ///
    /// 无论来自负缓存命中还是底层客户端，调用方看到的错误完全一致
    #[error("条目未找到: {message}")]
    ItemNotFound { message: String },

    /// 配置错误（构造期致命错误，不会重试）
    #[error("配置错误: {message}")]
    ConfigError { message: String },

    /// 缓存后端错误（读写或序列化失败，不做掩盖）
    #[error("缓存错误: {message}")]
    CacheError { message: String },

    /// 底层连接错误
    #[error("连接错误: {message}")]
    ConnectionError { message: String },

    /// 查询执行错误
    #[error("查询错误: {message}")]
    QueryError { message: String },

    /// 参数验证错误
    #[error("验证错误: {message}")]
    ValidationError { message: String },
}

impl RepoCacheError {
    /// 判断是否为"未找到"类错误
    ///
    /// 负缓存逻辑依赖此判断：只有未找到类错误会被记录为负缓存条目
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }
}
