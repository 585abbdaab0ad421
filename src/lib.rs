//! rat_repocache - 内容仓库客户端缓存装饰层
//!
//! 用组合方式包装任意事务性内容仓库客户端，按用途划分的缓存分区服务读操作，
//! 写操作与事务边界触发精确或成批的缓存失效，在会话内保证读写一致性
//!
//! 注意：日志系统由调用者自行初始化，本库不会自动初始化日志

// 导出所有公共模块
pub mod cache;
pub mod client;
pub mod error;
pub mod types;

// 重新导出常用类型和函数
pub use cache::{
    CacheBackend, CacheEntry, CacheRegionRegistry, KeySanitizer, MemoryCacheBackend, META_REGION,
    NODES_REGION, QUERY_REGION,
};
pub use client::{CachedRepositoryClient, CachedRepositoryClientBuilder, RepositoryClient};
pub use error::{RepoCacheError, RepoCacheResult};
pub use types::{
    NodeData, NodeDeleteOperation, NodeMoveOperation, NodeStoreOperation, NodeTypeDefinition,
    PropertyDeleteOperation, QueryDescriptor, QueryLanguage,
};

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
