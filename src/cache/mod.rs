//! 缓存管理模块
//!
//! 提供缓存后端能力定义、按用途划分的分区注册表、带标签的缓存条目
//! 以及可替换的缓存键净化器

pub mod backend;
pub mod entry;
pub mod key;
pub mod memory;
pub mod region;

// 重新导出主要的公共类型和结构体
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use key::KeySanitizer;
pub use memory::MemoryCacheBackend;
pub use region::{CacheRegionRegistry, META_REGION, NODES_REGION, QUERY_REGION};
