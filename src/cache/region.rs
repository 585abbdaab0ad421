//! 缓存分区注册表
//!
//! 按用途划分的缓存分区管理：meta分区必须存在，nodes与query分区可选。
//! 可选分区缺失时，相应操作族直接透传底层客户端，不做任何缓存

use super::backend::CacheBackend;
use crate::error::{RepoCacheError, RepoCacheResult};
use rat_logger::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// 元数据分区名称（命名空间、节点类型、工作区信息），必须存在
pub const META_REGION: &str = "meta";
/// 节点分区名称（节点载荷、uuid到路径映射、引用列表），可选
pub const NODES_REGION: &str = "nodes";
/// 查询分区名称（查询结果集），可选
pub const QUERY_REGION: &str = "query";

/// 缓存分区注册表
///
/// 持有分区名到缓存后端的映射，构造后只读
pub struct CacheRegionRegistry {
    regions: HashMap<String, Arc<dyn CacheBackend>>,
}

impl std::fmt::Debug for CacheRegionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegionRegistry")
            .field("regions", &self.regions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CacheRegionRegistry {
    /// 基于分区映射构造注册表
    ///
    /// meta分区缺失时返回配置错误，后端能力由trait约束在编译期保证
    pub fn new(regions: HashMap<String, Arc<dyn CacheBackend>>) -> RepoCacheResult<Self> {
        if !regions.contains_key(META_REGION) {
            return Err(RepoCacheError::ConfigError {
                message: format!("缓存分区配置缺少必需的 {} 分区", META_REGION),
            });
        }
        Ok(Self { regions })
    }

    /// 检查指定分区是否存在
    pub fn has_region(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    /// 获取指定分区的后端
    pub fn region(&self, name: &str) -> Option<&Arc<dyn CacheBackend>> {
        self.regions.get(name)
    }

    /// 获取meta分区后端
    ///
    /// 构造时已验证meta分区存在
    pub fn meta(&self) -> &Arc<dyn CacheBackend> {
        self.regions
            .get(META_REGION)
            .expect("meta分区在构造时已验证存在")
    }

    /// 列出已注册的分区名称
    pub fn region_names(&self) -> Vec<&str> {
        self.regions.keys().map(|name| name.as_str()).collect()
    }

    /// 清空指定分区
    ///
    /// 不传名称时清空除meta外的全部分区（nodes与query）：元数据由各写操作
    /// 做单键精确失效，成批清空只针对粗粒度的节点与查询分区。
    /// 传入显式列表时，清空其中实际存在的分区
    pub async fn clear_regions(&self, names: Option<&[&str]>) -> RepoCacheResult<()> {
        let targets: Vec<&str> = match names {
            Some(list) => list.to_vec(),
            None => vec![NODES_REGION, QUERY_REGION],
        };

        for name in targets {
            if let Some(backend) = self.regions.get(name) {
                backend.clear().await?;
                debug!("已清空缓存分区: region={}", name);
            }
        }
        Ok(())
    }

    /// 清空全部已注册分区（含meta）
    ///
    /// 事务提交与回滚后使用：已提交的写入可能影响任何缓存事实
    pub async fn clear_all(&self) -> RepoCacheResult<()> {
        for (name, backend) in &self.regions {
            backend.clear().await?;
            debug!("已清空缓存分区: region={}", name);
        }
        Ok(())
    }
}
