//! 缓存仓库客户端装饰器
//!
//! 用组合方式包装任意底层仓库客户端，在客户端操作层实现缓存逻辑：
//! 读操作按分区做读穿透（含负缓存），写操作在底层调用成功后做精确或成批失效，
//! 事务提交与回滚后无条件清空全部分区

use super::RepositoryClient;
use crate::cache::entry::{self, CacheEntry};
use crate::cache::{CacheBackend, CacheRegionRegistry, KeySanitizer, NODES_REGION, QUERY_REGION};
use crate::error::{RepoCacheError, RepoCacheResult};
use crate::types::*;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use rat_logger::{debug, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 工作区列表的meta缓存键
const WORKSPACES_KEY: &str = "workspaces";
/// 用户节点类型集合的meta缓存键
const NODE_TYPES_KEY: &str = "node_types";
/// 命名空间映射的meta缓存键
const NAMESPACES_KEY: &str = "namespaces";

/// 带缓存功能的仓库客户端装饰器
///
/// 持有底层客户端的引用并显式委托每个操作，不依赖继承回落语义。
/// 装饰器独占分区注册表与键净化器；缓存后端由外部注入
pub struct CachedRepositoryClient {
    /// 被包装的底层仓库客户端
    inner: Arc<dyn RepositoryClient>,
    /// 缓存分区注册表
    regions: CacheRegionRegistry,
    /// 可在构造后整体替换的键净化器
    key_sanitizer: ArcSwap<KeySanitizer>,
    /// 会话工作区名称，构造时从底层客户端捕获
    workspace: String,
}

impl std::fmt::Debug for CachedRepositoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRepositoryClient")
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}

impl CachedRepositoryClient {
    /// 创建缓存装饰器
    ///
    /// 分区映射中必须包含meta分区，否则返回配置错误
    pub fn new(
        inner: Arc<dyn RepositoryClient>,
        regions: HashMap<String, Arc<dyn CacheBackend>>,
    ) -> RepoCacheResult<Self> {
        let regions = CacheRegionRegistry::new(regions)?;
        let workspace = inner.workspace_name();

        info!(
            "缓存装饰层初始化成功 - 工作区: {}, 分区: {:?}",
            workspace,
            regions.region_names()
        );

        Ok(Self {
            inner,
            regions,
            key_sanitizer: ArcSwap::from_pointee(KeySanitizer::default()),
            workspace,
        })
    }

    /// 创建构建器
    pub fn builder() -> CachedRepositoryClientBuilder {
        CachedRepositoryClientBuilder::new()
    }

    /// 替换键净化器，立即对后续操作生效
    ///
    /// 替换后旧净化器写入的条目不再可达，等同于一次冷启动
    pub fn set_key_sanitizer(&self, sanitizer: KeySanitizer) {
        warn!("键净化器已替换，此前写入的缓存条目将不再命中");
        self.key_sanitizer.store(Arc::new(sanitizer));
    }

    /// 净化一个原始缓存键
    fn sanitize_key(&self, raw_key: &str) -> String {
        self.key_sanitizer.load().sanitize(raw_key)
    }

    /// 节点载荷的缓存键
    fn node_key(&self, path: &str) -> String {
        format!("nodes: {}, {}", path, self.workspace)
    }

    /// uuid到路径映射的缓存键
    fn node_by_uuid_key(&self, identifier: &Uuid) -> String {
        format!("nodes by uuid: {}, {}", identifier, self.workspace)
    }

    /// 强引用列表的缓存键
    fn references_key(&self, path: &str, name: Option<&str>) -> String {
        format!(
            "nodes references: {}, {}, {}",
            path,
            name.unwrap_or(""),
            self.workspace
        )
    }

    /// 弱引用列表的缓存键
    fn weak_references_key(&self, path: &str, name: Option<&str>) -> String {
        format!(
            "nodes weak references: {}, {}, {}",
            path,
            name.unwrap_or(""),
            self.workspace
        )
    }

    /// 工作区存在性标记的缓存键
    fn workspace_key(name: &str) -> String {
        format!("workspace: {}", name)
    }

    /// 按名称列表获取节点类型的缓存键
    fn node_types_by_name_key(names: &[String]) -> RepoCacheResult<String> {
        let serialized =
            serde_json::to_string(names).map_err(|e| RepoCacheError::CacheError {
                message: format!("节点类型名称列表序列化失败: {}", e),
            })?;
        Ok(format!("nodetypes: {}", serialized))
    }

    /// 查询结果的缓存键
    fn query_key(&self, query: &QueryDescriptor) -> String {
        format!(
            "query: {}, {}, {}, {}, {}",
            query.statement,
            query.limit.map(|v| v.to_string()).unwrap_or_default(),
            query.offset.map(|v| v.to_string()).unwrap_or_default(),
            query.language.as_str(),
            self.workspace
        )
    }

    /// 读取分区中的条目并还原为具体类型
    ///
    /// 负缓存条目命中时转换为ItemNotFound错误，未命中返回None
    async fn lookup<T: DeserializeOwned>(
        &self,
        backend: &Arc<dyn CacheBackend>,
        key: &str,
        not_found_message: impl FnOnce() -> String,
    ) -> RepoCacheResult<Option<T>> {
        match backend.get(key).await? {
            Some(data) => match CacheEntry::decode(&data)? {
                CacheEntry::NotFound => {
                    debug!("负缓存命中: key={}", key);
                    Err(RepoCacheError::ItemNotFound {
                        message: not_found_message(),
                    })
                }
                CacheEntry::Found(value) => {
                    debug!("缓存命中: key={}", key);
                    Ok(Some(entry::from_found(value)?))
                }
            },
            None => {
                debug!("缓存未命中: key={}", key);
                Ok(None)
            }
        }
    }

    /// 将真实结果写入分区
    async fn store<T: Serialize>(
        &self,
        backend: &Arc<dyn CacheBackend>,
        key: &str,
        value: &T,
    ) -> RepoCacheResult<()> {
        backend.set(key, CacheEntry::encode_found(value)?).await
    }

    /// 将负缓存条目写入分区
    async fn store_not_found(
        &self,
        backend: &Arc<dyn CacheBackend>,
        key: &str,
    ) -> RepoCacheResult<()> {
        backend.set(key, CacheEntry::NotFound.encode()?).await
    }

    /// 精确失效单个节点的缓存条目
    ///
    /// 按路径删除节点载荷键；可引用节点同时删除uuid映射键。
    /// 兄弟节点的缓存条目不受影响
    async fn clear_node_cache(&self, node: &NodeData) -> RepoCacheResult<()> {
        let Some(nodes) = self.regions.region(NODES_REGION) else {
            return Ok(());
        };

        let key = self.sanitize_key(&self.node_key(&node.path));
        nodes.delete(&key).await?;

        if node.referenceable {
            if let Some(identifier) = &node.identifier {
                let key = self.sanitize_key(&self.node_by_uuid_key(identifier));
                nodes.delete(&key).await?;
            }
        }
        debug!("已失效节点缓存: path={}", node.path);
        Ok(())
    }

    /// 用底层客户端的当前命名空间集合覆写meta缓存
    ///
    /// 命名空间是小而全量加载的集合，整体覆写比精确删除更简单且同样正确
    async fn refresh_namespaces_cache(&self) -> RepoCacheResult<()> {
        let namespaces = self.inner.get_namespaces().await?;
        let key = self.sanitize_key(NAMESPACES_KEY);
        self.store(self.regions.meta(), &key, &namespaces).await
    }
}

#[async_trait]
impl RepositoryClient for CachedRepositoryClient {
    fn workspace_name(&self) -> String {
        self.workspace.clone()
    }

    fn in_transaction(&self) -> bool {
        self.inner.in_transaction()
    }

    /// 按路径获取节点 - 读穿透，未找到结果记入负缓存
    async fn get_node(&self, path: &str) -> RepoCacheResult<NodeData> {
        let Some(nodes) = self.regions.region(NODES_REGION) else {
            return self.inner.get_node(path).await;
        };

        let key = self.sanitize_key(&self.node_key(path));
        let workspace = &self.workspace;
        if let Some(node) = self
            .lookup(nodes, &key, || {
                format!("工作区 {} 中不存在节点 {}", workspace, path)
            })
            .await?
        {
            return Ok(node);
        }

        match self.inner.get_node(path).await {
            Ok(node) => {
                self.store(nodes, &key, &node).await?;
                Ok(node)
            }
            Err(e) if e.is_not_found() => {
                self.store_not_found(nodes, &key).await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// 批量获取节点 - 分解为逐个单节点获取，未找到的路径被静默跳过
    async fn get_nodes(&self, paths: &[String]) -> RepoCacheResult<HashMap<String, NodeData>> {
        if !self.regions.has_region(NODES_REGION) {
            return self.inner.get_nodes(paths).await;
        }

        let mut nodes = HashMap::new();
        for path in paths {
            match self.get_node(path).await {
                Ok(node) => {
                    nodes.insert(path.clone(), node);
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(nodes)
    }

    /// 按标识符获取节点 - 由两次独立缓存的查找组合而成
    async fn get_node_by_identifier(&self, identifier: &Uuid) -> RepoCacheResult<NodeData> {
        let path = self.get_node_path_for_identifier(identifier, None).await?;
        let mut node = self.get_node(&path).await?;
        node.path = path;
        Ok(node)
    }

    /// 按标识符批量获取节点 - 解析失败的标识符被静默跳过
    async fn get_nodes_by_identifier(
        &self,
        identifiers: &[Uuid],
    ) -> RepoCacheResult<HashMap<String, NodeData>> {
        let mut nodes = HashMap::new();
        for identifier in identifiers {
            let path = match self.get_node_path_for_identifier(identifier, None).await {
                Ok(path) => path,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            match self.get_node(&path).await {
                Ok(node) => {
                    nodes.insert(path, node);
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(nodes)
    }

    /// 解析标识符对应的节点路径 - 读穿透，未找到结果记入负缓存
    ///
    /// 指定了目标工作区时直接透传：缓存键只绑定当前会话工作区
    async fn get_node_path_for_identifier(
        &self,
        identifier: &Uuid,
        workspace: Option<&str>,
    ) -> RepoCacheResult<String> {
        let Some(nodes) = self.regions.region(NODES_REGION) else {
            return self
                .inner
                .get_node_path_for_identifier(identifier, workspace)
                .await;
        };
        if workspace.is_some() {
            return self
                .inner
                .get_node_path_for_identifier(identifier, workspace)
                .await;
        }

        let key = self.sanitize_key(&self.node_by_uuid_key(identifier));
        if let Some(path) = self
            .lookup(nodes, &key, || {
                format!("不存在标识符为 {} 的节点", identifier)
            })
            .await?
        {
            return Ok(path);
        }

        match self
            .inner
            .get_node_path_for_identifier(identifier, None)
            .await
        {
            Ok(path) => {
                self.store(nodes, &key, &path).await?;
                Ok(path)
            }
            Err(e) if e.is_not_found() => {
                self.store_not_found(nodes, &key).await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// 获取强引用列表 - 读穿透，不做负缓存
    async fn get_references(
        &self,
        path: &str,
        name: Option<&str>,
    ) -> RepoCacheResult<Vec<String>> {
        let Some(nodes) = self.regions.region(NODES_REGION) else {
            return self.inner.get_references(path, name).await;
        };

        let key = self.sanitize_key(&self.references_key(path, name));
        if let Some(references) = self.lookup(nodes, &key, String::new).await? {
            return Ok(references);
        }

        let references = self.inner.get_references(path, name).await?;
        self.store(nodes, &key, &references).await?;
        Ok(references)
    }

    /// 获取弱引用列表 - 读穿透，不做负缓存
    ///
    /// 已缓存的空列表同样视为命中，不会重复触达底层客户端
    async fn get_weak_references(
        &self,
        path: &str,
        name: Option<&str>,
    ) -> RepoCacheResult<Vec<String>> {
        let Some(nodes) = self.regions.region(NODES_REGION) else {
            return self.inner.get_weak_references(path, name).await;
        };

        let key = self.sanitize_key(&self.weak_references_key(path, name));
        if let Some(references) = self.lookup(nodes, &key, String::new).await? {
            return Ok(references);
        }

        let references = self.inner.get_weak_references(path, name).await?;
        self.store(nodes, &key, &references).await?;
        Ok(references)
    }

    /// 检查工作区是否存在 - 只缓存肯定结果
    async fn workspace_exists(&self, name: &str) -> RepoCacheResult<bool> {
        let key = self.sanitize_key(&Self::workspace_key(name));
        let meta = self.regions.meta();

        if let Some(data) = meta.get(&key).await? {
            if matches!(CacheEntry::decode(&data)?, CacheEntry::Found(_)) {
                debug!("工作区存在性缓存命中: workspace={}", name);
                return Ok(true);
            }
        }

        let exists = self.inner.workspace_exists(name).await?;
        if exists {
            self.store(meta, &key, &true).await?;
        }
        Ok(exists)
    }

    /// 列出可访问工作区名称 - meta分区读穿透
    async fn get_accessible_workspace_names(&self) -> RepoCacheResult<Vec<String>> {
        let key = self.sanitize_key(WORKSPACES_KEY);
        let meta = self.regions.meta();

        if let Some(workspaces) = self.lookup(meta, &key, String::new).await? {
            return Ok(workspaces);
        }

        let workspaces = self.inner.get_accessible_workspace_names().await?;
        self.store(meta, &key, &workspaces).await?;
        Ok(workspaces)
    }

    /// 获取用户节点类型集合 - 事务期间完全绕过缓存
    ///
    /// 事务内注册的类型必须对同一事务内的后续读取立即可见，
    /// 且不能过早写入可能被其他会话共享的缓存
    async fn fetch_user_node_types(&self) -> RepoCacheResult<Vec<NodeTypeDefinition>> {
        if self.inner.in_transaction() {
            return self.inner.fetch_user_node_types().await;
        }

        let key = self.sanitize_key(NODE_TYPES_KEY);
        let meta = self.regions.meta();

        if let Some(types) = self.lookup(meta, &key, String::new).await? {
            return Ok(types);
        }

        let types = self.inner.fetch_user_node_types().await?;
        self.store(meta, &key, &types).await?;
        Ok(types)
    }

    /// 按名称获取节点类型 - meta分区读穿透，按名称列表分键
    async fn get_node_types(&self, names: &[String]) -> RepoCacheResult<Vec<NodeTypeDefinition>> {
        let key = self.sanitize_key(&Self::node_types_by_name_key(names)?);
        let meta = self.regions.meta();

        if let Some(types) = self.lookup(meta, &key, String::new).await? {
            return Ok(types);
        }

        let types = self.inner.get_node_types(names).await?;
        self.store(meta, &key, &types).await?;
        Ok(types)
    }

    /// 获取命名空间映射 - meta分区读穿透
    async fn get_namespaces(&self) -> RepoCacheResult<HashMap<String, String>> {
        let key = self.sanitize_key(NAMESPACES_KEY);
        let meta = self.regions.meta();

        if let Some(namespaces) = self.lookup(meta, &key, String::new).await? {
            return Ok(namespaces);
        }

        let namespaces = self.inner.get_namespaces().await?;
        self.store(meta, &key, &namespaces).await?;
        Ok(namespaces)
    }

    /// 执行查询 - query分区读穿透，按语句、分页与语言分键
    async fn query(&self, query: &QueryDescriptor) -> RepoCacheResult<Vec<JsonValue>> {
        let Some(cache) = self.regions.region(QUERY_REGION) else {
            return self.inner.query(query).await;
        };

        let key = self.sanitize_key(&self.query_key(query));
        if let Some(result) = self.lookup(cache, &key, String::new).await? {
            return Ok(result);
        }

        let result = self.inner.query(query).await?;
        self.store(cache, &key, &result).await?;
        Ok(result)
    }

    /// 创建工作区 - 成功后失效工作区列表并写入存在性标记
    async fn create_workspace(
        &self,
        name: &str,
        src_workspace: Option<&str>,
    ) -> RepoCacheResult<()> {
        self.inner.create_workspace(name, src_workspace).await?;

        let meta = self.regions.meta();
        meta.delete(&self.sanitize_key(WORKSPACES_KEY)).await?;
        self.store(meta, &self.sanitize_key(&Self::workspace_key(name)), &true)
            .await
    }

    /// 删除工作区 - 成功后失效工作区元数据并清空nodes与query分区
    async fn delete_workspace(&self, name: &str) -> RepoCacheResult<()> {
        self.inner.delete_workspace(name).await?;

        let meta = self.regions.meta();
        meta.delete(&self.sanitize_key(WORKSPACES_KEY)).await?;
        meta.delete(&self.sanitize_key(&Self::workspace_key(name)))
            .await?;
        self.regions.clear_regions(None).await
    }

    /// 复制节点 - 目标及其全部后代受影响，精确集合不可知，成批清空
    async fn copy_node(
        &self,
        src_path: &str,
        dest_path: &str,
        src_workspace: Option<&str>,
    ) -> RepoCacheResult<()> {
        self.inner
            .copy_node(src_path, dest_path, src_workspace)
            .await?;
        self.regions.clear_regions(None).await
    }

    /// 批量删除节点 - 成功后清空nodes与query分区
    async fn delete_nodes(&self, operations: &[NodeDeleteOperation]) -> RepoCacheResult<()> {
        self.inner.delete_nodes(operations).await?;
        self.regions.clear_regions(None).await
    }

    /// 立即删除节点 - 成功后清空nodes与query分区
    async fn delete_node_immediately(&self, path: &str) -> RepoCacheResult<()> {
        self.inner.delete_node_immediately(path).await?;
        self.regions.clear_regions(None).await
    }

    /// 批量删除属性 - 此处拿不到父节点，无法做精确失效，成批清空
    async fn delete_properties(
        &self,
        operations: &[PropertyDeleteOperation],
    ) -> RepoCacheResult<()> {
        self.inner.delete_properties(operations).await?;
        self.regions.clear_regions(None).await
    }

    /// 立即删除属性 - 此处拿不到父节点，无法做精确失效，成批清空
    async fn delete_property_immediately(&self, path: &str) -> RepoCacheResult<()> {
        self.inner.delete_property_immediately(path).await?;
        self.regions.clear_regions(None).await
    }

    /// 批量移动节点 - 成功后清空nodes与query分区
    async fn move_nodes(&self, operations: &[NodeMoveOperation]) -> RepoCacheResult<()> {
        self.inner.move_nodes(operations).await?;
        self.regions.clear_regions(None).await
    }

    /// 立即移动节点 - 成功后清空nodes与query分区
    async fn move_node_immediately(
        &self,
        src_path: &str,
        dest_path: &str,
    ) -> RepoCacheResult<()> {
        self.inner
            .move_node_immediately(src_path, dest_path)
            .await?;
        self.regions.clear_regions(None).await
    }

    /// 重排子节点 - 受影响节点已知，只做单节点精确失效
    async fn reorder_children(&self, node: &NodeData) -> RepoCacheResult<()> {
        self.inner.reorder_children(node).await?;
        self.clear_node_cache(node).await
    }

    /// 批量存储节点 - 成功后清空nodes与query分区
    async fn store_nodes(&self, operations: &[NodeStoreOperation]) -> RepoCacheResult<()> {
        self.inner.store_nodes(operations).await?;
        self.regions.clear_regions(None).await
    }

    /// 注册节点类型 - 非事务期间失效用户节点类型缓存
    ///
    /// 事务内的注册不触达共享缓存，事务结束时的全量清空兜底
    async fn register_node_types(
        &self,
        definitions: &[NodeTypeDefinition],
        allow_update: bool,
    ) -> RepoCacheResult<()> {
        self.inner
            .register_node_types(definitions, allow_update)
            .await?;

        if !self.inner.in_transaction() {
            self.regions
                .meta()
                .delete(&self.sanitize_key(NODE_TYPES_KEY))
                .await?;
        }
        Ok(())
    }

    /// 注册命名空间 - 用当前全量集合覆写meta缓存
    async fn register_namespace(&self, prefix: &str, uri: &str) -> RepoCacheResult<()> {
        self.inner.register_namespace(prefix, uri).await?;
        self.refresh_namespaces_cache().await
    }

    /// 注销命名空间 - 用当前全量集合覆写meta缓存
    async fn unregister_namespace(&self, prefix: &str) -> RepoCacheResult<()> {
        self.inner.unregister_namespace(prefix).await?;
        self.refresh_namespaces_cache().await
    }

    /// 开启事务 - 纯委托，缓存不做任何动作
    async fn begin_transaction(&self) -> RepoCacheResult<()> {
        self.inner.begin_transaction().await
    }

    /// 提交事务 - 已提交写入可能触及任何缓存事实，清空全部分区（含meta）
    async fn commit_transaction(&self) -> RepoCacheResult<()> {
        self.inner.commit_transaction().await?;
        self.regions.clear_all().await
    }

    /// 回滚事务 - 事务期间漏入的投机条目不得存活，清空全部分区（含meta）
    async fn rollback_transaction(&self) -> RepoCacheResult<()> {
        self.inner.rollback_transaction().await?;
        self.regions.clear_all().await
    }
}

/// 缓存装饰器构建器
///
/// 链式设置底层客户端、缓存分区与可选的键净化器
pub struct CachedRepositoryClientBuilder {
    inner: Option<Arc<dyn RepositoryClient>>,
    regions: HashMap<String, Arc<dyn CacheBackend>>,
    key_sanitizer: Option<KeySanitizer>,
}

impl CachedRepositoryClientBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            inner: None,
            regions: HashMap::new(),
            key_sanitizer: None,
        }
    }

    /// 设置被包装的底层客户端
    pub fn inner(mut self, inner: Arc<dyn RepositoryClient>) -> Self {
        self.inner = Some(inner);
        self
    }

    /// 注册一个缓存分区
    ///
    /// # 参数
    ///
    /// * `name` - 分区名称（meta必需，nodes与query可选）
    /// * `backend` - 该分区使用的缓存后端
    pub fn region(mut self, name: impl Into<String>, backend: Arc<dyn CacheBackend>) -> Self {
        self.regions.insert(name.into(), backend);
        self
    }

    /// 设置自定义键净化器
    pub fn key_sanitizer(mut self, sanitizer: KeySanitizer) -> Self {
        self.key_sanitizer = Some(sanitizer);
        self
    }

    /// 构建装饰器
    ///
    /// 底层客户端未设置或meta分区缺失时返回配置错误
    pub fn build(self) -> RepoCacheResult<CachedRepositoryClient> {
        let inner = self.inner.ok_or_else(|| RepoCacheError::ConfigError {
            message: "构建缓存装饰器前必须设置底层客户端".to_string(),
        })?;

        let client = CachedRepositoryClient::new(inner, self.regions)?;
        if let Some(sanitizer) = self.key_sanitizer {
            client.key_sanitizer.store(Arc::new(sanitizer));
        }
        Ok(client)
    }
}

impl Default for CachedRepositoryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
