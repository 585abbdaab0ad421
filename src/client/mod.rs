//! 仓库客户端模块
//!
//! 定义统一的内容仓库客户端操作接口，并提供透明缓存装饰器实现

use crate::error::RepoCacheResult;
use crate::types::*;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use uuid::Uuid;

mod cached;

pub use cached::{CachedRepositoryClient, CachedRepositoryClientBuilder};

/// 内容仓库客户端trait，定义统一的仓库操作接口
///
/// 装饰器消费并重新暴露完全相同的操作面，成功与错误契约保持一致。
/// 事务标志由底层客户端持有，装饰层只读取
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// 当前会话绑定的工作区名称，客户端生命周期内不变
    fn workspace_name(&self) -> String;

    /// 当前是否处于写事务中
    fn in_transaction(&self) -> bool;

    /// 按路径获取节点
    async fn get_node(&self, path: &str) -> RepoCacheResult<NodeData>;

    /// 批量获取节点，解析失败的路径被静默跳过
    async fn get_nodes(&self, paths: &[String]) -> RepoCacheResult<HashMap<String, NodeData>>;

    /// 按标识符获取节点
    async fn get_node_by_identifier(&self, identifier: &Uuid) -> RepoCacheResult<NodeData>;

    /// 按标识符批量获取节点，返回以路径为键的映射
    async fn get_nodes_by_identifier(
        &self,
        identifiers: &[Uuid],
    ) -> RepoCacheResult<HashMap<String, NodeData>>;

    /// 解析标识符对应的节点路径
    ///
    /// 指定workspace时在目标工作区解析，否则使用当前工作区
    async fn get_node_path_for_identifier(
        &self,
        identifier: &Uuid,
        workspace: Option<&str>,
    ) -> RepoCacheResult<String>;

    /// 获取指向指定节点的强引用属性路径列表
    async fn get_references(
        &self,
        path: &str,
        name: Option<&str>,
    ) -> RepoCacheResult<Vec<String>>;

    /// 获取指向指定节点的弱引用属性路径列表
    async fn get_weak_references(
        &self,
        path: &str,
        name: Option<&str>,
    ) -> RepoCacheResult<Vec<String>>;

    /// 检查工作区是否存在
    async fn workspace_exists(&self, name: &str) -> RepoCacheResult<bool>;

    /// 列出当前会话可访问的工作区名称
    async fn get_accessible_workspace_names(&self) -> RepoCacheResult<Vec<String>>;

    /// 获取用户注册的节点类型集合
    async fn fetch_user_node_types(&self) -> RepoCacheResult<Vec<NodeTypeDefinition>>;

    /// 按名称获取节点类型，空列表表示获取全部
    async fn get_node_types(&self, names: &[String]) -> RepoCacheResult<Vec<NodeTypeDefinition>>;

    /// 获取已注册的命名空间映射（前缀到URI）
    async fn get_namespaces(&self) -> RepoCacheResult<HashMap<String, String>>;

    /// 执行查询
    async fn query(&self, query: &QueryDescriptor) -> RepoCacheResult<Vec<JsonValue>>;

    /// 创建工作区，可选择从已有工作区克隆
    async fn create_workspace(
        &self,
        name: &str,
        src_workspace: Option<&str>,
    ) -> RepoCacheResult<()>;

    /// 删除工作区
    async fn delete_workspace(&self, name: &str) -> RepoCacheResult<()>;

    /// 复制节点及其子树
    async fn copy_node(
        &self,
        src_path: &str,
        dest_path: &str,
        src_workspace: Option<&str>,
    ) -> RepoCacheResult<()>;

    /// 批量删除节点
    async fn delete_nodes(&self, operations: &[NodeDeleteOperation]) -> RepoCacheResult<()>;

    /// 立即删除单个节点
    async fn delete_node_immediately(&self, path: &str) -> RepoCacheResult<()>;

    /// 批量删除属性
    async fn delete_properties(
        &self,
        operations: &[PropertyDeleteOperation],
    ) -> RepoCacheResult<()>;

    /// 立即删除单个属性
    async fn delete_property_immediately(&self, path: &str) -> RepoCacheResult<()>;

    /// 批量移动节点
    async fn move_nodes(&self, operations: &[NodeMoveOperation]) -> RepoCacheResult<()>;

    /// 立即移动单个节点
    async fn move_node_immediately(
        &self,
        src_path: &str,
        dest_path: &str,
    ) -> RepoCacheResult<()>;

    /// 重排指定节点的子节点顺序
    async fn reorder_children(&self, node: &NodeData) -> RepoCacheResult<()>;

    /// 批量存储节点（创建或更新）
    async fn store_nodes(&self, operations: &[NodeStoreOperation]) -> RepoCacheResult<()>;

    /// 注册节点类型
    async fn register_node_types(
        &self,
        definitions: &[NodeTypeDefinition],
        allow_update: bool,
    ) -> RepoCacheResult<()>;

    /// 注册命名空间
    async fn register_namespace(&self, prefix: &str, uri: &str) -> RepoCacheResult<()>;

    /// 注销命名空间
    async fn unregister_namespace(&self, prefix: &str) -> RepoCacheResult<()>;

    /// 开启写事务
    async fn begin_transaction(&self) -> RepoCacheResult<()>;

    /// 提交写事务
    async fn commit_transaction(&self) -> RepoCacheResult<()>;

    /// 回滚写事务
    async fn rollback_transaction(&self) -> RepoCacheResult<()>;
}
