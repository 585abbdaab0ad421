//! 内容仓库数据类型定义
//!
//! 定义节点载荷、查询描述符、节点类型与批量写操作等通用数据类型，
//! 这些类型同时作为缓存载荷使用，因此全部实现 serde 序列化

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// 节点数据载荷
///
/// 装饰层只关心路径、标识符与可引用标记，属性内容作为不透明JSON保存
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeData {
    /// 节点绝对路径
    pub path: String,
    /// 节点标识符（可引用节点必有标识符）
    pub identifier: Option<Uuid>,
    /// 是否为可引用节点（mix:referenceable语义）
    pub referenceable: bool,
    /// 节点属性集合，内容对装饰层不透明
    pub properties: JsonValue,
}

impl NodeData {
    /// 创建节点数据
    pub fn new(path: impl Into<String>, properties: JsonValue) -> Self {
        Self {
            path: path.into(),
            identifier: None,
            referenceable: false,
            properties,
        }
    }

    /// 附加标识符并标记为可引用节点
    pub fn with_identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = Some(identifier);
        self.referenceable = true;
        self
    }
}

/// 查询语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryLanguage {
    /// JCR-SQL
    Sql,
    /// JCR-SQL2
    JcrSql2,
    /// XPath
    Xpath,
}

impl QueryLanguage {
    /// 缓存键中使用的语言标识
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryLanguage::Sql => "sql",
            QueryLanguage::JcrSql2 => "jcr-sql2",
            QueryLanguage::Xpath => "xpath",
        }
    }
}

/// 查询描述符
///
/// 语句文本、分页参数与查询语言共同构成查询缓存键
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryDescriptor {
    /// 查询语句文本
    pub statement: String,
    /// 查询语言
    pub language: QueryLanguage,
    /// 结果上限
    pub limit: Option<u64>,
    /// 结果偏移
    pub offset: Option<u64>,
}

impl QueryDescriptor {
    /// 创建查询描述符
    pub fn new(statement: impl Into<String>, language: QueryLanguage) -> Self {
        Self {
            statement: statement.into(),
            language,
            limit: None,
            offset: None,
        }
    }

    /// 设置结果上限
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// 设置结果偏移
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// 节点类型定义
///
/// 类型定义内容对装饰层不透明，按名称索引
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeTypeDefinition {
    /// 类型名称
    pub name: String,
    /// 类型定义内容
    pub definition: JsonValue,
}

impl NodeTypeDefinition {
    /// 创建节点类型定义
    pub fn new(name: impl Into<String>, definition: JsonValue) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }
}

/// 节点删除操作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDeleteOperation {
    /// 待删除节点路径
    pub path: String,
}

/// 属性删除操作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDeleteOperation {
    /// 待删除属性路径
    pub path: String,
}

/// 节点移动操作
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeMoveOperation {
    /// 源路径
    pub src_path: String,
    /// 目标路径
    pub dest_path: String,
}

/// 节点存储操作（创建或更新）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStoreOperation {
    /// 目标路径
    pub path: String,
    /// 节点数据
    pub node: NodeData,
}
