//! 缓存键净化器
//!
//! 将人类可读的缓存键转换为后端安全的键。默认实现先做URL编码，
//! 再把字面量`%`与`.`分别替换为`_`与`|`（默认后端禁止这两个字符出现在键中）。
//! 净化器可在构造后随时整体替换，以适配键约束不同的后端

use std::fmt;

/// 键净化函数类型
type SanitizeFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// 缓存键净化器
///
/// 对任意输入字符串必须确定性地返回结果，且不会失败
pub struct KeySanitizer {
    func: SanitizeFn,
}

impl KeySanitizer {
    /// 用自定义净化函数创建净化器
    pub fn new(func: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            func: Box::new(func),
        }
    }

    /// 净化一个原始缓存键
    pub fn sanitize(&self, raw_key: &str) -> String {
        (self.func)(raw_key)
    }
}

impl Default for KeySanitizer {
    /// 默认净化器：URL编码后替换保留字符
    fn default() -> Self {
        Self::new(|raw_key| {
            urlencoding::encode(raw_key)
                .replace('%', "_")
                .replace('.', "|")
        })
    }
}

impl fmt::Debug for KeySanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySanitizer").finish_non_exhaustive()
    }
}
