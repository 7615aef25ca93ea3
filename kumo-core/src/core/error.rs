//! 错误类型（Core 层）
//!
//! 数值强制转换是全函数，永不出错；这里只覆盖第一类错误：
//! 按错误的变体读取 Value。热路径在自行检查过变体后应使用
//! 无检查访问器（debug 断言保护）。

use thiserror::Error;

/// Value 访问错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// 按与当前变体不符的类型读取
    #[error("wrong variant: expected {expected}, found {found}")]
    WrongVariant {
        expected: &'static str,
        found: &'static str,
    },
}

impl ValueError {
    pub(crate) fn wrong_variant(expected: &'static str, found: &'static str) -> Self {
        ValueError::WrongVariant { expected, found }
    }
}
