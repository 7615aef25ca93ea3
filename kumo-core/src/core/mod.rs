//! Core 层：纯表示，无运行时行为
//!
//! 位布局策略与 Value 单元。所有行为（数值强制转换、GC 协作）
//! 在 runtime 层实现。

pub mod error;
pub mod layout;
pub mod value;

pub use error::ValueError;
pub use value::Value;
