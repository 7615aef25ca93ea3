//! Runtime 层：Value 的行为实现
//!
//! 本模块为 core 层类型提供实现：
//! - 数值强制转换（toNumber / toInt32 等，全函数）
//! - GC 协作（托管引用包装、根扫描转发）

/// 数值强制转换
pub mod coerce;

/// GC 协作：收集器契约与类型化引用
pub mod gc;

pub use coerce::ToPrimitive;
pub use gc::{Collector, Ref};
