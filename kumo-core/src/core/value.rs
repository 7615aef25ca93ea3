//! NaN-boxed Value 单元（8 字节）
//!
//! 单个 64 位存储格，可容纳 double、int32、boolean、null、
//! undefined、内部 empty 哨兵，或指向堆托管对象的非持有引用。
//! 位级方案见 [`crate::core::layout`]；本模块只关心变体语义。
//!
//! 所有分类判定都是对 64 位存储的 O(1) 位测试。构造 double 时
//! 将任意 NaN 归一为唯一的 quiet NaN 模式，保证 "这是 double NaN"
//! 有且只有一个位模式，不会与 tag 区间撞车。

use std::fmt;
use std::ptr::NonNull;

use crate::core::error::ValueError;
use crate::core::layout::active as enc;

/// 唯一代表 double NaN 的位模式
const QUIET_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// 不透明托管对象。具体布局与生命周期属于外部对象图，
/// 值层只保存指针，从不解引用。
#[repr(C)]
pub struct Managed {
    _opaque: [u8; 0],
}

/// NaN-boxed 值 (64-bit)
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Value(u64);

impl Value {
    // ==================== 规范常量 ====================

    pub const UNDEFINED: Value = Value(enc::immediate(enc::TAG_UNDEFINED, 0));
    pub const NULL: Value = Value(enc::immediate(enc::TAG_NULL, 0));
    pub const TRUE: Value = Value(enc::immediate(enc::TAG_BOOLEAN, 1));
    pub const FALSE: Value = Value(enc::immediate(enc::TAG_BOOLEAN, 0));

    /// 内部哨兵："属性槽尚未写入"。只在 crate 内部可构造，
    /// 永远不会作为脚本层的值流出。
    #[allow(dead_code)]
    pub(crate) const EMPTY: Value = Value(enc::immediate(enc::TAG_EMPTY, 0));

    // ==================== 构造方法 ====================

    /// 创建布尔值
    #[inline]
    pub fn boolean(b: bool) -> Self {
        if b { Self::TRUE } else { Self::FALSE }
    }

    /// 创建 int32
    #[inline]
    pub fn int(i: i32) -> Self {
        Value(enc::immediate(enc::TAG_INTEGER, i as u32))
    }

    /// 创建 double。NaN 输入归一为规范 quiet NaN。
    #[inline]
    pub fn double(d: f64) -> Self {
        let d = if d.is_nan() { f64::from_bits(QUIET_NAN_BITS) } else { d };
        let v = Value(enc::encode_double(d));
        debug_assert!(v.is_double());
        v
    }

    /// 创建 uint32：超出 int32 范围的值加宽为 double，不截断
    #[inline]
    pub fn from_u32(u: u32) -> Self {
        if u <= i32::MAX as u32 {
            Self::int(u as i32)
        } else {
            Self::double(u as f64)
        }
    }

    /// 包装托管对象指针。空指针归一为 undefined（文档化的强制转换）。
    #[inline]
    pub fn from_managed(ptr: *mut Managed) -> Self {
        if ptr.is_null() {
            return Self::UNDEFINED;
        }
        Value(enc::encode_ptr(ptr as usize))
    }

    /// 解释器边界：原始 64 位存取
    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Value(raw)
    }

    // ==================== 类型判定 ====================

    #[inline]
    pub fn is_undefined(&self) -> bool {
        enc::tag(self.0) == enc::TAG_UNDEFINED
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        enc::tag(self.0) == enc::TAG_NULL
    }

    #[inline]
    pub fn is_boolean(&self) -> bool {
        enc::tag(self.0) == enc::TAG_BOOLEAN
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        enc::is_integer(self.0)
    }

    #[inline]
    pub fn is_double(&self) -> bool {
        enc::is_double(self.0)
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        enc::is_number(self.0)
    }

    #[inline]
    pub fn is_managed(&self) -> bool {
        enc::is_managed(self.0)
    }

    #[inline]
    pub fn is_null_or_undefined(&self) -> bool {
        enc::is_null_or_undefined(self.0)
    }

    /// 是否为内部哨兵（槽代码在 nullish 判定前先测这个）
    #[inline]
    pub fn is_empty(&self) -> bool {
        enc::tag(self.0) == enc::TAG_EMPTY
    }

    /// 仅规范 double NaN 模式返回 true
    #[inline]
    pub fn is_nan(&self) -> bool {
        enc::is_nan(self.0)
    }

    /// null / boolean / integer：payload 可直接当作 int32 使用
    #[inline]
    pub fn integer_compatible(&self) -> bool {
        enc::integer_compatible(self.0)
    }

    /// 解释器快路径：两值均为 double
    #[inline]
    pub fn both_double(a: Value, b: Value) -> bool {
        a.is_double() && b.is_double()
    }

    /// 解释器快路径：两值均可按 int32 运算
    #[inline]
    pub fn integer_compatible_pair(a: Value, b: Value) -> bool {
        a.integer_compatible() && b.integer_compatible()
    }

    // ==================== 无检查访问器（调用方保证变体）====================

    /// 前置条件：`is_double()`
    #[inline]
    pub fn double_value(&self) -> f64 {
        debug_assert!(self.is_double());
        enc::decode_double(self.0)
    }

    /// 前置条件：`is_integer()`
    #[inline]
    pub fn integer_value(&self) -> i32 {
        debug_assert!(self.is_integer());
        enc::payload(self.0) as i32
    }

    /// 前置条件：`is_boolean()`
    #[inline]
    pub fn boolean_value(&self) -> bool {
        debug_assert!(self.is_boolean());
        enc::payload(self.0) != 0
    }

    /// 前置条件：`is_managed()`
    #[inline]
    pub fn managed(&self) -> *mut Managed {
        debug_assert!(self.is_managed());
        enc::decode_ptr(self.0) as *mut Managed
    }

    /// 数值读取：integer 或 double（前置条件：`is_number()`）
    #[inline]
    pub fn as_double(&self) -> f64 {
        if self.is_integer() {
            self.integer_value() as f64
        } else {
            self.double_value()
        }
    }

    // ==================== 带检查访问器 ====================

    pub fn try_double(&self) -> Result<f64, ValueError> {
        if self.is_double() {
            Ok(self.double_value())
        } else {
            Err(ValueError::wrong_variant("double", self.type_name()))
        }
    }

    pub fn try_integer(&self) -> Result<i32, ValueError> {
        if self.is_integer() {
            Ok(self.integer_value())
        } else {
            Err(ValueError::wrong_variant("integer", self.type_name()))
        }
    }

    pub fn try_boolean(&self) -> Result<bool, ValueError> {
        if self.is_boolean() {
            Ok(self.boolean_value())
        } else {
            Err(ValueError::wrong_variant("boolean", self.type_name()))
        }
    }

    /// 托管引用；非托管变体返回 None
    #[inline]
    pub fn as_managed(&self) -> Option<NonNull<Managed>> {
        if self.is_managed() {
            NonNull::new(enc::decode_ptr(self.0) as *mut Managed)
        } else {
            None
        }
    }

    pub fn try_managed(&self) -> Result<NonNull<Managed>, ValueError> {
        self.as_managed()
            .ok_or_else(|| ValueError::wrong_variant("object", self.type_name()))
    }

    /// 变体名（诊断用）
    pub fn type_name(&self) -> &'static str {
        if self.is_double() {
            "double"
        } else if self.is_integer() {
            "integer"
        } else if self.is_boolean() {
            "boolean"
        } else if self.is_null() {
            "null"
        } else if self.is_undefined() {
            "undefined"
        } else if self.is_managed() {
            "object"
        } else {
            "empty"
        }
    }

    // ==================== 数值窄化 ====================

    /// 不改写存储地报告 "能否按原生 int32 使用"：
    /// integer 变体，或恰好落在 int32 范围内的整值 double。
    /// -0.0 不算（窄化会丢符号）。
    #[inline]
    pub fn is_int32(&self) -> bool {
        if self.is_integer() {
            return true;
        }
        if self.is_double() {
            let d = self.double_value();
            let i = d as i32;
            return (i as f64).to_bits() == d.to_bits();
        }
        false
    }

    /// 就地窄化为 integer 变体。null/boolean 重打标签即可；
    /// 整值 double 改存 int32。语义不可见：转换前后一切比较结果一致，
    /// 因此 -0.0 拒绝窄化。返回是否成功。
    #[inline]
    pub fn try_integer_conversion(&mut self) -> bool {
        if self.integer_compatible() {
            self.0 = enc::immediate(enc::TAG_INTEGER, enc::payload(self.0));
            return true;
        }
        if self.is_double() {
            let d = self.double_value();
            let i = d as i32;
            if (i as f64).to_bits() == d.to_bits() {
                self.0 = enc::immediate(enc::TAG_INTEGER, i as u32);
                return true;
            }
        }
        false
    }

    // ==================== SameValue (ES5 9.12) ====================

    /// 严格同值：NaN 等于自身，+0 与 -0 不同，
    /// integer 与 double 编码下的同一数学值相等。
    pub fn same_value(&self, other: Value) -> bool {
        if self.0 == other.0 {
            return true;
        }
        if self.is_number() && other.is_number() {
            let a = self.as_double();
            let b = other.as_double();
            if a.is_nan() && b.is_nan() {
                return true;
            }
            return a == b && a.is_sign_negative() == b.is_sign_negative();
        }
        false
    }
}

impl Default for Value {
    /// 逻辑默认值是 undefined，而不是全零位模式
    fn default() -> Self {
        Self::UNDEFINED
    }
}

// ==================== Debug / Display 输出 ====================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_double() {
            write!(f, "Double({})", self.double_value())
        } else if self.is_integer() {
            write!(f, "Integer({})", self.integer_value())
        } else if self.is_boolean() {
            write!(f, "Boolean({})", self.boolean_value())
        } else if self.is_null() {
            write!(f, "Null")
        } else if self.is_undefined() {
            write!(f, "Undefined")
        } else if self.is_empty() {
            write!(f, "Empty")
        } else if self.is_managed() {
            write!(f, "Managed({:p})", self.managed())
        } else {
            write!(f, "Value({:016x})", self.0)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_double() {
            write!(f, "{}", self.double_value())
        } else if self.is_integer() {
            write!(f, "{}", self.integer_value())
        } else if self.is_boolean() {
            write!(f, "{}", self.boolean_value())
        } else if self.is_null() {
            write!(f, "null")
        } else if self.is_undefined() {
            write!(f, "undefined")
        } else if self.is_managed() {
            write!(f, "<object>")
        } else {
            write!(f, "<empty>")
        }
    }
}

// ==================== 测试 ====================
