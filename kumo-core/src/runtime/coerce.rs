//! 数值强制转换（ECMA-262 5.1 §9）
//!
//! 为 Value 类型提供转换扩展方法。所有转换都是全函数：
//! 域外输入（NaN 转整数等）产生规范结果（0、false……），
//! 永不失败、永不抛错。
//!
//! 托管对象的 ToNumber 经由可注入的 [`ToPrimitive`] 委托走
//! 外部对象层；快路径 `to_number_primitive` 只覆盖非托管变体。

use std::ptr::NonNull;

use crate::core::value::{Managed, Value};

/// 托管对象的原始值转换委托（hint Number）。
/// 由外部运行时实现；返回值必须是非托管的原始值，只递归一步。
pub trait ToPrimitive {
    fn to_primitive_number(&self, obj: NonNull<Managed>) -> Value;
}

// ==================== double 级转换 ====================

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_31: f64 = 2_147_483_648.0;
const TWO_POW_16: f64 = 65_536.0;

/// ToInt32：模 2^32 后折到有符号区间；NaN/±Inf → 0
pub fn double_to_int32(d: f64) -> i32 {
    if !d.is_finite() || d == 0.0 {
        return 0;
    }
    let m = d.trunc().rem_euclid(TWO_POW_32);
    if m >= TWO_POW_31 {
        (m - TWO_POW_32) as i32
    } else {
        m as i32
    }
}

/// ToUint32：模 2^32；NaN/±Inf → 0
pub fn double_to_uint32(d: f64) -> u32 {
    if !d.is_finite() || d == 0.0 {
        return 0;
    }
    d.trunc().rem_euclid(TWO_POW_32) as u32
}

/// ToUint16：模 2^16；NaN/±Inf → 0
pub fn double_to_uint16(d: f64) -> u16 {
    if !d.is_finite() || d == 0.0 {
        return 0;
    }
    d.trunc().rem_euclid(TWO_POW_16) as u16
}

/// ToInteger：NaN → +0，无穷保留，其余向零取整
pub fn double_to_integer(d: f64) -> f64 {
    if d.is_nan() {
        0.0
    } else {
        d.trunc()
    }
}

// ==================== Value 扩展方法 ====================

impl Value {
    /// ToBoolean。全函数：托管对象恒为 true，NaN 与 ±0 为 false。
    pub fn to_boolean(&self) -> bool {
        if self.is_boolean() {
            return self.boolean_value();
        }
        if self.is_integer() {
            return self.integer_value() != 0;
        }
        if self.is_double() {
            let d = self.double_value();
            return d != 0.0 && !d.is_nan();
        }
        self.is_managed()
    }

    /// ToNumber 快路径：仅非托管变体。undefined/empty → NaN，
    /// null → 0，boolean → 0/1。托管变体产出 NaN（调用方应当
    /// 已通过 [`Value::to_number`] 委托转换）。
    pub fn to_number_primitive(&self) -> f64 {
        if self.is_integer() {
            return self.integer_value() as f64;
        }
        if self.is_double() {
            return self.double_value();
        }
        if self.is_boolean() {
            return if self.boolean_value() { 1.0 } else { 0.0 };
        }
        if self.is_null() {
            return 0.0;
        }
        f64::NAN
    }

    /// 完整 ToNumber：托管变体经由注入的委托取原始值后再转换
    pub fn to_number(&self, hooks: &dyn ToPrimitive) -> f64 {
        match self.as_managed() {
            Some(obj) => {
                let prim = hooks.to_primitive_number(obj);
                debug_assert!(!prim.is_managed(), "ToPrimitive must return a primitive");
                prim.to_number_primitive()
            }
            None => self.to_number_primitive(),
        }
    }

    /// ToInteger
    pub fn to_integer(&self, hooks: &dyn ToPrimitive) -> f64 {
        if self.is_integer() {
            return self.integer_value() as f64;
        }
        double_to_integer(self.to_number(hooks))
    }

    /// ToInt32
    pub fn to_int32(&self, hooks: &dyn ToPrimitive) -> i32 {
        if self.is_integer() {
            return self.integer_value();
        }
        double_to_int32(self.to_number(hooks))
    }

    /// ToUint32
    pub fn to_uint32(&self, hooks: &dyn ToPrimitive) -> u32 {
        if self.is_integer() {
            return self.integer_value() as u32;
        }
        double_to_uint32(self.to_number(hooks))
    }

    /// ToUint16
    pub fn to_uint16(&self, hooks: &dyn ToPrimitive) -> u16 {
        if self.is_integer() {
            return self.integer_value() as u16;
        }
        double_to_uint16(self.to_number(hooks))
    }
}

/// 不含托管对象的场景用的空委托（托管输入视为 undefined）
pub struct PrimitiveOnly;

impl ToPrimitive for PrimitiveOnly {
    fn to_primitive_number(&self, _obj: NonNull<Managed>) -> Value {
        Value::UNDEFINED
    }
}

// ==================== 测试 ====================
