//! Kumo Math - 数值内建函数库
//!
//! 每个操作消费零至多个 Value（按 toNumber 契约取数），
//! 产出恰好一个新 Value，从不改写输入、从不失败。
//! 边界情形（带符号零、无穷、NaN 传染）按脚本语言数值
//! 规范逐位实现，与宿主 libm 行为不同处显式分支覆盖。
//!
//! 函数通过扁平的名字表暴露给引擎注册，表在首次访问时惰性构建。

use std::collections::HashMap;

use once_cell::sync::Lazy;

use kumo_core::Value;

/// 数学函数指针类型
pub type MathFn = fn(&[Value]) -> Value;

/// 名字表条目
pub enum MathEntry {
    /// 原生函数及其声明参数个数
    Func(MathFn, u8),
    /// 只读常量
    Constant(Value),
}

/// 缺参按 NaN 取数（规范行为）
#[inline]
fn number_arg(args: &[Value], idx: usize) -> f64 {
    args.get(idx)
        .map(|v| v.to_number_primitive())
        .unwrap_or(f64::NAN)
}

// ==================== 操作实现 ====================

/// abs：integer 入 integer 出（i32::MIN 加宽为 double）；±0 → +0
pub fn abs(args: &[Value]) -> Value {
    let Some(first) = args.first() else {
        return Value::double(f64::NAN);
    };
    if first.is_integer() {
        let i = first.integer_value();
        return match i.checked_abs() {
            Some(a) => Value::int(a),
            None => Value::double(-(i as f64)),
        };
    }
    let v = first.to_number_primitive();
    if v == 0.0 {
        // +0 | -0
        return Value::double(0.0);
    }
    Value::double(v.abs())
}

/// acos：定义域 [-1, 1]，域外 NaN
pub fn acos(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v > 1.0 {
        return Value::double(f64::NAN);
    }
    Value::double(v.acos())
}

/// asin：定义域 [-1, 1]，域外 NaN
pub fn asin(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v > 1.0 {
        return Value::double(f64::NAN);
    }
    Value::double(v.asin())
}

/// atan：±0 原样返回（保符号）
pub fn atan(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v == 0.0 {
        return Value::double(v);
    }
    Value::double(v.atan())
}

/// atan2(y, x)：有限负 y 配 +∞ 的 x 给 -0；(±0, -0x) 给 ±π
pub fn atan2(args: &[Value]) -> Value {
    let y = number_arg(args, 0);
    let x = number_arg(args, 1);

    if y < 0.0 && y.is_finite() && x == f64::INFINITY {
        return Value::double(-0.0);
    }
    if y == 0.0 && x == 0.0 {
        if y.is_sign_positive() && x.is_sign_negative() {
            return Value::double(std::f64::consts::PI);
        }
        if y.is_sign_negative() && x.is_sign_negative() {
            return Value::double(-std::f64::consts::PI);
        }
    }
    Value::double(y.atan2(x))
}

/// ceil：(-1, 0) 区间给 -0（边界保符号）
pub fn ceil(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v < 0.0 && v > -1.0 {
        return Value::double(-0.0);
    }
    Value::double(v.ceil())
}

pub fn cos(args: &[Value]) -> Value {
    Value::double(number_arg(args, 0).cos())
}

/// exp：exp(-∞) = 0，exp(+∞) = +∞
pub fn exp(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v.is_infinite() {
        return if v < 0.0 {
            Value::double(0.0)
        } else {
            Value::double(f64::INFINITY)
        };
    }
    Value::double(v.exp())
}

pub fn floor(args: &[Value]) -> Value {
    Value::double(number_arg(args, 0).floor())
}

/// log：负输入 NaN，不抛错
pub fn log(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v < 0.0 {
        return Value::double(f64::NAN);
    }
    Value::double(v.ln())
}

/// max：变参；任一 NaN 传染结果
pub fn max(args: &[Value]) -> Value {
    let mut mx = f64::NEG_INFINITY;
    for arg in args {
        let x = arg.to_number_primitive();
        if x > mx || x.is_nan() {
            mx = x;
        }
    }
    Value::double(mx)
}

/// min：变参；任一 NaN 传染结果；-0 < +0
pub fn min(args: &[Value]) -> Value {
    let mut mx = f64::INFINITY;
    for arg in args {
        let x = arg.to_number_primitive();
        if (x == 0.0 && mx == x && x.is_sign_negative()) || x < mx || x.is_nan() {
            mx = x;
        }
    }
    Value::double(mx)
}

/// pow(x, y)：NaN 指数给 NaN；y=0 给 1（即使底是 NaN）；
/// (±1)^±∞ 给 NaN；带符号零底按 fmod(y,2) 奇偶表；
/// 其余统一走 IEEE-754 libm，所有平台一致。
pub fn pow(args: &[Value]) -> Value {
    let x = number_arg(args, 0);
    let y = number_arg(args, 1);

    if y.is_nan() {
        return Value::double(f64::NAN);
    }
    if y == 0.0 {
        return Value::double(1.0);
    }
    if (x == 1.0 || x == -1.0) && y.is_infinite() {
        return Value::double(f64::NAN);
    }
    if x == 0.0 && x.is_sign_positive() && y < 0.0 {
        return Value::double(f64::INFINITY);
    }
    if x == 0.0 && x.is_sign_negative() {
        if y < 0.0 {
            return if (-y) % 2.0 == 1.0 {
                Value::double(f64::NEG_INFINITY)
            } else {
                Value::double(f64::INFINITY)
            };
        }
        // y > 0（y==0 与 NaN 已在上面处理）
        return if y % 2.0 == 1.0 {
            Value::double(-0.0)
        } else {
            Value::double(0.0)
        };
    }
    Value::double(x.powf(y))
}

/// random：进程全局随机源，均匀分布于 [0, 1)，不保证可复现
pub fn random(_args: &[Value]) -> Value {
    Value::double(rand::random::<f64>())
}

/// round：幅值上半数进位，符号从输入拷贝
/// （round(-0.4) = -0，round(-0.5) = -0）
pub fn round(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    Value::double((v + 0.5).floor().copysign(v))
}

pub fn sin(args: &[Value]) -> Value {
    Value::double(number_arg(args, 0).sin())
}

pub fn sqrt(args: &[Value]) -> Value {
    Value::double(number_arg(args, 0).sqrt())
}

/// tan：±0 原样返回（保符号）
pub fn tan(args: &[Value]) -> Value {
    let v = number_arg(args, 0);
    if v == 0.0 {
        return Value::double(v);
    }
    Value::double(v.tan())
}

// ==================== 名字表 ====================

static ENTRIES: Lazy<HashMap<&'static str, MathEntry>> = Lazy::new(|| {
    use std::f64::consts;

    let mut table: HashMap<&'static str, MathEntry> = HashMap::new();

    // ===== 常量 =====
    table.insert("E", MathEntry::Constant(Value::double(consts::E)));
    table.insert("LN2", MathEntry::Constant(Value::double(consts::LN_2)));
    table.insert("LN10", MathEntry::Constant(Value::double(consts::LN_10)));
    table.insert("LOG2E", MathEntry::Constant(Value::double(consts::LOG2_E)));
    table.insert("LOG10E", MathEntry::Constant(Value::double(consts::LOG10_E)));
    table.insert("PI", MathEntry::Constant(Value::double(consts::PI)));
    table.insert("SQRT1_2", MathEntry::Constant(Value::double(consts::FRAC_1_SQRT_2)));
    table.insert("SQRT2", MathEntry::Constant(Value::double(consts::SQRT_2)));

    // ===== 函数 =====
    table.insert("abs", MathEntry::Func(abs, 1));
    table.insert("acos", MathEntry::Func(acos, 1));
    table.insert("asin", MathEntry::Func(asin, 1));
    table.insert("atan", MathEntry::Func(atan, 1));
    table.insert("atan2", MathEntry::Func(atan2, 2));
    table.insert("ceil", MathEntry::Func(ceil, 1));
    table.insert("cos", MathEntry::Func(cos, 1));
    table.insert("exp", MathEntry::Func(exp, 1));
    table.insert("floor", MathEntry::Func(floor, 1));
    table.insert("log", MathEntry::Func(log, 1));
    table.insert("max", MathEntry::Func(max, 2));
    table.insert("min", MathEntry::Func(min, 2));
    table.insert("pow", MathEntry::Func(pow, 2));
    table.insert("random", MathEntry::Func(random, 0));
    table.insert("round", MathEntry::Func(round, 1));
    table.insert("sin", MathEntry::Func(sin, 1));
    table.insert("sqrt", MathEntry::Func(sqrt, 1));
    table.insert("tan", MathEntry::Func(tan, 1));

    table
});

/// 按名字查条目
pub fn lookup(name: &str) -> Option<&'static MathEntry> {
    ENTRIES.get(name)
}

/// 全部条目（引擎启动时注册用）
pub fn entries() -> impl Iterator<Item = (&'static str, &'static MathEntry)> {
    ENTRIES.iter().map(|(k, v)| (*k, v))
}

// ==================== 测试 ====================
