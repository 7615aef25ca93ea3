//! 位布局策略（宽 / 窄两套编码）
//!
//! Value 始终占 8 字节。双精度浮点以外的变体全部藏进 IEEE 754
//! quiet NaN 的空闲位模式中，两种目标指针宽度各用一套方案：
//!
//! - 宽编码（64 位指针）：double 与 `NAN_ENCODE_MASK` 异或存储，
//!   使得任何真实 double 的最高 13 位不可能全 0。托管指针占用
//!   高 17 位全 0 的区间（用户态地址不超过 2^47），其余立即数
//!   由高位 tag 区分。"是否数值" 为一次右移加比较。
//! - 窄编码（32 位指针）：高 32 位为 tag 字，低 32 位为 payload。
//!   double 按原始位模式存储，所有非 double tag 落在 NaN 尾数
//!   空间的保留片段里。平台产生的规范 quiet NaN 必须落在保留
//!   区间之外 —— 该前提由测试验证，而非假设。
//!
//! 两套编码对每个可表示的原始值必须产生完全一致的可观察行为；
//! 编译期按 `target_pointer_width` 选定其一，单个二进制内不混用。

/// 宽编码（64 位指针目标）
pub mod wide {
    /// double 编码掩码：存储时异或，解码时再异或还原
    pub const NAN_ENCODE_MASK: u64 = 0xffff_8000_0000_0000;

    /// Tag 字所在的位移（高 32 位）
    pub const TAG_SHIFT: u32 = 32;

    // ==================== Tag 字取值 ====================

    pub const TAG_MANAGED: u32 = 0x0000_0000;
    pub const TAG_UNDEFINED: u32 = 0x0000_8000;
    pub const TAG_NULL: u32 = 0x0001_8000;
    pub const TAG_BOOLEAN: u32 = 0x0001_0000;
    pub const TAG_INTEGER: u32 = 0x0003_0000;
    /// 内部哨兵。落在 undefined 的高位区间内（bit 46），
    /// 因此 is_null_or_undefined 对它也为真；槽代码须先测 is_empty。
    pub const TAG_EMPTY: u32 = 0x0000_C000;

    // ==================== 分类位移 ====================
    // 高 14 位非 0 ⇔ double；高 15 位 == 1 ⇔ integer；
    // 高 17 位全 0 ⇔ 托管指针。

    const IS_DOUBLE_SHIFT: u32 = 64 - 14;
    const IS_NUMBER_SHIFT: u32 = 64 - 15;
    const IS_CONVERTIBLE_SHIFT: u32 = 64 - 16;
    const IS_MANAGED_SHIFT: u32 = 64 - 17;

    // ==================== 编解码 ====================

    #[inline]
    pub const fn tag(val: u64) -> u32 {
        (val >> TAG_SHIFT) as u32
    }

    #[inline]
    pub const fn payload(val: u64) -> u32 {
        val as u32
    }

    #[inline]
    pub const fn immediate(tag: u32, payload: u32) -> u64 {
        ((tag as u64) << TAG_SHIFT) | payload as u64
    }

    #[inline]
    pub fn encode_double(d: f64) -> u64 {
        d.to_bits() ^ NAN_ENCODE_MASK
    }

    #[inline]
    pub fn decode_double(val: u64) -> f64 {
        f64::from_bits(val ^ NAN_ENCODE_MASK)
    }

    #[inline]
    pub fn encode_ptr(addr: usize) -> u64 {
        debug_assert!(addr >> 47 == 0, "pointer exceeds 47-bit address space");
        addr as u64
    }

    #[inline]
    pub fn decode_ptr(val: u64) -> usize {
        val as usize
    }

    // ==================== 分类判定 ====================

    #[inline]
    pub fn is_double(val: u64) -> bool {
        (val >> IS_DOUBLE_SHIFT) != 0
    }

    #[inline]
    pub fn is_number(val: u64) -> bool {
        (val >> IS_NUMBER_SHIFT) != 0
    }

    #[inline]
    pub fn is_integer(val: u64) -> bool {
        (val >> IS_NUMBER_SHIFT) == 1
    }

    #[inline]
    pub fn is_managed(val: u64) -> bool {
        (val >> IS_MANAGED_SHIFT) == 0
    }

    #[inline]
    pub fn is_null_or_undefined(val: u64) -> bool {
        ((val >> IS_MANAGED_SHIFT) & !2) == 1
    }

    /// null / boolean / integer：payload 可直接当作 int32 使用
    #[inline]
    pub fn integer_compatible(val: u64) -> bool {
        ((val >> IS_CONVERTIBLE_SHIFT) & !2) == 1
    }

    #[inline]
    pub fn is_nan(val: u64) -> bool {
        (tag(val) & 0x7fff_8000) == 0x0007_8000
    }
}

/// 窄编码（32 位指针目标）
pub mod narrow {
    /// quiet NaN 的 tag 前缀（含符号位掩掉后的形式）
    pub const NAN_MASK: u32 = 0x7ff8_0000;

    /// 非 double 的保留 tag 片段
    pub const NOT_DOUBLE_MASK: u32 = 0x7ffc_0000;

    const IMMEDIATE_MASK: u32 = NOT_DOUBLE_MASK | 0x0000_8000;

    /// null / boolean / integer 共有的 "可当 int32 用" 标志位
    const CONVERTIBLE_TO_INT: u32 = IMMEDIATE_MASK | 0x1;

    const IS_NULL_OR_UNDEFINED_MASK: u32 = IMMEDIATE_MASK | 0x0002_0000;

    pub const TAG_SHIFT: u32 = 32;

    // ==================== Tag 字取值（存储形式）====================

    pub const TAG_MANAGED: u32 = NOT_DOUBLE_MASK;
    pub const TAG_UNDEFINED: u32 = IMMEDIATE_MASK;
    pub const TAG_NULL: u32 = IMMEDIATE_MASK | 0x0001_0000 | 0x1;
    pub const TAG_BOOLEAN: u32 = IMMEDIATE_MASK | 0x0002_0000 | 0x1;
    pub const TAG_INTEGER: u32 = IMMEDIATE_MASK | 0x0003_0000 | 0x1;
    /// 内部哨兵
    pub const TAG_EMPTY: u32 = NOT_DOUBLE_MASK | 0x0003_0000;

    // ==================== 编解码 ====================

    #[inline]
    pub const fn tag(val: u64) -> u32 {
        (val >> TAG_SHIFT) as u32
    }

    #[inline]
    pub const fn payload(val: u64) -> u32 {
        val as u32
    }

    #[inline]
    pub const fn immediate(tag: u32, payload: u32) -> u64 {
        ((tag as u64) << TAG_SHIFT) | payload as u64
    }

    #[inline]
    pub fn encode_double(d: f64) -> u64 {
        d.to_bits()
    }

    #[inline]
    pub fn decode_double(val: u64) -> f64 {
        f64::from_bits(val)
    }

    #[inline]
    pub fn encode_ptr(addr: usize) -> u64 {
        immediate(TAG_MANAGED, addr as u32)
    }

    #[inline]
    pub fn decode_ptr(val: u64) -> usize {
        payload(val) as usize
    }

    // ==================== 分类判定 ====================

    #[inline]
    pub fn is_double(val: u64) -> bool {
        (tag(val) & NOT_DOUBLE_MASK) != NOT_DOUBLE_MASK
    }

    #[inline]
    pub fn is_number(val: u64) -> bool {
        is_integer(val) || is_double(val)
    }

    #[inline]
    pub fn is_integer(val: u64) -> bool {
        tag(val) == TAG_INTEGER
    }

    #[inline]
    pub fn is_managed(val: u64) -> bool {
        tag(val) == TAG_MANAGED
    }

    #[inline]
    pub fn is_null_or_undefined(val: u64) -> bool {
        (tag(val) & IS_NULL_OR_UNDEFINED_MASK) == TAG_UNDEFINED
    }

    /// null / boolean / integer：payload 可直接当作 int32 使用
    #[inline]
    pub fn integer_compatible(val: u64) -> bool {
        (tag(val) & CONVERTIBLE_TO_INT) == CONVERTIBLE_TO_INT
    }

    #[inline]
    pub fn is_nan(val: u64) -> bool {
        (tag(val) & NOT_DOUBLE_MASK) == NAN_MASK
    }
}

// 编译期选定当前编码；两套都参与编译以保持类型检查。
#[cfg(target_pointer_width = "64")]
pub use wide as active;
#[cfg(target_pointer_width = "32")]
pub use narrow as active;
