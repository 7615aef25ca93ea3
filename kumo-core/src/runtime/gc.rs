//! GC 协作：收集器契约、类型化托管引用、根扫描
//!
//! 值层不拥有任何堆对象，也不假定具体的收集策略；它只承诺
//! 在收集器的根扫描阶段把自己持有的托管引用转发出去。
//! 对非托管变体调用 mark 保证是 no-op，绝不出错 —— 收集器
//! 可以无差别地扫过整片槽数组。

use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::trace;

use crate::core::value::Value;

pub use crate::core::value::Managed;

/// 收集器契约。`mark_object` 必须幂等：同一对象在一次收集中
/// 被标记多次不改变结果。
pub trait Collector {
    fn mark_object(&mut self, obj: NonNull<Managed>);
}

impl Value {
    /// 收集参与：托管变体转发给收集器，其余变体为 no-op。
    /// 收集扫描期间对任意变体调用都安全。
    #[inline]
    pub fn mark(&self, collector: &mut dyn Collector) {
        if let Some(obj) = self.as_managed() {
            collector.mark_object(obj);
        }
    }
}

/// 类型化托管引用：对静态已知对象种类的 Value 的薄视图。
/// 不拥有对象；referent 的生命周期完全由外部收集器管理，
/// 只在 referent 存活期间有效。
///
/// 调用方保证种类正确 —— 包装器不做运行时种类检查。
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Ref<T> {
    value: Value,
    _kind: PhantomData<*mut T>,
}

impl<T> Ref<T> {
    /// 从裸指针包装；空指针归一为 undefined
    #[inline]
    pub fn new(ptr: *mut T) -> Self {
        Ref {
            value: Value::from_managed(ptr as *mut Managed),
            _kind: PhantomData,
        }
    }

    /// 未设置的引用（undefined）
    #[inline]
    pub fn unset() -> Self {
        Ref {
            value: Value::UNDEFINED,
            _kind: PhantomData,
        }
    }

    /// 重新指向裸指针（自动打 tag）
    #[inline]
    pub fn set(&mut self, ptr: *mut T) {
        self.value = Value::from_managed(ptr as *mut Managed);
    }

    /// 从另一个 Value 赋值：逐位复制 64 位存储
    #[inline]
    pub fn set_value(&mut self, v: Value) {
        self.value = v;
    }

    /// 置空（回到 undefined）
    #[inline]
    pub fn clear(&mut self) {
        self.value = Value::UNDEFINED;
    }

    /// 底层 Value
    #[inline]
    pub fn value(&self) -> Value {
        self.value
    }

    /// 空测试
    #[inline]
    pub fn is_unset(&self) -> bool {
        !self.value.is_managed()
    }

    /// referent 指针；未设置时返回 None
    #[inline]
    pub fn get(&self) -> Option<NonNull<T>> {
        self.value.as_managed().map(NonNull::cast)
    }

    /// referent 裸指针；未设置时为空指针
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        match self.value.as_managed() {
            Some(p) => p.as_ptr() as *mut T,
            None => std::ptr::null_mut(),
        }
    }

    /// 收集参与：转发持有的引用
    #[inline]
    pub fn mark(&self, collector: &mut dyn Collector) {
        self.value.mark(collector);
    }
}

impl<T> From<*mut T> for Ref<T> {
    fn from(ptr: *mut T) -> Self {
        Ref::new(ptr)
    }
}

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Ref::unset()
    }
}

// ==================== 根扫描辅助 ====================

/// 扫描一片根槽（栈帧、全局表），把每个托管引用转发给收集器
pub fn mark_slice(roots: &[Value], collector: &mut dyn Collector) {
    trace!(target: "kumo::gc", roots = roots.len(), "marking root slice");
    for v in roots {
        v.mark(collector);
    }
}

/// 同上，接受任意根迭代器（非连续根集：寄存器映像、句柄表）
pub fn mark_iter<'a, I>(roots: I, collector: &mut dyn Collector)
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut count = 0usize;
    for v in roots {
        v.mark(collector);
        count += 1;
    }
    trace!(target: "kumo::gc", roots = count, "marked root iterator");
}

// ==================== 测试 ====================

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording {
        seen: Vec<*mut Managed>,
    }

    impl Collector for Recording {
        fn mark_object(&mut self, obj: NonNull<Managed>) {
            self.seen.push(obj.as_ptr());
        }
    }

    #[test]
    fn test_mark_on_primitives_is_noop() {
        let mut c = Recording { seen: Vec::new() };
        for v in [
            Value::UNDEFINED,
            Value::NULL,
            Value::TRUE,
            Value::int(5),
            Value::double(1.5),
            Value::EMPTY,
        ] {
            v.mark(&mut c);
        }
        assert!(c.seen.is_empty());
    }

    #[test]
    fn test_mark_forwards_managed() {
        let mut obj = 0u64;
        let ptr = &mut obj as *mut u64 as *mut Managed;
        let v = Value::from_managed(ptr);
        assert!(v.is_managed());

        let mut c = Recording { seen: Vec::new() };
        v.mark(&mut c);
        assert_eq!(c.seen, vec![ptr]);
    }

    #[test]
    fn test_ref_roundtrip() {
        let mut obj = 42u64;
        let mut r: Ref<u64> = Ref::new(&mut obj);
        assert!(!r.is_unset());
        assert_eq!(r.as_ptr(), &mut obj as *mut u64);
        assert_eq!(unsafe { *r.get().unwrap().as_ref() }, 42);

        r.set(std::ptr::null_mut());
        assert!(r.is_unset());
        assert!(r.value().is_undefined());
        assert!(r.get().is_none());
        assert!(r.as_ptr().is_null());
    }

    #[test]
    fn test_ref_set_value_copies_bits() {
        let mut obj = 0u32;
        let v = Value::from_managed(&mut obj as *mut u32 as *mut Managed);
        let mut r: Ref<u32> = Ref::unset();
        r.set_value(v);
        assert_eq!(r.value().raw(), v.raw());
        assert_eq!(r.as_ptr(), &mut obj as *mut u32);
    }

    #[test]
    fn test_mark_slice_mixed() {
        let mut a = 1u64;
        let mut b = 2u64;
        let pa = &mut a as *mut u64 as *mut Managed;
        let pb = &mut b as *mut u64 as *mut Managed;
        let roots = [
            Value::int(1),
            Value::from_managed(pa),
            Value::UNDEFINED,
            Value::from_managed(pb),
        ];
        let mut c = Recording { seen: Vec::new() };
        mark_slice(&roots, &mut c);
        assert_eq!(c.seen, vec![pa, pb]);
    }
}
