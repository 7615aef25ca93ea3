//! 测试辅助工具
//!
//! 提供一个最小的模拟堆：对象带标记位，收集器按 mark/sweep
//! 两阶段工作。值层只转发指针，图遍历全在这里完成。

use std::collections::HashMap;
use std::ptr::NonNull;

use kumo_core::{Collector, Managed, Value};

/// 模拟堆对象：一个标记位加一段出边（模拟对象图）
pub struct HeapObject {
    pub marked: bool,
    pub children: Vec<Value>,
}

/// 模拟堆：持有所有分配，sweep 时释放未标记者
#[derive(Default)]
pub struct MockHeap {
    objects: HashMap<usize, Box<HeapObject>>,
}

impl MockHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配一个空对象，返回它的托管值
    pub fn alloc(&mut self) -> Value {
        let boxed = Box::new(HeapObject {
            marked: false,
            children: Vec::new(),
        });
        let ptr = Box::as_ref(&boxed) as *const HeapObject as *mut HeapObject;
        self.objects.insert(ptr as usize, boxed);
        Value::from_managed(ptr as *mut Managed)
    }

    /// 给对象加一条出边
    pub fn link(&mut self, parent: Value, child: Value) {
        let key = parent.managed() as usize;
        self.objects
            .get_mut(&key)
            .expect("parent not allocated on this heap")
            .children
            .push(child);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn contains(&self, v: Value) -> bool {
        v.is_managed() && self.objects.contains_key(&(v.managed() as usize))
    }

    /// 清除上一轮的标记位
    pub fn clear_marks(&mut self) {
        for obj in self.objects.values_mut() {
            obj.marked = false;
        }
    }

    /// 释放所有未标记对象，返回回收数量
    pub fn sweep(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|_, obj| obj.marked);
        before - self.objects.len()
    }
}

/// 图遍历收集器：标记对象并递归标记其出边
pub struct MarkingCollector<'heap> {
    heap: &'heap mut MockHeap,
}

impl<'heap> MarkingCollector<'heap> {
    pub fn new(heap: &'heap mut MockHeap) -> Self {
        MarkingCollector { heap }
    }
}

impl Collector for MarkingCollector<'_> {
    fn mark_object(&mut self, obj: NonNull<Managed>) {
        let key = obj.as_ptr() as usize;
        let children = match self.heap.objects.get_mut(&key) {
            Some(o) if !o.marked => {
                o.marked = true;
                o.children.clone()
            }
            // 已标记或非本堆对象：重复标记是 no-op
            _ => return,
        };
        for child in children {
            child.mark(self);
        }
    }
}

/// 只记录不遍历的收集器（断言哪些指针被转发）
#[derive(Default)]
pub struct RecordingCollector {
    pub seen: Vec<*mut Managed>,
}

impl Collector for RecordingCollector {
    fn mark_object(&mut self, obj: NonNull<Managed>) {
        self.seen.push(obj.as_ptr());
    }
}
