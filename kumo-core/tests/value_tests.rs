//! 值单元公开 API 测试
//!
//! 跨模块视角：构造、分类、窄化、SameValue 与托管指针
//! 往返，全部只经由 crate 对外导出的接口。

mod common;
use common::MockHeap;

use kumo_core::runtime::coerce::PrimitiveOnly;
use kumo_core::{Value, ValueError};

// ===== 变体互斥 =====

#[test]
fn test_every_value_has_one_variant() {
    let mut heap = MockHeap::new();
    let samples = [
        Value::double(1.5),
        Value::double(f64::NAN),
        Value::int(-7),
        Value::TRUE,
        Value::FALSE,
        Value::NULL,
        Value::UNDEFINED,
        heap.alloc(),
    ];
    for v in samples {
        let variants = [
            v.is_double(),
            v.is_integer(),
            v.is_boolean(),
            v.is_null(),
            v.is_undefined(),
            v.is_managed(),
        ];
        let hits = variants.iter().filter(|b| **b).count();
        assert_eq!(hits, 1, "{v:?} matched {hits} variants");
    }
}

// ===== 托管指针往返 =====

#[test]
fn test_managed_pointer_roundtrip() {
    let mut heap = MockHeap::new();
    let v = heap.alloc();
    assert!(v.is_managed());
    assert!(!v.is_number());
    assert!(!v.is_null_or_undefined());
    assert!(heap.contains(v));

    let nn = v.as_managed().unwrap();
    assert_eq!(nn.as_ptr(), v.managed());

    // 位级复制保持同一身份
    let copy = v;
    assert_eq!(copy.raw(), v.raw());
    assert!(copy.same_value(v));
}

#[test]
fn test_raw_roundtrip_preserves_identity() {
    let mut heap = MockHeap::new();
    for v in [Value::double(-0.0), Value::int(9), Value::NULL, heap.alloc()] {
        let back = Value::from_raw(v.raw());
        assert_eq!(back.raw(), v.raw());
        assert_eq!(back.type_name(), v.type_name());
    }
}

#[test]
fn test_null_pointer_becomes_undefined() {
    let v = Value::from_managed(std::ptr::null_mut());
    assert!(v.is_undefined());
    assert!(v.as_managed().is_none());
}

// ===== 数值语义 =====

#[test]
fn test_number_predicate_spans_both_encodings() {
    assert!(Value::int(1).is_number());
    assert!(Value::double(1.0).is_number());
    assert!(Value::double(f64::NAN).is_number());
    assert!(!Value::TRUE.is_number());
    assert!(!Value::NULL.is_number());
}

#[test]
fn test_narrowing_is_semantically_invisible() {
    let mut v = Value::double(17.0);
    let before = v.as_double();
    let was_int32 = v.is_int32();
    assert!(v.try_integer_conversion());
    assert!(v.is_integer());
    assert_eq!(v.as_double(), before);
    assert_eq!(v.is_int32(), was_int32);
    assert!(v.same_value(Value::double(17.0)));

    // -0.0 窄化会丢符号，因此拒绝
    let mut z = Value::double(-0.0);
    assert!(!z.try_integer_conversion());
    assert!(z.is_double());
    assert!(!z.same_value(Value::int(0)));
}

#[test]
fn test_same_value_follows_es5() {
    assert!(Value::double(f64::NAN).same_value(Value::double(f64::NAN)));
    assert!(!Value::double(0.0).same_value(Value::double(-0.0)));
    assert!(Value::int(4).same_value(Value::double(4.0)));
    assert!(!Value::NULL.same_value(Value::UNDEFINED));

    let mut heap = MockHeap::new();
    let a = heap.alloc();
    let b = heap.alloc();
    assert!(a.same_value(a));
    assert!(!a.same_value(b));
}

// ===== 带检查访问器 =====

#[test]
fn test_checked_accessor_errors_name_variants() {
    let err = Value::NULL.try_double().unwrap_err();
    assert_eq!(
        err,
        ValueError::WrongVariant {
            expected: "double",
            found: "null"
        }
    );
    assert!(format!("{err}").contains("expected double"));

    let mut heap = MockHeap::new();
    let obj = heap.alloc();
    assert_eq!(
        obj.try_integer().unwrap_err(),
        ValueError::WrongVariant {
            expected: "integer",
            found: "object"
        }
    );
}

// ===== 强制转换 =====

#[test]
fn test_to_boolean_is_total() {
    let mut heap = MockHeap::new();
    assert!(!Value::UNDEFINED.to_boolean());
    assert!(!Value::NULL.to_boolean());
    assert!(!Value::FALSE.to_boolean());
    assert!(!Value::int(0).to_boolean());
    assert!(!Value::double(0.0).to_boolean());
    assert!(!Value::double(-0.0).to_boolean());
    assert!(!Value::double(f64::NAN).to_boolean());

    assert!(Value::TRUE.to_boolean());
    assert!(Value::int(-1).to_boolean());
    assert!(Value::double(0.5).to_boolean());
    assert!(heap.alloc().to_boolean());
}

#[test]
fn test_to_number_primitive() {
    assert!(Value::UNDEFINED.to_number_primitive().is_nan());
    assert_eq!(Value::NULL.to_number_primitive(), 0.0);
    assert_eq!(Value::TRUE.to_number_primitive(), 1.0);
    assert_eq!(Value::FALSE.to_number_primitive(), 0.0);
    assert_eq!(Value::int(-9).to_number_primitive(), -9.0);
    assert_eq!(Value::double(2.5).to_number_primitive(), 2.5);
}

#[test]
fn test_int_coercions_wrap_modulo() {
    let hooks = PrimitiveOnly;
    let v = Value::double(4294967296.0 + 5.0);
    assert_eq!(v.to_int32(&hooks), 5);
    assert_eq!(v.to_uint32(&hooks), 5);
    assert_eq!(Value::double(-1.0).to_uint32(&hooks), u32::MAX);
    assert_eq!(Value::double(65536.0 + 3.0).to_uint16(&hooks), 3);
    assert_eq!(Value::double(f64::INFINITY).to_int32(&hooks), 0);
    assert_eq!(Value::double(f64::NAN).to_int32(&hooks), 0);
    // integer 快路径
    assert_eq!(Value::int(-3).to_int32(&hooks), -3);
    assert_eq!(Value::int(-3).to_uint32(&hooks), 4294967293);
}
