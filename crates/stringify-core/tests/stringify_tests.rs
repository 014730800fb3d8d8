/// Stringify contract tests: output text for plain values, top-level values,
/// auto-unboxing and the unserializable rules.
///
/// Fixtures mirror the classic engine fast-path suite: each value is run
/// through the public `stringify` entry point, which picks the path itself.
use stringify_core::{
    stringify, FunctionRef, ObjectRef, OpaqueRef, PropertyDescriptor, StringifyError, Value,
};

fn json(value: impl Into<Value>) -> Option<String> {
    stringify(&value.into(), None, None).unwrap()
}

fn noop(name: &str) -> FunctionRef {
    FunctionRef::new(name, |_, _| Ok(Value::Undefined))
}

/// An object with `Date.prototype`-like inherited `toJSON` returning an ISO
/// timestamp for the hidden `time` slot (milliseconds since the epoch).
fn date(millis: u32) -> ObjectRef {
    let proto = ObjectRef::new();
    proto.set(
        "toJSON",
        FunctionRef::new("toJSON", |this, _| {
            let obj = this.as_object().expect("toJSON receiver");
            let millis = obj.get("time")?.as_number().unwrap_or(0.0) as u32;
            Ok(Value::string(format!(
                "1970-01-01T00:00:{:02}.{:03}Z",
                millis / 1000,
                millis % 1000
            )))
        }),
    );
    let d = ObjectRef::with_prototype(&proto);
    d.define_property("time", PropertyDescriptor::hidden(f64::from(millis)));
    d
}

/// A Node-style `Buffer`: an opaque byte value whose prototype carries
/// `toJSON` producing `{"type":"Buffer","data":[...]}`.
fn node_buffer(bytes: &[u8]) -> OpaqueRef {
    let proto = ObjectRef::new();
    proto.set(
        "toJSON",
        FunctionRef::new("toJSON", |this, _| {
            let buffer = this.as_opaque().expect("toJSON receiver");
            let out = ObjectRef::new();
            out.set("type", "Buffer");
            out.set(
                "data",
                ObjectRef::array(buffer.data().iter().map(|b| Value::from(i32::from(*b)))),
            );
            Ok(out.into())
        }),
    );
    OpaqueRef::with_prototype("buffer", bytes.to_vec(), &proto)
}

// ============================================================================
// Plain values
// ============================================================================

#[test]
fn basic_nested_value() {
    let quux = ObjectRef::new();
    quux.set("val1", Value::Undefined);
    quux.set("val2", Value::Null);
    quux.set("val3", true);
    quux.set("val4", false);
    quux.set("val5", 123);
    quux.set("val6", 123.456);
    quux.set("val7", "foo");

    let baz = ObjectRef::array([
        Value::Undefined,
        Value::Null,
        Value::from(true),
        Value::from(false),
        Value::from(123),
        Value::from(123.456),
        Value::from("foo"),
    ]);

    let val = ObjectRef::new();
    val.set("foo", 123);
    val.set("bar", 234);
    val.set("quux", quux);
    val.set("baz", baz);

    assert_eq!(
        json(val).as_deref(),
        Some(
            r#"{"foo":123,"bar":234,"quux":{"val2":null,"val3":true,"val4":false,"val5":123,"val6":123.456,"val7":"foo"},"baz":[null,null,true,false,123,123.456,"foo"]}"#
        )
    );
}

#[test]
fn empty_containers() {
    assert_eq!(json(ObjectRef::new()).as_deref(), Some("{}"));
    assert_eq!(json(ObjectRef::array([])).as_deref(), Some("[]"));
}

#[test]
fn string_escapes() {
    assert_eq!(
        json("tab\there \"quoted\" \\ \u{1}").as_deref(),
        Some(r#""tab\there \"quoted\" \\ \u0001""#)
    );
}

#[test]
fn non_finite_numbers_are_null() {
    let obj = ObjectRef::new();
    obj.set("nan", f64::NAN);
    obj.set("inf", f64::INFINITY);
    obj.set(
        "list",
        ObjectRef::array([Value::from(f64::NEG_INFINITY), Value::from(-0.0)]),
    );
    assert_eq!(
        json(obj).as_deref(),
        Some(r#"{"nan":null,"inf":null,"list":[null,0]}"#)
    );
}

#[test]
fn number_formatting() {
    assert_eq!(json(1e21).as_deref(), Some("1e+21"));
    assert_eq!(json(1e-7).as_deref(), Some("1e-7"));
    assert_eq!(json(0.1).as_deref(), Some("0.1"));
    assert_eq!(json(-42.0).as_deref(), Some("-42"));
}

#[test]
fn index_keys_come_first() {
    let obj = ObjectRef::new();
    obj.set("b", 1);
    obj.set("10", 2);
    obj.set("a", 3);
    obj.set("2", 4);
    assert_eq!(json(obj).as_deref(), Some(r#"{"2":4,"10":2,"b":1,"a":3}"#));
}

#[test]
fn non_enumerable_properties_are_skipped() {
    let obj = ObjectRef::new();
    obj.set("shown", 1);
    obj.define_property("hidden", PropertyDescriptor::hidden(2));
    assert_eq!(json(obj).as_deref(), Some(r#"{"shown":1}"#));
}

#[test]
fn array_named_properties_are_ignored() {
    let arr = ObjectRef::array([Value::from(1)]);
    arr.set("extra", "ignored");
    assert_eq!(json(arr).as_deref(), Some("[1]"));
}

// ============================================================================
// Top-level values
// ============================================================================

#[test]
fn top_level_values() {
    let foo = ObjectRef::new();
    foo.set("foo", 123);

    let cases: Vec<(Value, Option<&str>)> = vec![
        (Value::Undefined, None),
        (Value::Null, Some("null")),
        (Value::from(true), Some("true")),
        (Value::from(false), Some("false")),
        (Value::from(123), Some("123")),
        (Value::from(123.456), Some("123.456")),
        (Value::from("foo"), Some(r#""foo""#)),
        (foo.into(), Some(r#"{"foo":123}"#)),
        (ObjectRef::array([Value::from("foo")]).into(), Some(r#"["foo"]"#)),
        (noop("myfunc").into(), None),
        (date(123).into(), Some(r#""1970-01-01T00:00:00.123Z""#)),
        (
            OpaqueRef::new("raw-buffer", vec![0xde, 0xad, 0xbe, 0xef]).into(),
            None,
        ),
        (OpaqueRef::new("array-buffer", vec![0; 8]).into(), None),
        (
            node_buffer(b"ABCDEFGH").into(),
            Some(r#"{"type":"Buffer","data":[65,66,67,68,69,70,71,72]}"#),
        ),
    ];

    for (i, (value, expected)) in cases.into_iter().enumerate() {
        let text = stringify(&value, None, None).unwrap();
        assert_eq!(text.as_deref(), expected, "case {}", i);
    }
}

// ============================================================================
// Auto-unboxing
// ============================================================================

#[test]
fn auto_unbox() {
    assert_eq!(json(Value::boxed_number(123.0)).as_deref(), Some("123"));
    assert_eq!(json(Value::boxed_string("foo")).as_deref(), Some(r#""foo""#));
    assert_eq!(json(Value::boxed_bool(true)).as_deref(), Some("true"));
    assert_eq!(json(Value::boxed_bool(false)).as_deref(), Some("false"));
}

#[test]
fn boxed_members_are_unboxed() {
    let obj = ObjectRef::new();
    obj.set("n", Value::boxed_number(1.5));
    obj.set(
        "list",
        ObjectRef::array([Value::boxed_string("s"), Value::boxed_bool(false)]),
    );
    assert_eq!(
        json(obj).as_deref(),
        Some(r#"{"n":1.5,"list":["s",false]}"#)
    );
}

// ============================================================================
// Unserializable values
// ============================================================================

#[test]
fn function_member_is_omitted() {
    let obj = ObjectRef::new();
    obj.set("a", 1);
    obj.set("b", noop("b"));
    assert_eq!(json(obj).as_deref(), Some(r#"{"a":1}"#));
}

#[test]
fn function_element_is_null() {
    let arr = ObjectRef::array([Value::from(1), noop("f").into()]);
    assert_eq!(json(arr).as_deref(), Some("[1,null]"));
}

#[test]
fn function_root_is_absent() {
    assert_eq!(json(noop("f")), None);
}

#[test]
fn opaque_member_is_omitted_and_element_is_null() {
    let obj = ObjectRef::new();
    obj.set("raw", OpaqueRef::new("pointer", vec![]));
    obj.set(
        "list",
        ObjectRef::array([OpaqueRef::new("pointer", vec![]).into()]),
    );
    assert_eq!(json(obj).as_deref(), Some(r#"{"list":[null]}"#));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn circular_structure_fails() {
    let o = ObjectRef::new();
    o.set("self", o.clone());
    let err = stringify(&o.clone().into(), None, None).unwrap_err();
    assert!(err.is_circular());
    assert!(err
        .to_string()
        .starts_with("Converting circular structure to JSON"));
    assert!(err.to_string().contains("property 'self' closes the circle"));
    o.remove("self");
}

#[test]
fn getter_failure_propagates() {
    let obj = ObjectRef::new();
    obj.define_getter("boom", |_| Err(StringifyError::callback("getter threw")));
    assert_eq!(
        stringify(&obj.into(), None, None),
        Err(StringifyError::Callback("getter threw".to_string()))
    );
}
