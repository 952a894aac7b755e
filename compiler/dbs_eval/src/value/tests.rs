use super::*;
use crate::class_registry::ClassId;

fn instance(interner: &StringInterner) -> InstanceRef {
    InstanceRef::new(Instance::new(ClassId::from_raw(0), interner.intern("Widget")))
}

#[test]
fn truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Text(String::new()).is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Number(-1.5).is_truthy());
    assert!(Value::from("x").is_truthy());
    assert!(Value::Font(FontRef::new(FontValue::default())).is_truthy());
}

#[test]
fn numbers_display_without_trailing_zero() {
    let interner = StringInterner::new();
    assert_eq!(Value::Number(3.0).display(&interner), "3");
    assert_eq!(Value::Number(2.5).display(&interner), "2.5");
    assert_eq!(Value::Number(-4.0).display(&interner), "-4");
    assert_eq!(Value::Bool(true).display(&interner), ".T.");
    assert_eq!(Value::Null.display(&interner), "");
}

#[test]
fn instance_display_uses_class_name() {
    let interner = StringInterner::new();
    let inst = instance(&interner);
    assert_eq!(Value::Instance(inst).display(&interner), "[WIDGET object]");
}

#[test]
fn equality_is_identity_for_objects() {
    let interner = StringInterner::new();
    let a = instance(&interner);
    let b = instance(&interner);
    assert!(Value::Instance(a.clone()).equals(&Value::Instance(a.clone())));
    assert!(!Value::Instance(a).equals(&Value::Instance(b)));
    assert!(!Value::Number(1.0).equals(&Value::from("1")));
    assert!(Value::Null.equals(&Value::Null));
}

#[test]
fn delegate_does_not_keep_target_alive() {
    let interner = StringInterner::new();
    let inst = instance(&interner);
    let delegate = Delegate::new(&inst, interner.intern("Click"), None);
    assert!(delegate.target().is_some());
    drop(inst);
    assert!(delegate.target().is_none());
}

#[test]
fn instance_properties_are_keyed_by_name() {
    let interner = StringInterner::new();
    let inst = instance(&interner);
    inst.borrow_mut().set_prop(interner.intern("caption"), Value::from("OK"));
    let inst = inst.borrow();
    assert!(inst.has_prop(interner.intern("CAPTION")));
    assert!(matches!(inst.prop(Name::CAPTION), Some(Value::Text(t)) if t == "OK"));
}

#[test]
fn font_members() {
    let interner = StringInterner::new();
    let mut font = FontValue::default();
    assert!(matches!(font.member(Name::FAMILY), Some(Value::Text(f)) if f == "Arial"));
    assert_eq!(font.set_member(Name::BOLD, &Value::Bool(true), &interner), Ok(()));
    assert_eq!(font.set_member(Name::SIZE, &Value::Number(14.0), &interner), Ok(()));
    assert_eq!(
        font.set_member(Name::SIZE, &Value::from("big"), &interner),
        Err(FontMemberError::ExpectedNumber)
    );
    assert_eq!(
        font.set_member(Name::CAPTION, &Value::Null, &interner),
        Err(FontMemberError::Unknown)
    );
    assert!(font.bold);
    assert!((font.size - 14.0).abs() < f64::EPSILON);
}

#[test]
fn duplicated_font_is_independent() {
    let font = FontRef::new(FontValue::default());
    let copy = font.duplicate();
    copy.borrow_mut().italic = true;
    assert!(!font.borrow().italic);
    assert!(!font.ptr_eq(&copy));
}
