#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;

use super::*;

fn collect(source: &str) -> (Result<ClassRegistry, SemanticError>, StringInterner) {
    let interner = StringInterner::new();
    let tokens = dbs_lexer::lex(source, &interner).unwrap();
    let tree = dbs_parse::parse(&tokens, &interner).unwrap();
    let result = ClassCollector::new(&tree, &interner).collect();
    (result, interner)
}

#[test]
fn builtins_are_registered() {
    let registry = ClassRegistry::with_builtins();
    let form = registry.lookup(Name::FORM).unwrap();
    assert_eq!(registry.get(form).native, Some(NativeBase::Form));
    assert!(registry.lookup(Name::PUSHBUTTON).is_some());
    assert!(registry.lookup(Name::FONT).is_none());
}

#[test]
fn members_are_sorted_into_methods_properties_and_init() {
    let src = "\
CLASS Counter
  PROPERTY count = 0
  this.label = \"c\"
  METHOD Bump
    this.count = this.count + 1
  ENDMETHOD
ENDCLASS
";
    let (registry, interner) = collect(src);
    let registry = registry.unwrap();
    let id = registry.lookup(interner.intern("counter")).unwrap();
    let class = registry.get(id);
    assert_eq!(class.properties.len(), 1);
    assert_eq!(class.init.len(), 1);
    let bump = class.methods.get(&interner.intern("BUMP")).unwrap();
    assert_eq!(bump.class, id);
    assert_eq!(bump.body.len(), 1);
}

#[test]
fn method_lookup_walks_the_parent_chain() {
    let src = "\
CLASS A
  METHOD M
  ENDMETHOD
  METHOD Only
  ENDMETHOD
ENDCLASS
CLASS B OF A
  METHOD M
  ENDMETHOD
ENDCLASS
";
    let (registry, interner) = collect(src);
    let registry = registry.unwrap();
    let a = registry.lookup(interner.intern("A")).unwrap();
    let b = registry.lookup(interner.intern("B")).unwrap();

    assert_eq!(registry.chain(b), vec![a, b]);
    assert_eq!(registry.find_method(b, interner.intern("M")).unwrap().class, b);
    assert_eq!(registry.find_method(b, interner.intern("ONLY")).unwrap().class, a);
    assert!(registry.find_method(a, interner.intern("missing")).is_none());
}

#[test]
fn native_base_is_inherited() {
    let src = "CLASS MyForm OF Form\nENDCLASS\nCLASS Deeper OF MyForm\nENDCLASS\nCLASS Plain\nENDCLASS\n";
    let (registry, interner) = collect(src);
    let registry = registry.unwrap();
    let deeper = registry.lookup(interner.intern("Deeper")).unwrap();
    let plain = registry.lookup(interner.intern("Plain")).unwrap();
    assert_eq!(registry.native_base(deeper), Some(NativeBase::Form));
    assert!(registry.descends_from(deeper, Name::FORM));
    assert_eq!(registry.native_base(plain), None);
}

#[test]
fn classes_may_be_declared_after_use() {
    let src = "x = NEW B()\nCLASS B OF A\nENDCLASS\nCLASS A\nENDCLASS\n";
    let (registry, _) = collect(src);
    assert!(registry.is_ok());
}

#[test]
fn duplicate_member() {
    let src = "CLASS A\n  PROPERTY x\n  METHOD x\n  ENDMETHOD\nENDCLASS\n";
    let (err, _) = collect(src);
    let err = err.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::E2001);
    assert_eq!(err.to_string(), "`X` is declared twice in class `A`");
}

#[test]
fn duplicate_class() {
    let (err, _) = collect("CLASS A\nENDCLASS\nCLASS a\nENDCLASS\n");
    assert_eq!(err.unwrap_err().error_code(), ErrorCode::E2002);

    let (err, _) = collect("CLASS Form\nENDCLASS\n");
    let err = err.unwrap_err();
    assert!(matches!(err, SemanticError::DuplicateClass { first: None, .. }));
}

#[test]
fn unknown_parent() {
    let (err, _) = collect("CLASS A OF Missing\nENDCLASS\n");
    assert_eq!(
        err.unwrap_err().to_string(),
        "class `A` inherits from unknown class `MISSING`"
    );
}

#[test]
fn inheritance_cycle() {
    let (err, _) = collect("CLASS A OF B\nENDCLASS\nCLASS B OF A\nENDCLASS\n");
    let err = err.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::E2004);
    assert_eq!(err.to_string(), "class `A` inherits from itself: A -> B -> A");
}

#[test]
fn class_names_are_sorted() {
    let (registry, interner) = collect("CLASS Zeta\nENDCLASS\nCLASS Alpha\nENDCLASS\n");
    assert_eq!(
        registry.unwrap().class_names(&interner),
        vec!["ALPHA", "DIALOG", "FORM", "PUSHBUTTON", "ZETA"]
    );
}
