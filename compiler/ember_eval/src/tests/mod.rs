//! Attribute protocol and builtins, exercised through small programs.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use crate::{lookup_attr, set_attr, EvalError, Interpreter, Module, Namespace, Value};
use ember_ir::Name;
use pretty_assertions::assert_eq;

fn run(source: &str) -> Namespace {
    let unit = ember_parse::parse(source, "attrs.em").unwrap();
    let globals = Namespace::new();
    Interpreter::new()
        .exec_unit(&unit, &globals, &Name::new("attrs"))
        .unwrap();
    globals
}

#[test]
fn function_slots() {
    let globals = run("/// Adds.\nfn add(a, b) = a + b\nadd.tag = \"math\"");
    let add = globals.get("add").unwrap();
    assert_eq!(lookup_attr(&add, "__name__").unwrap().as_str(), Some("add"));
    assert_eq!(lookup_attr(&add, "__module__").unwrap().as_str(), Some("attrs"));
    assert_eq!(lookup_attr(&add, "__doc__").unwrap().as_str(), Some("Adds."));
    assert_eq!(lookup_attr(&add, "tag").unwrap().as_str(), Some("math"));
    assert!(lookup_attr(&add, "missing").is_none());
}

#[test]
fn setting_function_doc() {
    let globals = run("fn f() = 1\nf.__doc__ = \"changed\"");
    let f = globals.get("f").unwrap();
    assert_eq!(f.as_function().unwrap().doc().as_deref(), Some("changed"));
}

#[test]
fn instance_methods_are_bound_fresh() {
    let globals = run("class C { fn m(self) = self }\nlet c = C()");
    let c = globals.get("c").unwrap();
    let first = lookup_attr(&c, "m").unwrap();
    let second = lookup_attr(&c, "m").unwrap();
    assert!(!first.is_same(&second));
    let method = first.as_method().unwrap();
    assert!(method.receiver().is_same(&c));
    assert!(lookup_attr(&first, "__self__").unwrap().is_same(&c));
    assert_eq!(lookup_attr(&first, "__name__").unwrap().as_str(), Some("m"));
}

#[test]
fn instance_fields_shadow_class_attrs() {
    let globals = run("class C { let v = 1 }\nlet c = C()\nc.v = 2");
    let c = globals.get("c").unwrap();
    let class = globals.get("C").unwrap();
    assert_eq!(lookup_attr(&c, "v").unwrap().as_int(), Some(2));
    assert_eq!(lookup_attr(&class, "v").unwrap().as_int(), Some(1));
}

#[test]
fn scalars_reject_attribute_assignment() {
    let err = set_attr(&Value::Int(1), Name::new("x"), Value::None).unwrap_err();
    assert_eq!(
        err,
        EvalError::CannotSetAttribute {
            type_name: "int".to_string(),
            attr: "x".to_string(),
        }
    );
}

#[test]
fn builtins() {
    let globals = run(
        "class C { let a = 1 }\n\
         let has = hasattr(C, \"a\")\n\
         let missing = hasattr(C, \"b\")\n\
         let got = getattr(C, \"b\", 9)\n\
         let name = type_name(C())\n\
         let text = str(12) + \"!\"",
    );
    assert!(globals.get("has").unwrap().is_truthy());
    assert!(!globals.get("missing").unwrap().is_truthy());
    assert_eq!(globals.get("got").unwrap().as_int(), Some(9));
    assert_eq!(globals.get("name").unwrap().as_str(), Some("C"));
    assert_eq!(globals.get("text").unwrap().as_str(), Some("12!"));
}

#[test]
fn getattr_without_default_fails() {
    let unit = ember_parse::parse("getattr(1, \"x\")", "attrs.em").unwrap();
    let err = Interpreter::new()
        .exec_unit(&unit, &Namespace::new(), &Name::new("attrs"))
        .unwrap_err();
    assert!(matches!(err, EvalError::NoAttribute { .. }));
}

#[test]
fn module_handle_records_its_name() {
    let module = Module::new("app.shapes");
    assert_eq!(module.get("__name__").unwrap().as_str(), Some("app.shapes"));
    assert_eq!(module.split_name(), (Some("app"), "shapes"));
    assert!(!module.is_package());
    assert_eq!(module.namespace().len(), 1);
}
