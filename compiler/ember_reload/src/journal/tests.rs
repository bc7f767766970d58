#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use ember_eval::{Interpreter, Value};
use ember_ir::Name;

fn run(source: &str) -> Namespace {
    let unit = ember_parse::parse(source, "journal.em").unwrap();
    let ns = Namespace::new();
    Interpreter::new()
        .exec_unit(&unit, &ns, &Name::new("journal"))
        .unwrap();
    ns
}

#[test]
fn rollback_restores_bindings_functions_and_classes() {
    let ns = run("fn f() = 1\nclass C { let v = 1 }");
    let f = ns.get("f").unwrap();
    let c = ns.get("C").unwrap();
    let func = f.as_function().unwrap();
    let class = c.as_class().unwrap();
    let original_code = func.code();

    let mut journal = Journal::begin(&ns);
    assert!(journal.record_function(func));
    assert!(journal.record_class(class));
    assert!(!journal.record_class(class));
    assert_eq!(journal.len(), 2);

    let other = run("fn g() = 2");
    func.state_mut().code = other.get("g").unwrap().as_function().unwrap().code();
    class.set_attr(Name::new("v"), Value::Int(2));
    class.set_attr(Name::new("extra"), Value::None);
    ns.insert(Name::new("added"), Value::Int(0));
    ns.remove("f");

    journal.rollback();

    assert!(std::rc::Rc::ptr_eq(&func.code(), &original_code));
    assert_eq!(class.own_attr("v").unwrap().as_int(), Some(1));
    assert!(class.own_attr("extra").is_none());
    assert!(ns.get("f").unwrap().is_same(&f));
    assert!(!ns.contains("added"));
}

#[test]
fn commit_keeps_changes() {
    let ns = run("let x = 1");
    let journal = Journal::begin(&ns);
    ns.insert(Name::new("x"), Value::Int(2));
    assert!(journal.is_empty());
    journal.commit();
    assert_eq!(ns.get("x").unwrap().as_int(), Some(2));
}

#[test]
fn each_object_is_recorded_once() {
    let source: String = (0..200)
        .map(|i| format!("fn f{i}() = {i}\nclass C{i} {{ let v = {i} }}\n"))
        .collect();
    let ns = run(&source);
    let mut journal = Journal::begin(&ns);

    for (_, value) in ns.snapshot() {
        match &value {
            Value::Function(func) => assert!(journal.record_function(func)),
            Value::Class(class) => assert!(journal.record_class(class)),
            _ => {}
        }
    }
    assert_eq!(journal.len(), 400);

    let again = ns.get("f7").unwrap();
    assert!(!journal.record_function(&again.as_function().unwrap().clone()));
    assert!(!journal.record_class(ns.get("C199").unwrap().as_class().unwrap()));
    assert_eq!(journal.len(), 400);
}
