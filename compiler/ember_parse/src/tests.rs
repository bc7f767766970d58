#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use ember_ir::{BinaryOp, ExprKind, Name, Stmt};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str) -> Vec<Stmt> {
    parse(source, "test.em").unwrap().body
}

#[test]
fn let_binding() {
    let body = parse_ok("let answer = 40 + 2");
    let Stmt::Let { name, value, .. } = &body[0] else {
        panic!("expected let, got {:?}", body[0]);
    };
    assert_eq!(name, &Name::new("answer"));
    assert!(matches!(
        value.kind,
        ExprKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn expression_body_becomes_return() {
    let body = parse_ok("fn double(x) = x * 2");
    let Stmt::Fn(def) = &body[0] else {
        panic!("expected fn");
    };
    assert_eq!(def.name, Name::new("double"));
    assert_eq!(def.params.len(), 1);
    assert!(matches!(def.body[..], [Stmt::Return { value: Some(_), .. }]));
}

#[test]
fn defaults_and_doc_comments() {
    let body = parse_ok("/// Greets.\n/// Twice.\nfn greet(name, punct = \"!\") { return name + punct }");
    let Stmt::Fn(def) = &body[0] else {
        panic!("expected fn");
    };
    assert_eq!(def.doc.as_deref(), Some("Greets.\nTwice."));
    assert_eq!(def.default_count(), 1);
    assert!(def.params[1].default.is_some());
}

#[test]
fn non_trailing_default_is_rejected() {
    let err = parse("fn f(a = 1, b) = a", "t.em").unwrap_err();
    assert!(matches!(err, ParseError::DefaultOrder { ref name, .. } if name == "b"));
}

#[test]
fn class_with_bases_and_members() {
    let source = r#"
        /// A shape.
        class Square(Shape) {
            let sides = 4
            fn area(self) = self.side * self.side
            class Meta { let tag = "sq" }
        }
    "#;
    let body = parse_ok(source);
    let Stmt::Class(def) = &body[0] else {
        panic!("expected class");
    };
    assert_eq!(def.name, Name::new("Square"));
    assert_eq!(def.doc.as_deref(), Some("A shape."));
    assert_eq!(def.bases.len(), 1);
    assert_eq!(def.body.len(), 3);
    assert!(matches!(def.body[1], Stmt::Fn(_)));
    assert!(matches!(def.body[2], Stmt::Class(_)));
}

#[test]
fn class_body_rejects_statements() {
    let err = parse("class C { raise \"no\" }", "t.em").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { .. }));
}

#[test]
fn attribute_assignment_and_calls() {
    let body = parse_ok("fn init(self, w) { self.w = w; helper(self, 1,) }");
    let Stmt::Fn(def) = &body[0] else {
        panic!("expected fn");
    };
    assert!(matches!(def.body[0], Stmt::Assign { .. }));
    let Stmt::Expr(call) = &def.body[1] else {
        panic!("expected call statement");
    };
    let ExprKind::Call { args, .. } = &call.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
}

#[test]
fn invalid_assignment_target() {
    let err = parse("f() = 1", "t.em").unwrap_err();
    assert!(matches!(err, ParseError::InvalidAssignTarget { .. }));
}

#[test]
fn precedence_mul_over_add_and_cmp_over_and() {
    let body = parse_ok("let x = 1 + 2 * 3 == 7 and not false");
    let Stmt::Let { value, .. } = &body[0] else {
        panic!("expected let");
    };
    let ExprKind::Binary { op, left, .. } = &value.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::And);
    let ExprKind::Binary { op, left, .. } = &left.kind else {
        panic!("expected comparison");
    };
    assert_eq!(*op, BinaryOp::Eq);
    let ExprKind::Binary { op, right, .. } = &left.kind else {
        panic!("expected sum");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn if_else_chain_and_bare_return() {
    let body = parse_ok("fn sign(n) { if n < 0 { return -1 } else if n == 0 { return } else { return 1 } }");
    let Stmt::Fn(def) = &body[0] else {
        panic!("expected fn");
    };
    let Stmt::If { else_body, .. } = &def.body[0] else {
        panic!("expected if");
    };
    let Stmt::If { then_body, .. } = &else_body[0] else {
        panic!("expected else-if");
    };
    assert!(matches!(then_body[0], Stmt::Return { value: None, .. }));
}

#[test]
fn unterminated_block_reports_eof() {
    let err = parse("fn f() { return 1", "t.em").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn lex_errors_surface() {
    let err = parse("let x = $", "t.em").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
    assert!(err.span().is_some());
}

#[test]
fn origin_is_recorded() {
    let unit = parse("let a = 1", "pkg/mod.em").unwrap();
    assert_eq!(unit.origin, "pkg/mod.em");
}
