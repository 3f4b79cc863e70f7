//! Core parser tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kiln_ir::{
    AssignOp, BinaryOp, CompilationUnit, Expr, ExprKind, Literal, Member, ModifierSet, StmtKind,
    TypeDeclKind, TypeRefKind, UnaryOp, WildcardBound,
};
use pretty_assertions::assert_eq;

use crate::parse;

fn parse_ok(source: &str) -> CompilationUnit {
    match parse(source) {
        Ok(unit) => unit,
        Err(err) => panic!("unexpected parse failure {err} in:\n{source}"),
    }
}

/// Parse `expr` as the initializer of a field.
fn parse_expr(expr: &str) -> Expr {
    let unit = parse_ok(&format!("class T {{ Object x = {expr}; }}"));
    let Member::Field(field) = &unit.types[0].members[0] else {
        panic!("expected a field");
    };
    field.declarators[0].init.clone().unwrap()
}

/// Parse `stmts` as the body of a method.
fn parse_stmts(stmts: &str) -> Vec<kiln_ir::Stmt> {
    let unit = parse_ok(&format!("class T {{ void m() {{ {stmts} }} }}"));
    let method = unit.types[0].methods().next().unwrap();
    method.body.clone().unwrap().stmts
}

#[test]
fn test_package_imports_and_types() {
    let unit = parse_ok(
        "package com.example;\n\
         import java.util.List;\n\
         import java.util.*;\n\
         import static java.lang.Math.max;\n\
         ;\n\
         public class A {}\n\
         interface B extends C, D {}\n\
         enum E { X, Y }\n",
    );
    assert_eq!(unit.package_name(), "com.example");
    assert_eq!(unit.imports.len(), 3);
    assert_eq!(unit.imports[0].path.dotted(), "java.util.List");
    assert!(unit.imports[1].on_demand);
    assert_eq!(unit.imports[1].path.dotted(), "java.util");
    assert!(unit.imports[2].is_static);

    let kinds: Vec<_> = unit.types.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TypeDeclKind::Class,
            TypeDeclKind::Interface,
            TypeDeclKind::Enum
        ]
    );
    assert_eq!(unit.types[0].modifiers, ModifierSet::PUBLIC);
    assert_eq!(unit.types[1].extends.len(), 2);
    assert_eq!(unit.types[2].enum_constants.len(), 2);
}

#[test]
fn test_package_annotations() {
    let unit = parse_ok("@Deprecated package p; class A {}");
    let package = unit.package.unwrap();
    assert_eq!(package.annotations.len(), 1);

    let unit = parse_ok("@Deprecated class A {}");
    assert!(unit.package.is_none());
    assert!(unit.types[0].has_annotation("Deprecated"));
}

#[test]
fn test_class_members() {
    let unit = parse_ok(
        "abstract class Shape<T extends Comparable<T> & Cloneable> extends Base implements I, J {\n\
             private static final int COUNT = 1, OTHER;\n\
             int legacy[] = {1, 2};\n\
             static { COUNT2 = 2; }\n\
             { x = 1; }\n\
             Shape(int a) { super(a); }\n\
             <U> U convert(U u, String... rest) throws Exception, Error { return u; }\n\
             abstract void area();\n\
             class Inner {}\n\
         }",
    );
    let shape = &unit.types[0];
    assert_eq!(shape.type_params.len(), 1);
    assert_eq!(shape.type_params[0].bounds.len(), 2);
    assert_eq!(shape.extends.len(), 1);
    assert_eq!(shape.implements.len(), 2);
    assert_eq!(shape.members.len(), 8);

    let fields: Vec<_> = shape.fields().collect();
    assert_eq!(fields[0].declarators.len(), 2);
    assert_eq!(
        fields[0].modifiers,
        ModifierSet::PRIVATE | ModifierSet::STATIC | ModifierSet::FINAL
    );
    assert_eq!(fields[1].declarators[0].extra_dims, 1);
    assert!(matches!(
        fields[1].declarators[0].init.as_ref().unwrap().kind,
        ExprKind::ArrayInit(_)
    ));

    assert!(matches!(
        &shape.members[2],
        Member::Initializer(init) if init.is_static
    ));
    assert!(matches!(
        &shape.members[3],
        Member::Initializer(init) if !init.is_static
    ));

    let methods: Vec<_> = shape.methods().collect();
    assert!(methods[0].is_constructor());
    assert_eq!(methods[0].name, "Shape");
    assert_eq!(methods[1].type_params.len(), 1);
    assert!(methods[1].params[1].varargs);
    assert_eq!(methods[1].throws.len(), 2);
    assert!(methods[2].body.is_none());
    assert_eq!(shape.nested_types().count(), 1);
}

#[test]
fn test_enum_with_body() {
    let unit = parse_ok(
        "enum Planet implements HasMass {\n\
             MERCURY(3.303e+23, 2.4397e6),\n\
             EARTH(5.976e+24, 6.37814e6),\n\
             ;\n\
             private final double mass;\n\
             Planet(double mass, double radius) { this.mass = mass; }\n\
         }",
    );
    let planet = &unit.types[0];
    assert_eq!(planet.enum_constants.len(), 2);
    assert_eq!(planet.enum_constants[0].args.len(), 2);
    assert_eq!(planet.members.len(), 2);
}

#[test]
fn test_generic_types_close_with_shift_tokens() {
    let unit = parse_ok("class T { Map<String, List<Map<K, V>>> m; List<? extends Number> a; List<? super T> b; }");
    let fields: Vec<_> = unit.types[0].fields().collect();
    assert_eq!(fields[0].ty.to_string(), "Map<String, List<Map<K, V>>>");
    let TypeRefKind::Named { args, .. } = &fields[1].ty.kind else {
        panic!("expected named type");
    };
    assert!(matches!(
        &args[0].kind,
        TypeRefKind::Wildcard {
            bound: Some((WildcardBound::Extends, _))
        }
    ));
    assert_eq!(fields[2].ty.to_string(), "List<? super T>");
}

#[test]
fn test_precedence() {
    let expr = parse_expr("1 + 2 * 3");
    let ExprKind::Binary { op, lhs, rhs } = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(lhs.kind, ExprKind::Literal(Literal::Int(1))));
    assert!(matches!(
        rhs.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));

    // Left associativity.
    let expr = parse_expr("a - b - c");
    let ExprKind::Binary { lhs, .. } = &expr.kind else {
        panic!("expected binary");
    };
    assert!(matches!(
        lhs.kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));

    let expr = parse_expr("a || b && c | d ^ e & f == g < h << i + j * k");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::Or,
            ..
        }
    ));
}

#[test]
fn test_shift_operators_from_split_tokens() {
    for (source, expected) in [
        ("a >> 2", BinaryOp::Shr),
        ("a >>> 2", BinaryOp::UShr),
        ("a >= 2", BinaryOp::GtEq),
        ("a > 2", BinaryOp::Gt),
        ("a << 2", BinaryOp::Shl),
    ] {
        let expr = parse_expr(source);
        assert!(
            matches!(&expr.kind, ExprKind::Binary { op, .. } if *op == expected),
            "{source}"
        );
    }

    // Separated `>` tokens are two comparisons, which is a syntax error.
    assert!(parse("class T { Object x = a > > 2; }").is_err());
}

#[test]
fn test_assignment_is_right_associative() {
    let stmts = parse_stmts("a = b += c >>>= 1;");
    let StmtKind::Expr(expr) = &stmts[0].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Assign { op, value, .. } = &expr.kind else {
        panic!("expected assignment");
    };
    assert_eq!(*op, AssignOp::PLAIN);
    let ExprKind::Assign { op, value, .. } = &value.kind else {
        panic!("expected nested assignment");
    };
    assert_eq!(*op, AssignOp(Some(BinaryOp::Add)));
    assert!(matches!(
        value.kind,
        ExprKind::Assign {
            op: AssignOp(Some(BinaryOp::UShr)),
            ..
        }
    ));
}

#[test]
fn test_conditional_and_instanceof() {
    let expr = parse_expr("o instanceof String ? 1 : x > 0 ? 2 : 3");
    let ExprKind::Conditional {
        cond, else_expr, ..
    } = &expr.kind
    else {
        panic!("expected conditional");
    };
    assert!(matches!(cond.kind, ExprKind::InstanceOf { .. }));
    assert!(matches!(else_expr.kind, ExprKind::Conditional { .. }));
}

#[test]
fn test_casts_and_parentheses() {
    assert!(matches!(parse_expr("(int) -x").kind, ExprKind::Cast { .. }));
    assert!(matches!(parse_expr("(String) o").kind, ExprKind::Cast { .. }));
    assert!(matches!(
        parse_expr("(List<String>) o").kind,
        ExprKind::Cast { .. }
    ));
    assert!(matches!(parse_expr("(int[]) o").kind, ExprKind::Cast { .. }));

    // A parenthesized name followed by a binary operator is not a cast.
    let expr = parse_expr("(a) - b");
    assert!(matches!(
        expr.kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));

    // Parentheses leave no node behind.
    let expr = parse_expr("(1 + 2) * 3");
    let ExprKind::Binary { op, lhs, .. } = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Mul);
    assert!(matches!(
        lhs.kind,
        ExprKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_primaries_and_selectors() {
    let expr = parse_expr("System.out.println(a[i].length, this.x, Outer.this)");
    let ExprKind::MethodCall { target, name, args } = &expr.kind else {
        panic!("expected call");
    };
    assert_eq!(name, "println");
    assert!(matches!(
        target.as_deref().map(|t| &t.kind),
        Some(ExprKind::FieldAccess { .. })
    ));
    assert_eq!(args.len(), 3);
    assert!(matches!(
        &args[2].kind,
        ExprKind::FieldAccess { name, .. } if name == "this"
    ));

    let ExprKind::ClassLiteral(ty) = parse_expr("java.lang.String.class").kind else {
        panic!("expected class literal");
    };
    assert_eq!(ty.to_string(), "java.lang.String");

    let ExprKind::ClassLiteral(ty) = parse_expr("int[][].class").kind else {
        panic!("expected class literal");
    };
    assert_eq!(ty.dims, 2);

    let ExprKind::ClassLiteral(ty) = parse_expr("String[].class").kind else {
        panic!("expected class literal");
    };
    assert_eq!(ty.to_string(), "String[]");
}

#[test]
fn test_instance_and_array_creation() {
    let ExprKind::New { ty, diamond, args } = parse_expr("new ArrayList<>(10)").kind else {
        panic!("expected new");
    };
    assert!(diamond);
    assert_eq!(ty.to_string(), "ArrayList");
    assert_eq!(args.len(), 1);

    let ExprKind::New { diamond, ty, .. } = parse_expr("new HashMap<String, Integer>()").kind
    else {
        panic!("expected new");
    };
    assert!(!diamond);
    assert_eq!(ty.to_string(), "HashMap<String, Integer>");

    let ExprKind::NewArray {
        dims, extra_dims, ..
    } = parse_expr("new int[3][]").kind
    else {
        panic!("expected array creation");
    };
    assert_eq!(dims.len(), 1);
    assert_eq!(extra_dims, 1);

    let ExprKind::NewArray { init, .. } = parse_expr("new String[] {\"a\", \"b\",}").kind else {
        panic!("expected array creation");
    };
    assert_eq!(init.unwrap().len(), 2);
}

#[test]
fn test_literal_values() {
    let int_of = |source: &str| match parse_expr(source).kind {
        ExprKind::Literal(Literal::Int(bits)) => bits,
        other => panic!("expected int literal, got {other:?}"),
    };
    assert_eq!(int_of("16"), 16);
    assert_eq!(int_of("0x10"), 16);
    assert_eq!(int_of("020"), 16);
    assert_eq!(int_of("0b1_0000"), 16);
    assert_eq!(int_of("0xFFFFFFFF"), u32::MAX);

    assert!(matches!(
        parse_expr("'\\n'").kind,
        ExprKind::Literal(Literal::Char(0x0A))
    ));
    assert!(matches!(
        parse_expr("null").kind,
        ExprKind::Literal(Literal::Null)
    ));
}

#[test]
fn test_negated_decimal_literals_fold() {
    assert!(matches!(
        parse_expr("-2147483648").kind,
        ExprKind::Literal(Literal::Int(0x8000_0000))
    ));
    assert!(matches!(
        parse_expr("-9223372036854775808L").kind,
        ExprKind::Literal(Literal::Long(bits)) if bits == 1 << 63
    ));
    assert!(matches!(
        parse_expr("- 5").kind,
        ExprKind::Literal(Literal::Int(bits)) if bits == 5u32.wrapping_neg()
    ));
    assert!(matches!(
        parse_expr("-7L").kind,
        ExprKind::Literal(Literal::Long(bits)) if bits == 7u64.wrapping_neg()
    ));

    // Other radixes, zero, and non-integer operands stay negations.
    for expr in ["-0x10", "-010", "-0", "-1.5", "-x"] {
        let ExprKind::Unary { op, .. } = parse_expr(expr).kind else {
            panic!("expected negation for {expr}");
        };
        assert_eq!(op, UnaryOp::Neg);
    }

    // Binary minus is untouched.
    assert!(matches!(
        parse_expr("a - 1").kind,
        ExprKind::Binary { op: BinaryOp::Sub, .. }
    ));

    let err = parse("class T { int x = 2147483648; }").unwrap_err();
    assert_eq!(err.code, kiln_diagnostic::ErrorCode::E1007);
    assert_eq!(err.message, "integer number too large");
}

#[test]
fn test_statements() {
    let stmts = parse_stmts(
        "int i = 0, j[] = {1};\n\
         final List<String> names = new ArrayList<>();\n\
         if (i > 0) i++; else { --i; }\n\
         while (i-- > 0) continue;\n\
         do { i += 2; } while (i < 10);\n\
         for (int k = 0, n = 3; k < n; k++, n--) {}\n\
         for (;;) break;\n\
         for (String s : names) System.out.println(s);\n\
         try { f(); } catch (final Exception e) { throw e; } finally { g(); }\n\
         ;\n\
         return;",
    );
    let kinds: Vec<&str> = stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::LocalVar { .. } => "local",
            StmtKind::If { .. } => "if",
            StmtKind::While { .. } => "while",
            StmtKind::DoWhile { .. } => "do",
            StmtKind::For { .. } => "for",
            StmtKind::ForEach { .. } => "foreach",
            StmtKind::Try { .. } => "try",
            StmtKind::Empty => "empty",
            StmtKind::Return(_) => "return",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "local", "local", "if", "while", "do", "for", "for", "foreach", "try", "empty",
            "return"
        ]
    );

    let StmtKind::LocalVar {
        modifiers,
        declarators,
        ..
    } = &stmts[1].kind
    else {
        panic!("expected local variable");
    };
    assert_eq!(*modifiers, ModifierSet::FINAL);
    assert_eq!(declarators[0].name, "names");

    let StmtKind::For { init, update, .. } = &stmts[5].kind else {
        panic!("expected for");
    };
    assert_eq!(init.len(), 1);
    assert_eq!(update.len(), 2);
}

#[test]
fn test_local_declaration_versus_expression() {
    let stmts = parse_stmts("a[i] = 1; x.y.z(); Map.Entry<K, V> e = null; String[] arr; int.class.getName();");
    assert!(matches!(stmts[0].kind, StmtKind::Expr(_)));
    assert!(matches!(stmts[1].kind, StmtKind::Expr(_)));
    assert!(matches!(stmts[2].kind, StmtKind::LocalVar { .. }));
    assert!(matches!(stmts[3].kind, StmtKind::LocalVar { .. }));
    assert!(matches!(stmts[4].kind, StmtKind::Expr(_)));
}

#[test]
fn test_annotations() {
    let unit = parse_ok(
        "@SuppressWarnings({\"unchecked\", \"rawtypes\"})\n\
         @Retention(value = RUNTIME, other = 1 + 2)\n\
         class A {\n\
             @Override public String toString() { return \"\"; }\n\
             void m(@Nullable String s) {}\n\
         }",
    );
    let ty = &unit.types[0];
    assert_eq!(ty.annotations.len(), 2);
    assert!(matches!(
        ty.annotations[0].arg("value").unwrap().kind,
        ExprKind::ArrayInit(_)
    ));
    assert_eq!(ty.annotations[1].args.len(), 2);

    let methods: Vec<_> = ty.methods().collect();
    assert!(methods[0].has_annotation("java.lang.Override"));
    assert_eq!(methods[1].params[0].annotations.len(), 1);
}

#[test]
fn test_explicit_constructor_invocations() {
    let unit = parse_ok("class A { A() { this(1); } A(int x) { super(); } }");
    let names: Vec<String> = unit.types[0]
        .methods()
        .map(|m| match &m.body.as_ref().unwrap().stmts[0].kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::MethodCall { name, target: None, .. },
                ..
            }) => name.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["this", "super"]);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let source = format!(
        "class T {{ int x = {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let unit = parse_ok(&source);
    assert_eq!(unit.types.len(), 1);

    let source = format!(
        "class T {{ void m() {{ {}{} }} }}",
        "{".repeat(depth),
        "}".repeat(depth)
    );
    parse_ok(&source);
}

#[test]
fn test_spans() {
    let source = "class A {\n    int x;\n}";
    let unit = parse_ok(source);
    let ty = &unit.types[0];
    assert_eq!(&source[ty.span.start as usize..ty.span.end as usize], source);
    assert_eq!(
        &source[ty.name_span.start as usize..ty.name_span.end as usize],
        "A"
    );
    let field = ty.fields().next().unwrap();
    assert_eq!(
        &source[field.span.start as usize..field.span.end as usize],
        "int x;"
    );
}
