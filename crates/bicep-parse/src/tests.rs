use expect_test::{Expect, expect};

fn check(source: &str, expect: Expect) {
    let parse = crate::file(source).unwrap();
    expect.assert_eq(&parse.syntax().debug_dump());
}

fn check_errors(source: &str, expect: Expect) {
    let parse = crate::file(source).unwrap();
    let rendered: String = parse
        .errors()
        .iter()
        .map(|error| format!("{} @ {:?}\n", error.message(), error.range()))
        .collect();
    expect.assert_eq(&rendered);
}

#[test]
fn empty_program() {
    check(
        "",
        expect![[r#"
            PROGRAM
              EOF ""
        "#]],
    );
}

#[test]
fn variable_declaration() {
    check(
        "var x = 1",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                LITERAL
                  INT_NUMBER "1"
              EOF ""
        "#]],
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    check(
        "var x = 1 + 2 * 3",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                BINARY_EXPR
                  LITERAL
                    INT_NUMBER "1"
                  PLUS "+"
                  BINARY_EXPR
                    LITERAL
                      INT_NUMBER "2"
                    STAR "*"
                    LITERAL
                      INT_NUMBER "3"
              EOF ""
        "#]],
    );
}

#[test]
fn subtraction_is_left_associative() {
    check(
        "var x = a - b - c",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                BINARY_EXPR
                  BINARY_EXPR
                    VARIABLE_ACCESS
                      IDENT "a"
                    MINUS "-"
                    VARIABLE_ACCESS
                      IDENT "b"
                  MINUS "-"
                  VARIABLE_ACCESS
                    IDENT "c"
              EOF ""
        "#]],
    );
}

#[test]
fn ternary_is_looser_than_coalesce() {
    check(
        "var x = a ?? b ? c : d",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                TERNARY_EXPR
                  BINARY_EXPR
                    VARIABLE_ACCESS
                      IDENT "a"
                    DOUBLE_QUESTION "??"
                    VARIABLE_ACCESS
                      IDENT "b"
                  QUESTION "?"
                  VARIABLE_ACCESS
                    IDENT "c"
                  COLON ":"
                  VARIABLE_ACCESS
                    IDENT "d"
              EOF ""
        "#]],
    );
}

#[test]
fn ternary_is_right_associative() {
    check(
        "var x = a ? b : c ? d : e",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                TERNARY_EXPR
                  VARIABLE_ACCESS
                    IDENT "a"
                  QUESTION "?"
                  VARIABLE_ACCESS
                    IDENT "b"
                  COLON ":"
                  TERNARY_EXPR
                    VARIABLE_ACCESS
                      IDENT "c"
                    QUESTION "?"
                    VARIABLE_ACCESS
                      IDENT "d"
                    COLON ":"
                    VARIABLE_ACCESS
                      IDENT "e"
              EOF ""
        "#]],
    );
}

#[test]
fn prefix_operators_nest() {
    check(
        "var x = !-a",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                UNARY_EXPR
                  EXCLAMATION "!"
                  UNARY_EXPR
                    MINUS "-"
                    VARIABLE_ACCESS
                      IDENT "a"
              EOF ""
        "#]],
    );
}

#[test]
fn postfix_chain() {
    check(
        "var x = a.b[0]::c(1, 2)",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                FUNCTION_CALL
                  RESOURCE_ACCESS
                    ARRAY_ACCESS
                      PROPERTY_ACCESS
                        VARIABLE_ACCESS
                          IDENT "a"
                        DOT "."
                        IDENT "b"
                      LEFT_BRACKET "["
                      LITERAL
                        INT_NUMBER "0"
                      RIGHT_BRACKET "]"
                    DOUBLE_COLON "::"
                    IDENT "c"
                  LEFT_PAREN "("
                  FUNCTION_ARGUMENT
                    LITERAL
                      INT_NUMBER "1"
                  COMMA ","
                  FUNCTION_ARGUMENT
                    LITERAL
                      INT_NUMBER "2"
                  RIGHT_PAREN ")"
              EOF ""
        "#]],
    );
}

#[test]
fn interpolated_string() {
    check(
        "var x = 'a${b}c'",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                STRING
                  STRING_LEFT_PIECE "'a${"
                  VARIABLE_ACCESS
                    IDENT "b"
                  STRING_RIGHT_PIECE "}c'"
              EOF ""
        "#]],
    );
}

#[test]
fn parameter_with_default_value() {
    check(
        "param size int = 3",
        expect![[r#"
            PROGRAM
              PARAM_DECL
                PARAM_KW "param"
                NAME
                  IDENT "size"
                TYPE
                  IDENT "int"
                PARAM_DEFAULT_VALUE
                  ASSIGN "="
                  LITERAL
                    INT_NUMBER "3"
              EOF ""
        "#]],
    );
}

#[test]
fn decorated_output() {
    check(
        "@secure()\noutput p string = s",
        expect![[r#"
            PROGRAM
              OUTPUT_DECL
                DECORATOR
                  AT "@"
                  FUNCTION_CALL
                    VARIABLE_ACCESS
                      IDENT "secure"
                    LEFT_PAREN "("
                    RIGHT_PAREN ")"
                OUTPUT_KW "output"
                NAME
                  IDENT "p"
                TYPE
                  IDENT "string"
                ASSIGN "="
                VARIABLE_ACCESS
                  IDENT "s"
              EOF ""
        "#]],
    );
}

#[test]
fn target_scope_declaration() {
    check(
        "targetScope = 'subscription'",
        expect![[r#"
            PROGRAM
              TARGET_SCOPE_DECL
                TARGET_SCOPE_KW "targetScope"
                ASSIGN "="
                STRING
                  STRING_COMPLETE "'subscription'"
              EOF ""
        "#]],
    );
}

#[test]
fn existing_resource_with_nested_resource() {
    check(
        "resource a 'T@1' existing = {\n  name: 'x'\n  resource b 'U' = {\n  }\n}",
        expect![[r#"
            PROGRAM
              RESOURCE_DECL
                RESOURCE_KW "resource"
                NAME
                  IDENT "a"
                STRING
                  STRING_COMPLETE "'T@1'"
                EXISTING_KW "existing"
                ASSIGN "="
                OBJECT
                  LEFT_BRACE "{"
                  OBJECT_PROPERTY
                    IDENT "name"
                    COLON ":"
                    STRING
                      STRING_COMPLETE "'x'"
                  RESOURCE_DECL
                    RESOURCE_KW "resource"
                    NAME
                      IDENT "b"
                    STRING
                      STRING_COMPLETE "'U'"
                    ASSIGN "="
                    OBJECT
                      LEFT_BRACE "{"
                      RIGHT_BRACE "}"
                  RIGHT_BRACE "}"
              EOF ""
        "#]],
    );
}

#[test]
fn conditional_resource_body() {
    check(
        "resource r 'T' = if (on) {}",
        expect![[r#"
            PROGRAM
              RESOURCE_DECL
                RESOURCE_KW "resource"
                NAME
                  IDENT "r"
                STRING
                  STRING_COMPLETE "'T'"
                ASSIGN "="
                IF_CONDITION
                  IF_KW "if"
                  PAREN_EXPR
                    LEFT_PAREN "("
                    VARIABLE_ACCESS
                      IDENT "on"
                    RIGHT_PAREN ")"
                  OBJECT
                    LEFT_BRACE "{"
                    RIGHT_BRACE "}"
              EOF ""
        "#]],
    );
}

#[test]
fn loop_with_variable_block() {
    check(
        "var x = [for (it, i) in items: it]",
        expect![[r#"
            PROGRAM
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                FOR_EXPR
                  LEFT_BRACKET "["
                  FOR_KW "for"
                  FOR_VARIABLE_BLOCK
                    LEFT_PAREN "("
                    LOCAL_VARIABLE
                      IDENT "it"
                    COMMA ","
                    LOCAL_VARIABLE
                      IDENT "i"
                    RIGHT_PAREN ")"
                  IN_KW "in"
                  VARIABLE_ACCESS
                    IDENT "items"
                  COLON ":"
                  VARIABLE_ACCESS
                    IDENT "it"
                  RIGHT_BRACKET "]"
              EOF ""
        "#]],
    );
}

#[test]
fn import_with_configuration() {
    check(
        "import kv from az {\n}",
        expect![[r#"
            PROGRAM
              IMPORT_DECL
                IMPORT_KW "import"
                NAME
                  IDENT "kv"
                FROM_KW "from"
                NAME
                  IDENT "az"
                OBJECT
                  LEFT_BRACE "{"
                  RIGHT_BRACE "}"
              EOF ""
        "#]],
    );
}

#[test]
fn garbage_is_skipped_until_the_next_line() {
    check(
        "1 2 3\nvar x = 1",
        expect![[r#"
            PROGRAM
              ERROR
                INT_NUMBER "1"
                INT_NUMBER "2"
                INT_NUMBER "3"
              VAR_DECL
                VAR_KW "var"
                NAME
                  IDENT "x"
                ASSIGN "="
                LITERAL
                  INT_NUMBER "1"
              EOF ""
        "#]],
    );
}

#[test]
fn missing_name_is_reported_without_derailing_the_declaration() {
    check_errors(
        "var = 1",
        expect![[r#"
            expected a name @ 4..5
        "#]],
    );
}

#[test]
fn garbage_reports_a_single_declaration_error() {
    check_errors(
        "1 2 3\nvar x = 1",
        expect![[r#"
            expected a declaration @ 0..1
        "#]],
    );
}

#[test]
fn typed_wrappers_navigate_the_tree() {
    use bicep_syntax::SyntaxKind;
    use bicep_syntax::ast::{AstNode, Declaration, Expr, Object, Program};

    let source = "\
resource a 'T' existing = {
  name: 'x${n}'
  resource b 'U' = {}
}
var y = 1 + 2
var z = [1]
";
    let parse = crate::file(source).unwrap();
    let program = Program::cast(parse.syntax()).unwrap();
    assert!(program.eof_token().is_some());

    let declarations: Vec<_> = program.declarations().collect();
    assert_eq!(declarations.len(), 3);

    let Declaration::Resource(resource) = &declarations[0] else {
        panic!("expected a resource declaration")
    };
    assert!(resource.existing_token().is_some());

    let body = Object::cast(resource.body().unwrap()).unwrap();
    assert_eq!(body.properties().count(), 1);
    assert_eq!(body.nested_resources().count(), 1);

    let property = body.properties().next().unwrap();
    let Some(Expr::Str(name)) = property.value() else { panic!("expected a string value") };
    assert_eq!(name.interpolations().count(), 1);

    let Declaration::Var(y) = &declarations[1] else { panic!("expected a var declaration") };
    let Some(Expr::Binary(sum)) = y.value() else { panic!("expected a binary expression") };
    assert_eq!(sum.op_token().unwrap().kind(), SyntaxKind::PLUS);

    let Declaration::Var(z) = &declarations[2] else { panic!("expected a var declaration") };
    let Some(Expr::Array(items)) = z.value() else { panic!("expected an array") };
    assert_eq!(items.items().count(), 1);
}

#[test]
fn parse_is_lossless() {
    let source = "\
// header comment
@secure() /* inline */
param admin string

resource a 'T@1' existing = {
  name: 'x${suffix}'   // trailing note
  resource b 'U' = {}
}

var xs = [for (it, i) in items: if (it) {}]
output y int = xs[0] ?? -1

// closing comment
";
    let parse = crate::file(source).unwrap();
    assert_eq!(parse.syntax().text(), source);
}

#[test]
fn lossless_even_with_syntax_errors() {
    let source = "var = ??? 1 2\nresource r = {\n";
    let parse = crate::file(source).unwrap();
    assert!(!parse.errors().is_empty());
    assert_eq!(parse.syntax().text(), source);
}

#[test]
fn deep_nesting_hits_the_recursion_limit() {
    let mut source = String::from("var x = ");
    for _ in 0..200 {
        source.push('(');
    }

    let err = crate::file(&source).unwrap_err();
    assert_eq!(err.limit, crate::RECURSION_LIMIT);
}

#[test]
fn deep_bracket_nesting_hits_the_recursion_limit() {
    let mut source = String::from("var x = ");
    for _ in 0..200 {
        source.push('[');
    }

    let err = crate::file(&source).unwrap_err();
    assert_eq!(err.limit, crate::RECURSION_LIMIT);
}

#[test]
fn deep_brace_nesting_hits_the_recursion_limit() {
    let mut source = String::from("var x = ");
    for _ in 0..200 {
        source.push_str("{a:");
    }

    let err = crate::file(&source).unwrap_err();
    assert_eq!(err.limit, crate::RECURSION_LIMIT);
}

#[test]
fn moderate_nesting_is_fine() {
    let mut source = String::from("var x = ");
    for _ in 0..100 {
        source.push('(');
    }
    source.push('1');
    for _ in 0..100 {
        source.push(')');
    }

    assert!(crate::file(&source).is_ok());
}
