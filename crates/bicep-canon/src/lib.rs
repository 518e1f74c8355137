//! Canonical S-expression rendering of a parsed program.
//!
//! The output is a shape string: node kinds without payloads, so two
//! differently formatted sources with the same structure canonicalize
//! identically. Comments surface as bare `(comment)` markers at statement
//! boundaries, inside object and array bodies, and after string literals;
//! all other trivia is dropped.


use bicep_syntax::ast::{
    AstNode, Declaration, Expr, ForBinder, IfCondition, ObjectKey, ObjectProperty, Program,
    StringExpr,
};
use bicep_syntax::{GreenTrivia, SyntaxElement, SyntaxKind, SyntaxNode};
use thiserror::Error;

/// A node kind surfaced somewhere the canonical form has no rendering for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no canonical form for {kind:?} nodes")]
pub struct UnsupportedNodeKind {
    pub kind: SyntaxKind,
}

pub fn canonicalize(root: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    let Some(program) = Program::cast(root.clone()) else {
        return Err(UnsupportedNodeKind { kind: root.kind() });
    };

    let mut parts = Vec::new();

    for element in program.syntax().children_with_tokens() {
        match element {
            SyntaxElement::Node(node) if node.kind() == SyntaxKind::ERROR => {
                push_subtree_comments(&node, &mut parts);
            }
            SyntaxElement::Node(node) => {
                push_leading_comments(&node, &mut parts);
                parts.push(statement(&node)?);
                push_trailing_comments(&node, &mut parts);
            }
            SyntaxElement::Token(token) => {
                push_comment_markers(token.leading_trivia(), &mut parts);
                push_comment_markers(token.trailing_trivia(), &mut parts);
            }
        }
    }

    Ok(wrap("program", &parts, "\n"))
}

fn wrap(tag: &str, parts: &[String], separator: &str) -> String {
    let parts: Vec<&str> =
        parts.iter().map(String::as_str).filter(|part| !part.is_empty()).collect();

    if parts.is_empty() {
        format!("({tag})")
    } else {
        format!("({tag} {})", parts.join(separator))
    }
}

fn push_comment_markers(trivia: &GreenTrivia, parts: &mut Vec<String>) {
    for piece in trivia.pieces() {
        if piece.kind.is_comment() {
            parts.push("(comment)".to_owned());
        }
    }
}

fn push_leading_comments(node: &SyntaxNode, parts: &mut Vec<String>) {
    if let Some(token) = node.first_token() {
        push_comment_markers(token.leading_trivia(), parts);
    }
}

/// Trailing comments of a node's last token, unless that token is a string
/// piece: the string rendering already owns those.
fn push_trailing_comments(node: &SyntaxNode, parts: &mut Vec<String>) {
    if let Some(token) = node.last_token() {
        if string_piece_kind(token.kind()) {
            return;
        }
        push_comment_markers(token.trailing_trivia(), parts);
    }
}

/// Every comment in the subtree, in source order. Used for `ERROR` nodes,
/// which render as nothing but still surface their comments.
fn push_subtree_comments(node: &SyntaxNode, parts: &mut Vec<String>) {
    for element in node.children_with_tokens() {
        match element {
            SyntaxElement::Node(node) => push_subtree_comments(&node, parts),
            SyntaxElement::Token(token) => {
                push_comment_markers(token.leading_trivia(), parts);
                push_comment_markers(token.trailing_trivia(), parts);
            }
        }
    }
}

fn string_piece_kind(kind: SyntaxKind) -> bool {
    kind.is_string_piece() || kind == SyntaxKind::MULTILINE_STRING
}

/// A declaration wrapped in its `(statement ...)` envelope, decorators first.
fn statement(node: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    let Some(declaration) = Declaration::cast(node.clone()) else {
        return Err(UnsupportedNodeKind { kind: node.kind() });
    };

    let mut parts = Vec::new();

    // Decorators stack on their own lines within the statement envelope.
    let mut decorators = Vec::new();
    for decorator in declaration.decorators() {
        let mut inner = Vec::new();
        if let Some(expression) = decorator.expression() {
            inner.push(expr(&expression)?);
        }
        decorators.push(wrap("decorator", &inner, " "));
    }
    if !decorators.is_empty() {
        parts.push(decorators.join("\n"));
    }

    parts.push(match &declaration {
        Declaration::TargetScope(decl) => {
            let mut inner = Vec::new();
            if let Some(value) = decl.value() {
                inner.push(expr(&value)?);
            }
            wrap("targetScope", &inner, " ")
        }
        Declaration::Param(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if decl.ty().is_some() {
                inner.push("(type (identifier))".to_owned());
            }
            if let Some(default) = decl.default_value() {
                let mut value = Vec::new();
                if let Some(value_expr) = default.value() {
                    value.push(expr(&value_expr)?);
                }
                inner.push(wrap("parameterDefaultValue", &value, " "));
            }
            wrap("parameterDeclaration", &inner, " ")
        }
        Declaration::Var(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if let Some(value) = decl.value() {
                inner.push(expr(&value)?);
            }
            wrap("variableDeclaration", &inner, " ")
        }
        Declaration::Output(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if decl.ty().is_some() {
                inner.push("(type (identifier))".to_owned());
            }
            if let Some(value) = decl.value() {
                inner.push(expr(&value)?);
            }
            wrap("outputDeclaration", &inner, " ")
        }
        Declaration::Resource(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if let Some(type_string) = decl.type_string() {
                inner.push(string(&type_string)?);
            }
            if let Some(body) = decl.body() {
                inner.push(node_shape(&body)?);
            }
            wrap("resourceDeclaration", &inner, " ")
        }
        Declaration::Module(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if let Some(path) = decl.path() {
                inner.push(string(&path)?);
            }
            if let Some(body) = decl.body() {
                inner.push(node_shape(&body)?);
            }
            wrap("moduleDeclaration", &inner, " ")
        }
        Declaration::Import(decl) => {
            let mut inner = Vec::new();
            if decl.name().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if decl.source().is_some() {
                inner.push("(identifier)".to_owned());
            }
            if let Some(config) = decl.config() {
                inner.push(object(config.syntax())?);
            }
            wrap("importDeclaration", &inner, " ")
        }
    });

    Ok(wrap("statement", &parts, " "))
}

/// Renders any node that can appear in expression or body position.
fn node_shape(node: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    if let Some(expression) = Expr::cast(node.clone()) {
        return expr(&expression);
    }

    match node.kind() {
        SyntaxKind::IF_CONDITION => if_condition(node),
        SyntaxKind::NAME => Ok("(identifier)".to_owned()),
        SyntaxKind::TYPE => Ok("(type (identifier))".to_owned()),
        SyntaxKind::ERROR => {
            let mut parts = Vec::new();
            push_subtree_comments(node, &mut parts);
            Ok(parts.join(" "))
        }
        kind => Err(UnsupportedNodeKind { kind }),
    }
}

fn expr(expression: &Expr) -> Result<String, UnsupportedNodeKind> {
    match expression {
        Expr::Literal(literal) => {
            let tag = match literal.token().map(|token| token.kind()) {
                Some(SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW) => "booleanLiteral",
                Some(SyntaxKind::NULL_KW) => "nullLiteral",
                _ => "integerLiteral",
            };
            Ok(format!("({tag})"))
        }
        Expr::Str(string_expr) => string(string_expr),
        Expr::Object(object_expr) => object(object_expr.syntax()),
        Expr::Array(array) => {
            let mut parts = Vec::new();
            for element in array.syntax().children_with_tokens() {
                match element {
                    SyntaxElement::Node(node) if node.kind() == SyntaxKind::ARRAY_ITEM => {
                        push_leading_comments(&node, &mut parts);
                        let mut inner = Vec::new();
                        for child in node.children() {
                            inner.push(node_shape(&child)?);
                        }
                        parts.push(wrap("arrayItem", &inner, " "));
                        push_trailing_comments(&node, &mut parts);
                    }
                    SyntaxElement::Node(node) => push_subtree_comments(&node, &mut parts),
                    SyntaxElement::Token(token) => match token.kind() {
                        SyntaxKind::LEFT_BRACKET => {
                            push_comment_markers(token.trailing_trivia(), &mut parts);
                        }
                        SyntaxKind::RIGHT_BRACKET => {
                            push_comment_markers(token.leading_trivia(), &mut parts);
                        }
                        _ => {}
                    },
                }
            }
            Ok(wrap("array", &parts, "\n"))
        }
        Expr::For(for_expr) => {
            let mut parts = Vec::new();
            match for_expr.binder() {
                Some(ForBinder::Local(_)) => {
                    parts.push("(localVariable (identifier))".to_owned());
                }
                Some(ForBinder::Block(block)) => {
                    let mut inner = Vec::new();
                    if block.index_variable().is_some() {
                        inner.push("(localVariable (identifier))".to_owned());
                    }
                    if block.item_variable().is_some() {
                        inner.push("(localVariable (identifier))".to_owned());
                    }
                    parts.push(wrap("forVariableBlock", &inner, " "));
                }
                None => {}
            }
            if let Some(iterable) = for_expr.iterable() {
                parts.push(expr(&iterable)?);
            }
            if let Some(body) = for_expr.body() {
                parts.push(node_shape(&body)?);
            }
            Ok(wrap("for", &parts, " "))
        }
        Expr::Paren(paren) => {
            let mut parts = Vec::new();
            if let Some(inner) = paren.expression() {
                parts.push(expr(&inner)?);
            }
            Ok(wrap("parenthesizedExpression", &parts, " "))
        }
        Expr::FunctionCall(call) => {
            let mut parts = Vec::new();
            if let Some(callee) = call.callee() {
                parts.push(expr(&callee)?);
            }
            for argument in call.arguments() {
                let mut inner = Vec::new();
                if let Some(value) = argument.expression() {
                    inner.push(expr(&value)?);
                }
                parts.push(wrap("functionArgument", &inner, " "));
            }
            Ok(wrap("functionCall", &parts, " "))
        }
        Expr::VariableAccess(_) => Ok("(variableAccess (identifier))".to_owned()),
        Expr::PropertyAccess(access) => {
            let mut parts = Vec::new();
            if let Some(base) = access.base() {
                parts.push(expr(&base)?);
            }
            parts.push("(identifier)".to_owned());
            Ok(wrap("propertyAccess", &parts, " "))
        }
        Expr::ArrayAccess(access) => {
            let mut parts = Vec::new();
            if let Some(base) = access.base() {
                parts.push(expr(&base)?);
            }
            if let Some(index) = access.index() {
                parts.push(expr(&index)?);
            }
            Ok(wrap("arrayAccess", &parts, " "))
        }
        Expr::ResourceAccess(access) => {
            let mut parts = Vec::new();
            if let Some(base) = access.base() {
                parts.push(expr(&base)?);
            }
            parts.push("(identifier)".to_owned());
            Ok(wrap("resourceAccess", &parts, " "))
        }
        Expr::Binary(binary) => {
            let mut parts = Vec::new();
            if let Some(lhs) = binary.lhs() {
                parts.push(expr(&lhs)?);
            }
            if let Some(rhs) = binary.rhs() {
                parts.push(expr(&rhs)?);
            }
            Ok(wrap("binaryOperation", &parts, " "))
        }
        Expr::Unary(unary) => {
            let mut parts = Vec::new();
            if let Some(operand) = unary.operand() {
                parts.push(expr(&operand)?);
            }
            Ok(wrap("unaryOperation", &parts, " "))
        }
        Expr::Ternary(ternary) => {
            let mut parts = Vec::new();
            if let Some(condition) = ternary.condition() {
                parts.push(expr(&condition)?);
            }
            if let Some(true_branch) = ternary.true_branch() {
                parts.push(expr(&true_branch)?);
            }
            if let Some(false_branch) = ternary.false_branch() {
                parts.push(expr(&false_branch)?);
            }
            Ok(wrap("ternaryOperation", &parts, " "))
        }
    }
}

/// Pieces with literal text become `(stringLiteral)` markers, interpolated
/// expressions render in place, and comments hanging off the closing piece
/// follow the string.
fn string(string_expr: &StringExpr) -> Result<String, UnsupportedNodeKind> {
    let mut parts = Vec::new();

    for element in string_expr.syntax().children_with_tokens() {
        match element {
            SyntaxElement::Token(token) if string_piece_kind(token.kind()) => {
                if StringExpr::segment_has_text(&token) {
                    parts.push("(stringLiteral)".to_owned());
                }
            }
            SyntaxElement::Node(node) => parts.push(node_shape(&node)?),
            SyntaxElement::Token(_) => {}
        }
    }

    let mut rendered = wrap("string", &parts, " ");

    if let Some(closing) = string_expr.closing_token() {
        let mut comments = Vec::new();
        push_comment_markers(closing.leading_trivia(), &mut comments);
        push_comment_markers(closing.trailing_trivia(), &mut comments);
        for comment in comments {
            rendered.push(' ');
            rendered.push_str(&comment);
        }
    }

    Ok(rendered)
}

fn object(node: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    let mut parts = Vec::new();

    for element in node.children_with_tokens() {
        match element {
            SyntaxElement::Node(child) => match child.kind() {
                SyntaxKind::OBJECT_PROPERTY => {
                    push_leading_comments(&child, &mut parts);
                    parts.push(object_property(&child)?);
                    push_trailing_comments(&child, &mut parts);
                }
                SyntaxKind::RESOURCE_DECL => {
                    push_leading_comments(&child, &mut parts);
                    parts.push(statement(&child)?);
                    push_trailing_comments(&child, &mut parts);
                }
                _ => push_subtree_comments(&child, &mut parts),
            },
            SyntaxElement::Token(token) => match token.kind() {
                SyntaxKind::LEFT_BRACE => {
                    push_comment_markers(token.trailing_trivia(), &mut parts);
                }
                SyntaxKind::RIGHT_BRACE => {
                    push_comment_markers(token.leading_trivia(), &mut parts);
                }
                _ => {}
            },
        }
    }

    Ok(wrap("object", &parts, " "))
}

fn object_property(node: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    let property =
        ObjectProperty::cast(node.clone()).ok_or(UnsupportedNodeKind { kind: node.kind() })?;

    let mut parts = Vec::new();

    match property.key() {
        Some(ObjectKey::Name(_)) => parts.push("(identifier)".to_owned()),
        Some(ObjectKey::Str(key)) => parts.push(string(&key)?),
        None => {}
    }

    if let Some(value) = property.value() {
        parts.push(expr(&value)?);
    }

    Ok(wrap("objectProperty", &parts, " "))
}

fn if_condition(node: &SyntaxNode) -> Result<String, UnsupportedNodeKind> {
    let condition =
        IfCondition::cast(node.clone()).ok_or(UnsupportedNodeKind { kind: node.kind() })?;

    let mut parts = Vec::new();

    if let Some(paren) = condition.condition() {
        parts.push(expr(&Expr::Paren(paren))?);
    }

    if let Some(body) = condition.body() {
        parts.push(object(body.syntax())?);
    }

    Ok(wrap("ifCondition", &parts, " "))
}
