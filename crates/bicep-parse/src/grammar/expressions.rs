use bicep_syntax::SyntaxKind;

use super::declarations;
use crate::parser::{CompletedMarker, Parser};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

/// Binding power of prefix `!` and `-`; tighter than every binary operator,
/// looser than the postfix chain.
const UNARY_PRECEDENCE: u8 = 110;

struct BinaryOp {
    kind: SyntaxKind,
    precedence: u8,
    assoc: Assoc,
}

/// `?` is the ternary conditional, handled specially in [`expr_bp`]; it sits
/// in this table because its left operand binds like any binary operator's.
const BINARY_OPS: &[BinaryOp] = &[
    BinaryOp { kind: SyntaxKind::QUESTION, precedence: 30, assoc: Assoc::Right },
    BinaryOp { kind: SyntaxKind::DOUBLE_QUESTION, precedence: 35, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::LOGICAL_OR, precedence: 40, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::LOGICAL_AND, precedence: 50, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::EQUALS, precedence: 70, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::NOT_EQUALS, precedence: 70, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::EQUALS_INSENSITIVE, precedence: 70, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::NOT_EQUALS_INSENSITIVE, precedence: 70, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::LESS_THAN, precedence: 80, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::LESS_THAN_EQ, precedence: 80, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::GREATER_THAN, precedence: 80, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::GREATER_THAN_EQ, precedence: 80, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::PLUS, precedence: 90, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::MINUS, precedence: 90, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::STAR, precedence: 100, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::SLASH, precedence: 100, assoc: Assoc::Left },
    BinaryOp { kind: SyntaxKind::PERCENT, precedence: 100, assoc: Assoc::Left },
];

fn binary_op(kind: SyntaxKind) -> Option<&'static BinaryOp> {
    BINARY_OPS.iter().find(|op| op.kind == kind)
}

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    expr_bp(p, 0)
}

fn expr_bp(p: &mut Parser<'_>, min_precedence: u8) -> Option<CompletedMarker> {
    if !p.enter_expr() {
        return None;
    }

    let Some(mut lhs) = unary(p) else {
        p.leave_expr();
        return None;
    };

    loop {
        let Some(op) = binary_op(p.peek_kind()) else { break };
        if op.precedence < min_precedence {
            break;
        }

        let m = lhs.precede(p);
        p.advance();

        if op.kind == SyntaxKind::QUESTION {
            expr_bp(p, 0);
            p.expect(SyntaxKind::COLON);
            expr_bp(p, op.precedence);
            lhs = m.complete(p, SyntaxKind::TERNARY_EXPR);
        } else {
            let next_min = match op.assoc {
                Assoc::Left => op.precedence + 1,
                Assoc::Right => op.precedence,
            };
            expr_bp(p, next_min);
            lhs = m.complete(p, SyntaxKind::BINARY_EXPR);
        }
    }

    p.leave_expr();
    Some(lhs)
}

fn unary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.peek_kind() {
        SyntaxKind::EXCLAMATION | SyntaxKind::MINUS => {
            let m = p.start();
            p.advance();
            expr_bp(p, UNARY_PRECEDENCE);
            Some(m.complete(p, SyntaxKind::UNARY_EXPR))
        }
        _ => call(p),
    }
}

/// A primary expression followed by any chain of `.`, `[]`, `::` and `()`.
pub(crate) fn call(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary(p)?;

    loop {
        match p.peek_kind() {
            SyntaxKind::DOT => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                lhs = m.complete(p, SyntaxKind::PROPERTY_ACCESS);
            }
            SyntaxKind::DOUBLE_COLON => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                lhs = m.complete(p, SyntaxKind::RESOURCE_ACCESS);
            }
            SyntaxKind::LEFT_BRACKET => {
                let m = lhs.precede(p);
                p.advance();
                expr(p);
                p.expect(SyntaxKind::RIGHT_BRACKET);
                lhs = m.complete(p, SyntaxKind::ARRAY_ACCESS);
            }
            SyntaxKind::LEFT_PAREN => {
                let m = lhs.precede(p);
                p.advance();

                while !p.at(SyntaxKind::RIGHT_PAREN) && !p.at(SyntaxKind::EOF) {
                    let arg = p.start();
                    expr(p);
                    arg.complete(p, SyntaxKind::FUNCTION_ARGUMENT);

                    if !p.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }

                p.expect(SyntaxKind::RIGHT_PAREN);
                lhs = m.complete(p, SyntaxKind::FUNCTION_CALL);
            }
            _ => break,
        }
    }

    Some(lhs)
}

fn member_name(p: &mut Parser<'_>) {
    if p.at_name() {
        p.advance();
    } else {
        p.error("expected a member name");
    }
}

fn primary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.peek_kind() {
        SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::NULL_KW
        | SyntaxKind::INT_NUMBER => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, SyntaxKind::LITERAL))
        }
        kind if kind.starts_string() => string(p),
        SyntaxKind::LEFT_PAREN => Some(paren_expr(p)),
        SyntaxKind::LEFT_BRACE => object(p),
        SyntaxKind::LEFT_BRACKET => array_or_for(p),
        SyntaxKind::IDENT => {
            let m = p.start();
            p.advance();
            Some(m.complete(p, SyntaxKind::VARIABLE_ACCESS))
        }
        SyntaxKind::EOF => {
            p.error("expected an expression");
            None
        }
        _ => {
            p.error_and_bump("expected an expression");
            None
        }
    }
}

/// Either a single complete piece or a left piece followed by alternating
/// interpolated expressions and middle pieces, closed by a right piece.
pub(crate) fn string(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();

    match p.peek_kind() {
        SyntaxKind::STRING_COMPLETE | SyntaxKind::MULTILINE_STRING => p.advance(),
        SyntaxKind::STRING_LEFT_PIECE => {
            p.advance();
            loop {
                expr(p);
                match p.peek_kind() {
                    SyntaxKind::STRING_MIDDLE_PIECE => p.advance(),
                    SyntaxKind::STRING_RIGHT_PIECE => {
                        p.advance();
                        break;
                    }
                    _ => {
                        p.error("unterminated string interpolation");
                        break;
                    }
                }
            }
        }
        _ => unreachable!("callers check for a string start"),
    }

    Some(m.complete(p, SyntaxKind::STRING))
}

fn paren_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    expr(p);
    p.expect(SyntaxKind::RIGHT_PAREN);
    m.complete(p, SyntaxKind::PAREN_EXPR)
}

pub(crate) fn object(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    // Nested resources recurse through here without touching expr_bp, so
    // objects count against the nesting limit themselves.
    if !p.enter_expr() {
        return None;
    }

    let m = p.start();
    p.advance();

    while !p.at(SyntaxKind::RIGHT_BRACE) && !p.at(SyntaxKind::EOF) {
        match p.peek_kind() {
            SyntaxKind::RESOURCE_KW => {
                let m = p.start();
                declarations::resource(p, m);
            }
            kind if kind == SyntaxKind::IDENT || kind.is_keyword() || kind.starts_string() => {
                object_property(p);
            }
            _ => p.error_and_bump("expected an object property"),
        }
    }

    p.expect(SyntaxKind::RIGHT_BRACE);
    let completed = m.complete(p, SyntaxKind::OBJECT);
    p.leave_expr();
    Some(completed)
}

fn object_property(p: &mut Parser<'_>) {
    let m = p.start();

    if p.peek_kind().starts_string() {
        string(p);
    } else {
        p.advance();
    }

    p.expect(SyntaxKind::COLON);
    expr(p);
    m.complete(p, SyntaxKind::OBJECT_PROPERTY);
}

pub(crate) fn array_or_for(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    p.advance();

    if p.at(SyntaxKind::FOR_KW) {
        p.advance();
        for_binder(p);
        p.expect(SyntaxKind::IN_KW);
        expr(p);
        p.expect(SyntaxKind::COLON);

        if p.at(SyntaxKind::IF_KW) {
            if_condition(p);
        } else {
            expr(p);
        }

        p.expect(SyntaxKind::RIGHT_BRACKET);
        return Some(m.complete(p, SyntaxKind::FOR_EXPR));
    }

    // Once the nesting limit trips, expr() stops consuming tokens, so the
    // loop must stop with it.
    while !p.at(SyntaxKind::RIGHT_BRACKET) && !p.at(SyntaxKind::EOF) && !p.at_recursion_limit() {
        let item = p.start();
        expr(p);
        item.complete(p, SyntaxKind::ARRAY_ITEM);
    }

    p.expect(SyntaxKind::RIGHT_BRACKET);
    Some(m.complete(p, SyntaxKind::ARRAY))
}

/// `for x in ...` or `for (item, index) in ...`.
fn for_binder(p: &mut Parser<'_>) {
    if p.at(SyntaxKind::LEFT_PAREN) {
        let m = p.start();
        p.advance();
        local_variable(p);
        p.expect(SyntaxKind::COMMA);
        local_variable(p);
        p.expect(SyntaxKind::RIGHT_PAREN);
        m.complete(p, SyntaxKind::FOR_VARIABLE_BLOCK);
    } else {
        local_variable(p);
    }
}

fn local_variable(p: &mut Parser<'_>) {
    if p.at_name() {
        let m = p.start();
        p.advance();
        m.complete(p, SyntaxKind::LOCAL_VARIABLE);
    } else {
        p.error("expected a loop variable");
    }
}

pub(crate) fn if_condition(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    p.advance();

    if p.at(SyntaxKind::LEFT_PAREN) {
        paren_expr(p);
    } else {
        p.error("expected a parenthesized condition");
    }

    if p.at(SyntaxKind::LEFT_BRACE) {
        object(p);
    } else {
        p.error("expected an object body");
    }

    Some(m.complete(p, SyntaxKind::IF_CONDITION))
}
