use bicep_syntax::{SyntaxKind, SyntaxSet};

use super::{expressions, name, type_ref};
use crate::parser::{Marker, Parser};

/// Tokens a botched declaration recovers at.
const DECLARATION_START: SyntaxSet = SyntaxSet::new([
    SyntaxKind::TARGET_SCOPE_KW,
    SyntaxKind::PARAM_KW,
    SyntaxKind::VAR_KW,
    SyntaxKind::OUTPUT_KW,
    SyntaxKind::RESOURCE_KW,
    SyntaxKind::MODULE_KW,
    SyntaxKind::IMPORT_KW,
    SyntaxKind::AT,
]);

pub(crate) fn program(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(SyntaxKind::EOF) {
        declaration(p);
    }

    p.bump_eof();
    m.complete(p, SyntaxKind::PROGRAM);
}

fn declaration(p: &mut Parser<'_>) {
    let m = p.start();

    while p.at(SyntaxKind::AT) {
        decorator(p);
    }

    match p.peek_kind() {
        SyntaxKind::TARGET_SCOPE_KW => target_scope(p, m),
        SyntaxKind::PARAM_KW => param(p, m),
        SyntaxKind::VAR_KW => var(p, m),
        SyntaxKind::OUTPUT_KW => output(p, m),
        SyntaxKind::RESOURCE_KW => resource(p, m),
        SyntaxKind::MODULE_KW => module(p, m),
        SyntaxKind::IMPORT_KW => import(p, m),
        _ => {
            p.error("expected a declaration");
            p.advance();
            while !p.at(SyntaxKind::EOF) && !p.at_set(&DECLARATION_START) && !p.at_line_start() {
                p.advance();
            }
            m.complete(p, SyntaxKind::ERROR);
        }
    }
}

fn decorator(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();

    match expressions::call(p) {
        Some(call) if call.kind(p) == SyntaxKind::FUNCTION_CALL => {}
        _ => p.error("decorators must be function calls"),
    }

    m.complete(p, SyntaxKind::DECORATOR);
}

fn target_scope(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    p.expect(SyntaxKind::ASSIGN);
    expressions::expr(p);
    m.complete(p, SyntaxKind::TARGET_SCOPE_DECL);
}

fn param(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    type_ref(p);

    if p.at(SyntaxKind::ASSIGN) {
        let default = p.start();
        p.advance();
        expressions::expr(p);
        default.complete(p, SyntaxKind::PARAM_DEFAULT_VALUE);
    }

    m.complete(p, SyntaxKind::PARAM_DECL);
}

fn var(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    p.expect(SyntaxKind::ASSIGN);
    expressions::expr(p);
    m.complete(p, SyntaxKind::VAR_DECL);
}

fn output(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    type_ref(p);
    p.expect(SyntaxKind::ASSIGN);
    expressions::expr(p);
    m.complete(p, SyntaxKind::OUTPUT_DECL);
}

/// Also reachable from inside object bodies, where resources nest.
pub(crate) fn resource(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    string_value(p);
    p.eat(SyntaxKind::EXISTING_KW);
    p.expect(SyntaxKind::ASSIGN);
    body(p);
    m.complete(p, SyntaxKind::RESOURCE_DECL);
}

fn module(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    string_value(p);
    p.expect(SyntaxKind::ASSIGN);
    body(p);
    m.complete(p, SyntaxKind::MODULE_DECL);
}

fn import(p: &mut Parser<'_>, m: Marker) {
    p.advance();
    name(p);
    p.expect(SyntaxKind::FROM_KW);
    name(p);

    if p.at(SyntaxKind::LEFT_BRACE) {
        expressions::object(p);
    } else {
        p.error("expected a configuration object");
    }

    m.complete(p, SyntaxKind::IMPORT_DECL);
}

fn string_value(p: &mut Parser<'_>) {
    if p.peek_kind().starts_string() {
        expressions::string(p);
    } else {
        p.error("expected a string");
    }
}

/// The `= ...` right hand side of resources and modules: an object, an
/// `if` conditional, or a `[...]` loop.
fn body(p: &mut Parser<'_>) {
    match p.peek_kind() {
        SyntaxKind::IF_KW => {
            expressions::if_condition(p);
        }
        SyntaxKind::LEFT_BRACE => {
            expressions::object(p);
        }
        SyntaxKind::LEFT_BRACKET => {
            expressions::array_or_for(p);
        }
        _ => p.error("expected an object, conditional, or loop body"),
    }
}
