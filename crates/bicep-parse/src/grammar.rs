pub(crate) mod declarations;
pub(crate) mod expressions;

use bicep_syntax::SyntaxKind;

use crate::parser::Parser;

/// Parses a declared name into a `NAME` node. Keywords are accepted since
/// they are contextual.
fn name(p: &mut Parser<'_>) {
    if p.at_name() {
        let m = p.start();
        p.advance();
        m.complete(p, SyntaxKind::NAME);
    } else {
        p.error("expected a name");
    }
}

/// Parses a type annotation such as `string` or `int`.
fn type_ref(p: &mut Parser<'_>) {
    if p.at_name() {
        let m = p.start();
        p.advance();
        m.complete(p, SyntaxKind::TYPE);
    } else {
        p.error("expected a type");
    }
}
