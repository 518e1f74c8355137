//! Recursive descent parser producing a lossless syntax tree.
//!
//! Parsing is total over arbitrary input: every byte of the source ends up
//! in the tree, malformed stretches included, and problems are reported as
//! [`Diagnostic`]s on the side. The single hard failure is
//! [`RecursionLimitExceeded`] for pathologically nested expressions.

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

use bicep_errors::Diagnostic;
use bicep_syntax::{GreenNode, SyntaxNode};
use text_size::TextRange;
use thiserror::Error;

/// Maximum expression nesting depth before the parse is abandoned.
pub const RECURSION_LIMIT: u32 = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expression nesting is too deep (limit {limit})")]
pub struct RecursionLimitExceeded {
    pub limit: u32,
    /// Span of the token at which the limit was first hit.
    pub range: TextRange,
}

/// Result of a successful (possibly error-recovered) parse.
#[derive(Debug)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<Diagnostic>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

pub fn file(text: &str) -> Result<Parse, RecursionLimitExceeded> {
    let mut parser = parser::Parser::new(text);
    grammar::declarations::program(&mut parser);
    let (green, errors) = parser.finish()?;
    Ok(Parse { green, errors })
}
