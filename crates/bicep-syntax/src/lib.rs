//! Lossless, immutable syntax tree for the Bicep configuration language.
//!
//! The green tree owns the source text token by token, trivia included, so
//! concatenating every token reproduces the input exactly. The red layer adds
//! absolute offsets on top without copying anything.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod green;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a green tree from parser events.
pub use builder::Builder;
/// Shared, immutable tree internals.
pub use green::{Green, GreenNode, GreenToken, GreenTrivia, NodeOrToken};
/// Offset-positioned views over the green tree.
pub use syntax::{SyntaxElement, SyntaxNode, SyntaxToken};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
