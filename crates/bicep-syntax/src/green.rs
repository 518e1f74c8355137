//! Shared, immutable tree internals.
//!
//! A token's text includes its attached trivia, so the concatenation of all
//! tokens in document order is the original source.

use text_size::TextSize;
use triomphe::{Arc, ThinArc};

use crate::{SyntaxKind, TriviaPiece};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    pub fn into_node(self) -> Option<N> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<T> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(token),
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&T> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(token),
        }
    }
}

pub type Green = NodeOrToken<GreenNode, GreenToken>;

impl Green {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    pub fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct NodeData {
    kind: SyntaxKind,
    children: Box<[Green]>,
    text_len: TextSize,
}

/// An interior tree node owning its children.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GreenNode {
    data: Arc<NodeData>,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: Vec<Green>) -> Self {
        let text_len = children.iter().map(Green::text_len).sum();
        Self { data: Arc::new(NodeData { kind, children: children.into_boxed_slice(), text_len }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn children(&self) -> &[Green] {
        &self.data.children
    }

    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }
}

#[derive(Debug, Eq, Hash, PartialEq)]
struct TokenData {
    leading: GreenTrivia,
    kind: SyntaxKind,
    text: Box<str>,
    trailing: GreenTrivia,
}

/// A leaf token carrying its full text, attached trivia included.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GreenToken {
    data: Arc<TokenData>,
}

impl GreenToken {
    pub fn new(leading: GreenTrivia, kind: SyntaxKind, text: &str, trailing: GreenTrivia) -> Self {
        Self { data: Arc::new(TokenData { leading, kind, text: text.into(), trailing }) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    /// Full token text, leading and trailing trivia included.
    pub fn text(&self) -> &str {
        &self.data.text
    }

    /// Token text with the attached trivia stripped.
    pub fn text_trimmed(&self) -> &str {
        let start: usize = self.data.leading.len().into();
        let end = self.data.text.len() - usize::from(self.data.trailing.len());
        &self.data.text[start..end]
    }

    pub fn text_len(&self) -> TextSize {
        TextSize::new(self.data.text.len() as u32)
    }

    /// Length of the token itself, trivia excluded.
    pub fn text_trimmed_len(&self) -> TextSize {
        self.text_len() - self.data.leading.len() - self.data.trailing.len()
    }

    pub fn leading(&self) -> &GreenTrivia {
        &self.data.leading
    }

    pub fn trailing(&self) -> &GreenTrivia {
        &self.data.trailing
    }
}

/// Trivia run attached to one side of a token.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct GreenTrivia {
    ptr: Option<ThinArc<TextSize, TriviaPiece>>,
}

impl std::fmt::Debug for GreenTrivia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GreenTrivia")
            .field("pieces", &self.pieces())
            .field("total_len", &self.len())
            .finish()
    }
}

impl GreenTrivia {
    pub fn new(pieces: &[TriviaPiece]) -> Self {
        if pieces.is_empty() {
            return Self::empty();
        }
        let total_len = pieces.iter().map(|piece| piece.len).sum();
        Self { ptr: Some(ThinArc::from_header_and_slice(total_len, pieces)) }
    }

    pub const fn empty() -> Self {
        Self { ptr: None }
    }

    pub fn len(&self) -> TextSize {
        match self.ptr {
            None => TextSize::new(0),
            Some(ref ptr) => ptr.header.header,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        match &self.ptr {
            None => &[],
            Some(ptr) => &ptr.slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::TriviaPieceKind;

    use super::*;

    fn whitespace(len: u32) -> GreenTrivia {
        GreenTrivia::new(&[TriviaPiece::new(TriviaPieceKind::Whitespace, len.into())])
    }

    #[test]
    fn token_text() {
        let token =
            GreenToken::new(whitespace(3), SyntaxKind::VAR_KW, "\n\t var \t\t", whitespace(3));

        assert_eq!("\n\t var \t\t", token.text());
        assert_eq!("var", token.text_trimmed());
        assert_eq!(TextSize::new(3), token.text_trimmed_len());
    }

    #[test]
    fn node_text_len_sums_children() {
        let name = GreenToken::new(GreenTrivia::empty(), SyntaxKind::IDENT, "abc ", whitespace(1));
        let node = GreenNode::new(SyntaxKind::NAME, vec![Green::Token(name)]);

        assert_eq!(TextSize::new(4), node.text_len());
    }
}
