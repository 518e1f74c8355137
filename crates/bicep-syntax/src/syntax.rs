//! Offset-positioned views over the green tree.
//!
//! A `SyntaxNode` is a green pointer plus the absolute offset of its first
//! byte; cloning one is two machine words. Traversal is strictly downward,
//! which is all the single-pass consumers here need.

use std::fmt;

use text_size::{TextRange, TextSize};

use crate::{GreenNode, GreenToken, GreenTrivia, NodeOrToken, SyntaxKind};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    green: GreenNode,
    offset: TextSize,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SyntaxToken {
    green: GreenToken,
    offset: TextSize,
}

pub type SyntaxElement = NodeOrToken<SyntaxNode, SyntaxToken>;

impl SyntaxNode {
    pub fn new_root(green: GreenNode) -> Self {
        Self { green, offset: TextSize::new(0) }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Range covered by this node, attached trivia included.
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    /// Range covered by this node without the outermost trivia.
    pub fn trimmed_range(&self) -> TextRange {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => {
                TextRange::new(first.trimmed_range().start(), last.trimmed_range().end())
            }
            _ => self.text_range(),
        }
    }

    pub fn children_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + '_ {
        let mut offset = self.offset;
        self.green.children().iter().map(move |child| {
            let child_offset = offset;
            offset += child.text_len();
            match child {
                NodeOrToken::Node(node) => {
                    SyntaxElement::Node(Self { green: node.clone(), offset: child_offset })
                }
                NodeOrToken::Token(token) => SyntaxElement::Token(SyntaxToken {
                    green: token.clone(),
                    offset: child_offset,
                }),
            }
        })
    }

    pub fn children(&self) -> impl Iterator<Item = Self> + '_ {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.children_with_tokens().filter_map(SyntaxElement::into_token)
    }

    pub fn first_token(&self) -> Option<SyntaxToken> {
        let mut element = self.children_with_tokens().next()?;
        loop {
            match element {
                SyntaxElement::Node(node) => element = node.children_with_tokens().next()?,
                SyntaxElement::Token(token) => return Some(token),
            }
        }
    }

    pub fn last_token(&self) -> Option<SyntaxToken> {
        let mut element = self.children_with_tokens().last()?;
        loop {
            match element {
                SyntaxElement::Node(node) => element = node.children_with_tokens().last()?,
                SyntaxElement::Token(token) => return Some(token),
            }
        }
    }

    /// Reconstructs the source text covered by this node, trivia included.
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.green.text_len().into());
        collect_text(self, &mut text);
        text
    }

    /// Indented tree rendering used by parser snapshot tests.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        dump_node(self, 0, &mut out);
        out
    }
}

fn collect_text(node: &SyntaxNode, out: &mut String) {
    for element in node.children_with_tokens() {
        match element {
            SyntaxElement::Node(node) => collect_text(&node, out),
            SyntaxElement::Token(token) => out.push_str(token.text()),
        }
    }
}

fn dump_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    use std::fmt::Write as _;

    let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = depth * 2);
    for element in node.children_with_tokens() {
        match element {
            SyntaxElement::Node(node) => dump_node(&node, depth + 1, out),
            SyntaxElement::Token(token) => {
                let _ = writeln!(
                    out,
                    "{:indent$}{:?} {:?}",
                    "",
                    token.kind(),
                    token.text_trimmed(),
                    indent = (depth + 1) * 2
                );
            }
        }
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl SyntaxToken {
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    /// Full token text, attached trivia included.
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Token text with the attached trivia stripped.
    pub fn text_trimmed(&self) -> &str {
        self.green.text_trimmed()
    }

    pub fn leading_trivia(&self) -> &GreenTrivia {
        self.green.leading()
    }

    pub fn trailing_trivia(&self) -> &GreenTrivia {
        self.green.trailing()
    }

    /// Range covered by this token, attached trivia included.
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    /// Range of the token itself, trivia excluded.
    pub fn trimmed_range(&self) -> TextRange {
        TextRange::at(self.offset + self.green.leading().len(), self.green.text_trimmed_len())
    }
}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.trimmed_range(), self.text_trimmed())
    }
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(node) => node.kind(),
            Self::Token(token) => token.kind(),
        }
    }
}
