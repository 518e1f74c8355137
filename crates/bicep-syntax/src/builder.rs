//! Stack builder turning parser events into a green tree.

use text_size::{TextRange, TextSize};

use crate::{Green, GreenNode, GreenToken, GreenTrivia, SyntaxKind};

/// Builds a green tree bottom-up while the parser replays its events.
pub struct Builder<'src> {
    text: &'src str,
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<Green>,
}

impl<'src> Builder<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text, parents: Vec::with_capacity(16), children: Vec::with_capacity(64) }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    /// Adds a token; `kind_range` covers the token itself, the attached
    /// trivia extends it on both sides.
    pub fn token(
        &mut self,
        leading: GreenTrivia,
        kind: SyntaxKind,
        kind_range: TextRange,
        trailing: GreenTrivia,
    ) {
        let start = kind_range.start() - leading.len();
        let end = kind_range.end() + trailing.len();
        let text = &self.text[TextRange::new(start, end)];
        self.children.push(Green::Token(GreenToken::new(leading, kind, text, trailing)));
    }

    pub fn finish_node(&mut self) {
        let (kind, first_child) = self.parents.pop().expect("no started node to finish");
        let children = self.children.drain(first_child..).collect();
        self.children.push(Green::Node(GreenNode::new(kind, children)));
    }

    /// Finishes building and returns the root node.
    pub fn finish(mut self) -> GreenNode {
        assert!(self.parents.is_empty(), "unfinished nodes remain");
        assert_eq!(self.children.len(), 1, "expected exactly one root node");

        match self.children.pop() {
            Some(Green::Node(root)) => {
                debug_assert_eq!(root.text_len(), TextSize::new(self.text.len() as u32));
                root
            }
            _ => panic!("root must be a node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_cover_the_source() {
        let text = "var x";
        let mut builder = Builder::new(text);

        builder.start_node(SyntaxKind::PROGRAM);
        builder.token(
            GreenTrivia::empty(),
            SyntaxKind::VAR_KW,
            TextRange::new(0.into(), 3.into()),
            GreenTrivia::new(&[crate::TriviaPiece::new(
                crate::TriviaPieceKind::Whitespace,
                1.into(),
            )]),
        );
        builder.token(
            GreenTrivia::empty(),
            SyntaxKind::IDENT,
            TextRange::new(4.into(), 5.into()),
            GreenTrivia::empty(),
        );
        builder.finish_node();

        let root = builder.finish();
        assert_eq!(root.text_len(), TextSize::new(5));

        let texts: Vec<_> = root
            .children()
            .iter()
            .filter_map(|child| child.as_token().map(GreenToken::text))
            .collect();
        assert_eq!(texts.concat(), text);
    }
}
