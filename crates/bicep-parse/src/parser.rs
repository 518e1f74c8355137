use bicep_errors::Diagnostic;
use bicep_syntax::{Builder, GreenNode, SyntaxKind, SyntaxSet, TriviaPieceKind};
use bicep_tokenizer::{Token, Tokenizer};
use drop_bomb::DropBomb;
use text_size::TextRange;

use crate::{RECURSION_LIMIT, RecursionLimitExceeded};

pub(crate) struct Parser<'src> {
    text: &'src str,
    tokenizer: Tokenizer<'src>,
    events: Vec<Event>,
    errors: Vec<Diagnostic>,
    expr_depth: u32,
    recursion_limit_hit: Option<TextRange>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(text: &'src str) -> Self {
        Self {
            text,
            tokenizer: Tokenizer::new(text),
            events: Vec::new(),
            errors: Vec::new(),
            expr_depth: 0,
            recursion_limit_hit: None,
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    /// Keywords are contextual, so any of them works in name position.
    pub(crate) fn at_name(&self) -> bool {
        self.peek_kind() == SyntaxKind::IDENT || self.peek_kind().is_keyword()
    }

    /// Whether the current token is the first on its line.
    pub(crate) fn at_line_start(&self) -> bool {
        self.tokenizer
            .peek()
            .leading
            .pieces()
            .iter()
            .any(|piece| piece.kind == TriviaPieceKind::Newline)
    }

    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    /// Materializes the EOF token so file-final trivia stays in the tree.
    pub(crate) fn bump_eof(&mut self) {
        debug_assert!(self.at(SyntaxKind::EOF));
        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.error(format!("expected {kind:?}"));
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(Diagnostic::error(message, self.tokenizer.peek().kind_range));
    }

    pub(crate) fn error_and_bump(&mut self, message: &str) {
        self.error(message);
        let m = self.start();
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    /// Guards one level of expression nesting. Returns `false`, once, when
    /// the limit is hit; the whole parse is then reported as failed.
    pub(crate) fn enter_expr(&mut self) -> bool {
        if self.expr_depth >= RECURSION_LIMIT {
            if self.recursion_limit_hit.is_none() {
                self.recursion_limit_hit = Some(self.tokenizer.peek().kind_range);
            }
            return false;
        }

        self.expr_depth += 1;
        true
    }

    pub(crate) fn leave_expr(&mut self) {
        self.expr_depth -= 1;
    }

    /// Sticky: once the limit has been hit anywhere, the parse is doomed to
    /// return an error, so loops relying on expression progress can stop.
    pub(crate) fn at_recursion_limit(&self) -> bool {
        self.recursion_limit_hit.is_some()
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn finish(self) -> Result<(GreenNode, Vec<Diagnostic>), RecursionLimitExceeded> {
        if let Some(range) = self.recursion_limit_hit {
            return Err(RecursionLimitExceeded { limit: RECURSION_LIMIT, range });
        }

        let Self { text, tokenizer: _, mut events, errors, .. } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, kind_range, trailing }) => {
                    builder.token(leading, kind, kind_range, trailing);
                }
            }
        }

        Ok((builder.finish(), errors))
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Self::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be completed") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    /// Wraps the completed node into a new parent, e.g. an operand into a
    /// binary expression.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }

    pub(crate) fn kind(&self, p: &Parser<'_>) -> SyntaxKind {
        match &p.events[self.pos as usize] {
            Event::Start { kind, .. } => *kind,
            _ => unreachable!(),
        }
    }
}
