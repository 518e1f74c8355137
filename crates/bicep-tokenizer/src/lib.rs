//! Lexer for the Bicep configuration language.
//!
//! Tokenization is total: unrecognized characters become single `UNKNOWN`
//! tokens and the stream always ends with `EOF`. String literals run in a
//! nested sub-mode, alternating between literal pieces and full expression
//! lexing inside `${ }` interpolations.

mod cursor;

pub use bicep_syntax::SyntaxKind;
use bicep_syntax::SyntaxKind::*;
use bicep_syntax::{GreenTrivia, TriviaPiece, TriviaPieceKind};
use cursor::{Cursor, EOF_CHAR};
use text_size::{TextLen, TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: GreenTrivia,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: GreenTrivia,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: GreenTrivia::empty(),
        trailing: GreenTrivia::empty(),
    };

    /// Range covered by the token and its attached trivia.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(
            self.kind_range.start() - self.leading.len(),
            self.kind_range.end() + self.trailing.len(),
        )
    }
}

pub struct Tokenizer<'src> {
    text: &'src str,
    cursor: Cursor<'src>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    /// Brace depth per open interpolation, innermost last. A `}` at depth
    /// zero resumes string scanning instead of closing an object.
    interpolations: Vec<u32>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(text: &'src str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
            interpolations: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    fn offset(&self) -> TextSize {
        self.text.text_len() - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let len = self.cursor.pos_within_token();
        TextRange::at(self.offset() - len, len)
    }

    fn text(&self) -> &'src str {
        &self.text[self.range()]
    }

    pub fn next_token(&mut self) -> Token {
        self.trivia(false);
        let trailing_start = self.trivia_pieces.len();
        let (kind, kind_range) = self.syntax_kind();
        self.trivia(true);

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = GreenTrivia::new(leading);
        let trailing = GreenTrivia::new(trailing);

        self.trivia_pieces.clear();
        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    /// Scans a trivia run. Trailing trivia stops before the first newline;
    /// the newline leads the next token instead.
    fn trivia(&mut self, trailing: bool) {
        loop {
            let kind = match self.cursor.peek() {
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::MultiLineComment
                }
                '\n' | '\r' => {
                    if trailing {
                        break;
                    }
                    self.cursor.advance_while(|c| matches!(c, '\n' | '\r'));
                    TriviaPieceKind::Newline
                }
                first_char => {
                    if first_char.is_whitespace() {
                        self.cursor
                            .advance_while(|c| c.is_whitespace() && !matches!(c, '\n' | '\r'));
                        TriviaPieceKind::Whitespace
                    } else {
                        break;
                    }
                }
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    /// Consumes `/* ... */`, stopping at the first closing delimiter.
    fn block_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                EOF_CHAR => break,
                '*' if self.cursor.matches('/') => {
                    self.cursor.advance();
                    break;
                }
                _ => {}
            }
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            ',' => COMMA,
            '.' => DOT,
            '@' => AT,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '/' => SLASH,
            '%' => PERCENT,
            ':' => {
                if self.cursor.matches(':') {
                    self.cursor.advance();
                    DOUBLE_COLON
                } else {
                    COLON
                }
            }
            '?' => {
                if self.cursor.matches('?') {
                    self.cursor.advance();
                    DOUBLE_QUESTION
                } else {
                    QUESTION
                }
            }
            '=' => match self.cursor.peek() {
                '=' => {
                    self.cursor.advance();
                    EQUALS
                }
                '~' => {
                    self.cursor.advance();
                    EQUALS_INSENSITIVE
                }
                _ => ASSIGN,
            },
            '!' => match self.cursor.peek() {
                '=' => {
                    self.cursor.advance();
                    NOT_EQUALS
                }
                '~' => {
                    self.cursor.advance();
                    NOT_EQUALS_INSENSITIVE
                }
                _ => EXCLAMATION,
            },
            '<' => {
                if self.cursor.matches('=') {
                    self.cursor.advance();
                    LESS_THAN_EQ
                } else {
                    LESS_THAN
                }
            }
            '>' => {
                if self.cursor.matches('=') {
                    self.cursor.advance();
                    GREATER_THAN_EQ
                } else {
                    GREATER_THAN
                }
            }
            '&' => {
                if self.cursor.matches('&') {
                    self.cursor.advance();
                    LOGICAL_AND
                } else {
                    UNKNOWN
                }
            }
            '|' => {
                if self.cursor.matches('|') {
                    self.cursor.advance();
                    LOGICAL_OR
                } else {
                    UNKNOWN
                }
            }
            '{' => {
                if let Some(depth) = self.interpolations.last_mut() {
                    *depth += 1;
                }
                LEFT_BRACE
            }
            '}' => {
                if let Some(depth) = self.interpolations.pop() {
                    if depth == 0 {
                        self.string_piece(false)
                    } else {
                        self.interpolations.push(depth - 1);
                        RIGHT_BRACE
                    }
                } else {
                    RIGHT_BRACE
                }
            }
            '\'' => {
                if self.cursor.matches('\'') && self.cursor.second() == '\'' {
                    self.multiline_string()
                } else {
                    self.string_piece(true)
                }
            }
            '0'..='9' => {
                self.cursor.advance_while(|c| c.is_ascii_digit());
                INT_NUMBER
            }
            'A'..='Z' | 'a'..='z' | '_' => {
                self.cursor.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                SyntaxKind::from_keyword(self.text()).unwrap_or(IDENT)
            }
            EOF_CHAR => EOF,
            _ => UNKNOWN,
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    /// Scans one string piece. `from_quote` distinguishes a piece opened by
    /// `'` from one resuming at the `}` of an interpolation. An unterminated
    /// piece (newline or EOF) degrades to `UNKNOWN`.
    fn string_piece(&mut self, from_quote: bool) -> SyntaxKind {
        loop {
            match self.cursor.peek() {
                EOF_CHAR | '\n' | '\r' => return UNKNOWN,
                '\\' => {
                    self.cursor.advance();
                    self.escape_sequence();
                }
                '\'' => {
                    self.cursor.advance();
                    return if from_quote { STRING_COMPLETE } else { STRING_RIGHT_PIECE };
                }
                '$' if self.cursor.second() == '{' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.interpolations.push(0);
                    return if from_quote { STRING_LEFT_PIECE } else { STRING_MIDDLE_PIECE };
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Consumes one escape after the backslash. `\u{HEX}` takes the whole
    /// bracketed run; anything else takes a single character.
    fn escape_sequence(&mut self) {
        match self.cursor.advance() {
            'u' if self.cursor.matches('{') => {
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_hexdigit());
                if self.cursor.matches('}') {
                    self.cursor.advance();
                }
            }
            _ => {}
        }
    }

    /// `'''...'''`, opaque, no interpolation.
    fn multiline_string(&mut self) -> SyntaxKind {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                EOF_CHAR => return UNKNOWN,
                '\'' if self.cursor.matches('\'') && self.cursor.second() == '\'' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    return MULTILINE_STRING;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.kind_range]
    }

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        let mut tokenizer = Tokenizer::new(text);
        let mut kinds = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == EOF {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    fn full_texts<'a>(text: &'a str) -> Vec<&'a str> {
        let mut tokenizer = Tokenizer::new(text);
        let mut texts = Vec::new();
        loop {
            let token = tokenizer.next_token();
            texts.push(&text[token.full_range()]);
            if token.kind == EOF {
                break;
            }
        }
        texts
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("param var output resource module import targetScope existing foo _bar"),
            vec![
                PARAM_KW, VAR_KW, OUTPUT_KW, RESOURCE_KW, MODULE_KW, IMPORT_KW, TARGET_SCOPE_KW,
                EXISTING_KW, IDENT, IDENT
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("== != =~ !~ <= >= && || ?? :: = < > ! ? : . + - * / %"),
            vec![
                EQUALS,
                NOT_EQUALS,
                EQUALS_INSENSITIVE,
                NOT_EQUALS_INSENSITIVE,
                LESS_THAN_EQ,
                GREATER_THAN_EQ,
                LOGICAL_AND,
                LOGICAL_OR,
                DOUBLE_QUESTION,
                DOUBLE_COLON,
                ASSIGN,
                LESS_THAN,
                GREATER_THAN,
                EXCLAMATION,
                QUESTION,
                COLON,
                DOT,
                PLUS,
                MINUS,
                STAR,
                SLASH,
                PERCENT
            ]
        );
    }

    #[test]
    fn unrecognized_characters_become_single_unknown_tokens() {
        assert_eq!(kinds("#^`"), vec![UNKNOWN, UNKNOWN, UNKNOWN]);
        assert_eq!(kinds("& |"), vec![UNKNOWN, UNKNOWN]);
    }

    #[test]
    fn complete_string() {
        let text = "'hello'";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, STRING_COMPLETE);
        assert_eq!(token_text(&token, text), "'hello'");

        assert_eq!(tokenizer.next_token().kind, EOF);
    }

    #[test]
    fn empty_string_has_length_two() {
        let text = "''";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, STRING_COMPLETE);
        assert_eq!(token.kind_range.len(), TextSize::new(2));
    }

    #[test]
    fn interpolated_string_pieces() {
        let text = "'a${b}c'";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, STRING_LEFT_PIECE);
        assert_eq!(token_text(&token, text), "'a${");

        let token = tokenizer.next_token();
        assert_eq!(token.kind, IDENT);
        assert_eq!(token_text(&token, text), "b");

        let token = tokenizer.next_token();
        assert_eq!(token.kind, STRING_RIGHT_PIECE);
        assert_eq!(token_text(&token, text), "}c'");

        assert_eq!(tokenizer.next_token().kind, EOF);
    }

    #[test]
    fn adjacent_interpolations_produce_a_middle_piece() {
        let text = "'${a}${b}'";
        assert_eq!(
            kinds(text),
            vec![STRING_LEFT_PIECE, IDENT, STRING_MIDDLE_PIECE, IDENT, STRING_RIGHT_PIECE]
        );

        let mut tokenizer = Tokenizer::new(text);
        let left = tokenizer.next_token();
        assert_eq!(left.kind_range.len(), TextSize::new(3)); // '${ with no text
        tokenizer.next_token();
        let middle = tokenizer.next_token();
        assert_eq!(token_text(&middle, text), "}${");
        assert_eq!(middle.kind_range.len(), TextSize::new(3)); // }${ with no text
        tokenizer.next_token();
        let right = tokenizer.next_token();
        assert_eq!(token_text(&right, text), "}'");
        assert_eq!(right.kind_range.len(), TextSize::new(2));
    }

    #[test]
    fn braces_inside_interpolation_stay_balanced() {
        let text = "'${ {a: b}.a }'";
        assert_eq!(
            kinds(text),
            vec![
                STRING_LEFT_PIECE,
                LEFT_BRACE,
                IDENT,
                COLON,
                IDENT,
                RIGHT_BRACE,
                DOT,
                IDENT,
                STRING_RIGHT_PIECE
            ]
        );
    }

    #[test]
    fn nested_string_inside_interpolation() {
        let text = "'${'x'}'";
        assert_eq!(
            kinds(text),
            vec![STRING_LEFT_PIECE, STRING_COMPLETE, STRING_RIGHT_PIECE]
        );
    }

    #[test]
    fn escape_sequences_stay_inside_the_piece() {
        let text = r"'a\'b\$\u{20}c'";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, STRING_COMPLETE);
        assert_eq!(token_text(&token, text), text);
    }

    #[test]
    fn escaped_dollar_does_not_open_interpolation() {
        assert_eq!(kinds(r"'\${a}'"), vec![STRING_COMPLETE]);
    }

    #[test]
    fn unterminated_string_degrades_to_unknown() {
        assert_eq!(kinds("'abc\nx"), vec![UNKNOWN, IDENT]);
        assert_eq!(kinds("'abc"), vec![UNKNOWN]);
    }

    #[test]
    fn multiline_string() {
        let text = "'''\nline 'one'\n'''";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, MULTILINE_STRING);
        assert_eq!(token_text(&token, text), text);
    }

    #[test]
    fn line_comment_attaches_as_trailing_trivia() {
        let text = "x // note\ny";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, IDENT);
        let trailing: Vec<_> =
            token.trailing.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(
            trailing,
            vec![TriviaPieceKind::Whitespace, TriviaPieceKind::SingleLineComment]
        );

        let token = tokenizer.next_token();
        assert_eq!(token.kind, IDENT);
        let leading: Vec<_> = token.leading.pieces().iter().map(|piece| piece.kind).collect();
        assert_eq!(leading, vec![TriviaPieceKind::Newline]);
    }

    #[test]
    fn block_comment_is_non_greedy() {
        let text = "/* a */ x /* b */";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, IDENT);
        assert_eq!(token.leading.pieces()[0].kind, TriviaPieceKind::MultiLineComment);
        assert_eq!(token.leading.pieces()[0].len, TextSize::new(7));
        let comment_count = token
            .trailing
            .pieces()
            .iter()
            .filter(|piece| piece.kind.is_comment())
            .count();
        assert_eq!(comment_count, 1);
    }

    #[test]
    fn round_trip_reassembles_the_source() {
        let sources = [
            "var x = 1 + 2 * 3\n",
            "// leading comment\nparam foo string = 'it${x}s'\n",
            "resource r 'My.Rp/t@2020-01-01' existing = {\n  name: 'x' /* inline */\n}\n",
            "output o int = foo ?? bar[0].baz\n",
            "bad $$ input ~~ here",
            "'unterminated\nvar ok = true",
        ];

        for source in sources {
            let mut tokenizer = Tokenizer::new(source);
            let mut rebuilt = String::new();
            loop {
                let token = tokenizer.next_token();
                rebuilt.push_str(&source[token.full_range()]);
                if token.kind == EOF {
                    break;
                }
            }
            assert_eq!(rebuilt, source, "lossless round-trip failed for {source:?}");
        }
    }

    #[test]
    fn totality_on_garbage() {
        let source = "\u{1}\u{2}#\\🦀";
        let texts = full_texts(source);
        assert_eq!(texts.concat(), source);
    }

    #[test]
    fn eof_carries_final_trivia() {
        let text = "var x = 1\n// trailing\n";
        let mut tokenizer = Tokenizer::new(text);
        let mut last = tokenizer.next_token();
        while last.kind != EOF {
            last = tokenizer.next_token();
        }
        let has_comment = last.leading.pieces().iter().any(|piece| piece.kind.is_comment());
        assert!(has_comment, "expected the file-final comment on the EOF token");
    }
}
