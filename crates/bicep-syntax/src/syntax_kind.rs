#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    DOT,
    COLON,
    DOUBLE_COLON,
    ASSIGN,
    AT,
    QUESTION,
    DOUBLE_QUESTION,

    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    EXCLAMATION,
    LESS_THAN,
    LESS_THAN_EQ,
    GREATER_THAN,
    GREATER_THAN_EQ,
    EQUALS,
    NOT_EQUALS,
    EQUALS_INSENSITIVE,
    NOT_EQUALS_INSENSITIVE,
    LOGICAL_AND,
    LOGICAL_OR,

    TARGET_SCOPE_KW,
    PARAM_KW,
    VAR_KW,
    OUTPUT_KW,
    RESOURCE_KW,
    MODULE_KW,
    IMPORT_KW,
    FROM_KW,
    EXISTING_KW,
    IF_KW,
    FOR_KW,
    IN_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    IDENT,
    INT_NUMBER,

    STRING_COMPLETE,
    STRING_LEFT_PIECE,
    STRING_MIDDLE_PIECE,
    STRING_RIGHT_PIECE,
    MULTILINE_STRING,

    UNKNOWN,
    EOF,

    PROGRAM,
    TARGET_SCOPE_DECL,
    PARAM_DECL,
    PARAM_DEFAULT_VALUE,
    VAR_DECL,
    OUTPUT_DECL,
    RESOURCE_DECL,
    MODULE_DECL,
    IMPORT_DECL,
    DECORATOR,
    NAME,
    TYPE,

    LITERAL,
    STRING,
    OBJECT,
    OBJECT_PROPERTY,
    ARRAY,
    ARRAY_ITEM,
    FOR_EXPR,
    FOR_VARIABLE_BLOCK,
    LOCAL_VARIABLE,
    IF_CONDITION,
    PAREN_EXPR,
    FUNCTION_CALL,
    FUNCTION_ARGUMENT,
    VARIABLE_ACCESS,
    PROPERTY_ACCESS,
    ARRAY_ACCESS,
    RESOURCE_ACCESS,
    BINARY_EXPR,
    UNARY_EXPR,
    TERNARY_EXPR,

    ERROR,
    TOMBSTONE,
}

impl SyntaxKind {
    /// Maps an identifier-shaped lexeme to its keyword kind, if any.
    pub fn from_keyword(text: &str) -> Option<Self> {
        use SyntaxKind::*;

        let kind = match text {
            "targetScope" => TARGET_SCOPE_KW,
            "param" => PARAM_KW,
            "var" => VAR_KW,
            "output" => OUTPUT_KW,
            "resource" => RESOURCE_KW,
            "module" => MODULE_KW,
            "import" => IMPORT_KW,
            "from" => FROM_KW,
            "existing" => EXISTING_KW,
            "if" => IF_KW,
            "for" => FOR_KW,
            "in" => IN_KW,
            "true" => TRUE_KW,
            "false" => FALSE_KW,
            "null" => NULL_KW,
            _ => return None,
        };

        Some(kind)
    }

    /// All keywords double as identifiers in name position.
    pub fn is_keyword(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            TARGET_SCOPE_KW
                | PARAM_KW
                | VAR_KW
                | OUTPUT_KW
                | RESOURCE_KW
                | MODULE_KW
                | IMPORT_KW
                | FROM_KW
                | EXISTING_KW
                | IF_KW
                | FOR_KW
                | IN_KW
                | TRUE_KW
                | FALSE_KW
                | NULL_KW
        )
    }

    pub fn is_string_piece(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            STRING_COMPLETE | STRING_LEFT_PIECE | STRING_MIDDLE_PIECE | STRING_RIGHT_PIECE
        )
    }

    /// Tokens that can open a string expression.
    pub fn starts_string(self) -> bool {
        use SyntaxKind::*;

        matches!(self, STRING_COMPLETE | STRING_LEFT_PIECE | MULTILINE_STRING)
    }
}
