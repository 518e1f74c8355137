//! Typed wrappers over the raw syntax tree.
//!
//! Wrappers are thin: each holds a `SyntaxNode` and exposes its children by
//! kind and position. `cast` returns `None` when the kind does not match, so
//! consumers stay total over malformed trees.

use crate::SyntaxKind::*;
use crate::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

pub trait AstNode: Sized {
    fn cast(syntax: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn cast(syntax: SyntaxNode) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Program, PROGRAM);
ast_node!(TargetScopeDecl, TARGET_SCOPE_DECL);
ast_node!(ParamDecl, PARAM_DECL);
ast_node!(ParamDefaultValue, PARAM_DEFAULT_VALUE);
ast_node!(VarDecl, VAR_DECL);
ast_node!(OutputDecl, OUTPUT_DECL);
ast_node!(ResourceDecl, RESOURCE_DECL);
ast_node!(ModuleDecl, MODULE_DECL);
ast_node!(ImportDecl, IMPORT_DECL);
ast_node!(Decorator, DECORATOR);
ast_node!(Name, NAME);
ast_node!(TypeRef, TYPE);
ast_node!(Literal, LITERAL);
ast_node!(StringExpr, STRING);
ast_node!(Object, OBJECT);
ast_node!(ObjectProperty, OBJECT_PROPERTY);
ast_node!(Array, ARRAY);
ast_node!(ArrayItem, ARRAY_ITEM);
ast_node!(ForExpr, FOR_EXPR);
ast_node!(ForVariableBlock, FOR_VARIABLE_BLOCK);
ast_node!(LocalVariable, LOCAL_VARIABLE);
ast_node!(IfCondition, IF_CONDITION);
ast_node!(ParenExpr, PAREN_EXPR);
ast_node!(FunctionCall, FUNCTION_CALL);
ast_node!(FunctionArgument, FUNCTION_ARGUMENT);
ast_node!(VariableAccess, VARIABLE_ACCESS);
ast_node!(PropertyAccess, PROPERTY_ACCESS);
ast_node!(ArrayAccess, ARRAY_ACCESS);
ast_node!(ResourceAccess, RESOURCE_ACCESS);
ast_node!(BinaryExpr, BINARY_EXPR);
ast_node!(UnaryExpr, UNARY_EXPR);
ast_node!(TernaryExpr, TERNARY_EXPR);

fn nth_expr(syntax: &SyntaxNode, n: usize) -> Option<Expr> {
    syntax.children().filter_map(Expr::cast).nth(n)
}

/// First token usable as a name; keywords are contextual identifiers.
fn name_token(syntax: &SyntaxNode) -> Option<SyntaxToken> {
    syntax.tokens().find(|token| token.kind() == IDENT || token.kind().is_keyword())
}

impl Program {
    pub fn declarations(&self) -> impl Iterator<Item = Declaration> + '_ {
        self.0.children().filter_map(Declaration::cast)
    }

    pub fn eof_token(&self) -> Option<SyntaxToken> {
        self.0.tokens().find(|token| token.kind() == EOF)
    }
}

/// One top-level declaration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    TargetScope(TargetScopeDecl),
    Param(ParamDecl),
    Var(VarDecl),
    Output(OutputDecl),
    Resource(ResourceDecl),
    Module(ModuleDecl),
    Import(ImportDecl),
}

impl AstNode for Declaration {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let declaration = match syntax.kind() {
            TARGET_SCOPE_DECL => Self::TargetScope(TargetScopeDecl(syntax)),
            PARAM_DECL => Self::Param(ParamDecl(syntax)),
            VAR_DECL => Self::Var(VarDecl(syntax)),
            OUTPUT_DECL => Self::Output(OutputDecl(syntax)),
            RESOURCE_DECL => Self::Resource(ResourceDecl(syntax)),
            MODULE_DECL => Self::Module(ModuleDecl(syntax)),
            IMPORT_DECL => Self::Import(ImportDecl(syntax)),
            _ => return None,
        };

        Some(declaration)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::TargetScope(it) => it.syntax(),
            Self::Param(it) => it.syntax(),
            Self::Var(it) => it.syntax(),
            Self::Output(it) => it.syntax(),
            Self::Resource(it) => it.syntax(),
            Self::Module(it) => it.syntax(),
            Self::Import(it) => it.syntax(),
        }
    }
}

impl Declaration {
    pub fn decorators(&self) -> impl Iterator<Item = Decorator> + '_ {
        self.syntax().children().filter_map(Decorator::cast)
    }
}

impl TargetScopeDecl {
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl ParamDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn default_value(&self) -> Option<ParamDefaultValue> {
        self.0.children().find_map(ParamDefaultValue::cast)
    }
}

impl ParamDefaultValue {
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl VarDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl OutputDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn ty(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl ResourceDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// The resource type string, e.g. `'My.Rp/kind@2020-01-01'`.
    pub fn type_string(&self) -> Option<StringExpr> {
        self.0.children().find_map(StringExpr::cast)
    }

    pub fn existing_token(&self) -> Option<SyntaxToken> {
        self.0.tokens().find(|token| token.kind() == EXISTING_KW)
    }

    /// The body: an object, an `if` condition, or a loop.
    pub fn body(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .filter(|node| matches!(node.kind(), OBJECT | IF_CONDITION | FOR_EXPR | ARRAY))
            .last()
    }
}

impl ModuleDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    /// The module path string.
    pub fn path(&self) -> Option<StringExpr> {
        self.0.children().find_map(StringExpr::cast)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .filter(|node| matches!(node.kind(), OBJECT | IF_CONDITION | FOR_EXPR | ARRAY))
            .last()
    }
}

impl ImportDecl {
    pub fn name(&self) -> Option<Name> {
        self.0.children().filter_map(Name::cast).next()
    }

    pub fn source(&self) -> Option<Name> {
        self.0.children().filter_map(Name::cast).nth(1)
    }

    pub fn config(&self) -> Option<Object> {
        self.0.children().find_map(Object::cast)
    }
}

impl Decorator {
    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

impl TypeRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Str(StringExpr),
    Object(Object),
    Array(Array),
    For(ForExpr),
    Paren(ParenExpr),
    FunctionCall(FunctionCall),
    VariableAccess(VariableAccess),
    PropertyAccess(PropertyAccess),
    ArrayAccess(ArrayAccess),
    ResourceAccess(ResourceAccess),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Ternary(TernaryExpr),
}

impl AstNode for Expr {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        let expr = match syntax.kind() {
            LITERAL => Self::Literal(Literal(syntax)),
            STRING => Self::Str(StringExpr(syntax)),
            OBJECT => Self::Object(Object(syntax)),
            ARRAY => Self::Array(Array(syntax)),
            FOR_EXPR => Self::For(ForExpr(syntax)),
            PAREN_EXPR => Self::Paren(ParenExpr(syntax)),
            FUNCTION_CALL => Self::FunctionCall(FunctionCall(syntax)),
            VARIABLE_ACCESS => Self::VariableAccess(VariableAccess(syntax)),
            PROPERTY_ACCESS => Self::PropertyAccess(PropertyAccess(syntax)),
            ARRAY_ACCESS => Self::ArrayAccess(ArrayAccess(syntax)),
            RESOURCE_ACCESS => Self::ResourceAccess(ResourceAccess(syntax)),
            BINARY_EXPR => Self::Binary(BinaryExpr(syntax)),
            UNARY_EXPR => Self::Unary(UnaryExpr(syntax)),
            TERNARY_EXPR => Self::Ternary(TernaryExpr(syntax)),
            _ => return None,
        };

        Some(expr)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Literal(it) => it.syntax(),
            Self::Str(it) => it.syntax(),
            Self::Object(it) => it.syntax(),
            Self::Array(it) => it.syntax(),
            Self::For(it) => it.syntax(),
            Self::Paren(it) => it.syntax(),
            Self::FunctionCall(it) => it.syntax(),
            Self::VariableAccess(it) => it.syntax(),
            Self::PropertyAccess(it) => it.syntax(),
            Self::ArrayAccess(it) => it.syntax(),
            Self::ResourceAccess(it) => it.syntax(),
            Self::Binary(it) => it.syntax(),
            Self::Unary(it) => it.syntax(),
            Self::Ternary(it) => it.syntax(),
        }
    }
}

impl Literal {
    /// The literal token: `null`, `true`, `false`, or an integer.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0.tokens().next()
    }
}

impl StringExpr {
    /// The last piece token; comments trailing it belong to the string.
    pub fn closing_token(&self) -> Option<SyntaxToken> {
        self.0.tokens().last()
    }

    pub fn interpolations(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    /// Whether a piece token contains any literal text between its
    /// delimiters. Emptiness rides on the span length: the delimiters of
    /// each piece kind have a fixed width.
    pub fn segment_has_text(token: &SyntaxToken) -> bool {
        let len = token.text_trimmed().len();
        let delimiters = match token.kind() {
            STRING_COMPLETE => 2,
            STRING_LEFT_PIECE => 3,
            STRING_MIDDLE_PIECE => 3,
            STRING_RIGHT_PIECE => 2,
            MULTILINE_STRING => 6,
            _ => return false,
        };
        len > delimiters
    }
}

impl Object {
    pub fn properties(&self) -> impl Iterator<Item = ObjectProperty> + '_ {
        self.0.children().filter_map(ObjectProperty::cast)
    }

    /// Nested resources are admitted wherever an object property is.
    pub fn nested_resources(&self) -> impl Iterator<Item = ResourceDecl> + '_ {
        self.0.children().filter_map(ResourceDecl::cast)
    }
}

/// An object property key: a bare name or an interpolable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKey {
    Name(SyntaxToken),
    Str(StringExpr),
}

impl ObjectProperty {
    pub fn key(&self) -> Option<ObjectKey> {
        for element in self.0.children_with_tokens() {
            match element {
                SyntaxElement::Token(token) if token.kind() == COLON => return None,
                SyntaxElement::Token(token)
                    if token.kind() == IDENT || token.kind().is_keyword() =>
                {
                    return Some(ObjectKey::Name(token));
                }
                SyntaxElement::Node(node) => {
                    return StringExpr::cast(node).map(ObjectKey::Str);
                }
                SyntaxElement::Token(_) => {}
            }
        }
        None
    }

    pub fn value(&self) -> Option<Expr> {
        let mut seen_colon = false;
        for element in self.0.children_with_tokens() {
            match element {
                SyntaxElement::Token(token) if token.kind() == COLON => seen_colon = true,
                SyntaxElement::Node(node) if seen_colon => return Expr::cast(node),
                _ => {}
            }
        }
        None
    }
}

impl Array {
    pub fn items(&self) -> impl Iterator<Item = ArrayItem> + '_ {
        self.0.children().filter_map(ArrayItem::cast)
    }
}

impl ArrayItem {
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

/// The loop binder: a single item variable or an `(index, item)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForBinder {
    Local(LocalVariable),
    Block(ForVariableBlock),
}

impl ForExpr {
    pub fn binder(&self) -> Option<ForBinder> {
        self.0.children().find_map(|node| match node.kind() {
            LOCAL_VARIABLE => Some(ForBinder::Local(LocalVariable(node))),
            FOR_VARIABLE_BLOCK => Some(ForBinder::Block(ForVariableBlock(node))),
            _ => None,
        })
    }

    /// The iterable always precedes the body, so it is the first child that
    /// is not part of the binder, even when the body is missing.
    pub fn iterable(&self) -> Option<Expr> {
        self.non_binder_children().next().and_then(Expr::cast)
    }

    /// The loop body: a plain expression or an `if`-guarded object.
    pub fn body(&self) -> Option<SyntaxNode> {
        self.non_binder_children().nth(1)
    }

    fn non_binder_children(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0
            .children()
            .filter(|node| !matches!(node.kind(), LOCAL_VARIABLE | FOR_VARIABLE_BLOCK))
    }
}

impl ForVariableBlock {
    pub fn index_variable(&self) -> Option<LocalVariable> {
        self.0.children().filter_map(LocalVariable::cast).next()
    }

    pub fn item_variable(&self) -> Option<LocalVariable> {
        self.0.children().filter_map(LocalVariable::cast).nth(1)
    }
}

impl LocalVariable {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

impl IfCondition {
    pub fn condition(&self) -> Option<ParenExpr> {
        self.0.children().find_map(ParenExpr::cast)
    }

    pub fn body(&self) -> Option<Object> {
        self.0.children().find_map(Object::cast)
    }
}

impl ParenExpr {
    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl FunctionCall {
    /// The callee: a variable access for plain calls, a property access for
    /// instance calls.
    pub fn callee(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn arguments(&self) -> impl Iterator<Item = FunctionArgument> + '_ {
        self.0.children().filter_map(FunctionArgument::cast)
    }
}

impl FunctionArgument {
    pub fn expression(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl VariableAccess {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

impl PropertyAccess {
    pub fn base(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn property_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

impl ArrayAccess {
    pub fn base(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn index(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

impl ResourceAccess {
    pub fn base(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn resource_token(&self) -> Option<SyntaxToken> {
        name_token(&self.0)
    }
}

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0.tokens().next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }
}

impl UnaryExpr {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        self.0.tokens().next()
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }
}

impl TernaryExpr {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.0, 0)
    }

    pub fn true_branch(&self) -> Option<Expr> {
        nth_expr(&self.0, 1)
    }

    pub fn false_branch(&self) -> Option<Expr> {
        nth_expr(&self.0, 2)
    }
}
