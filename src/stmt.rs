use crate::{
    expr::{Expr, Identifier},
    token::Span,
};

/// Root of a parsed compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Statement AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expression(ExpressionStatement),
    Ingredient(IngredientDecl),
    Taste(TasteStatement),
    Block(Block),
    If(IfStatement),
    While(WhileStatement),
    Function(FunctionDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Expr,
    pub span: Span,
}

/// `ingredient name = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientDecl {
    pub name: Identifier,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// `taste value;`
#[derive(Debug, Clone, PartialEq)]
pub struct TasteStatement {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// `recipe name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Identifier,
    pub params: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expression(s) => s.span,
            Stmt::Ingredient(s) => s.span,
            Stmt::Taste(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Function(s) => s.span,
        }
    }
}

/// Statements visitor.
pub trait Visitor {
    type ReturnType;

    fn visit_expression_stmt(&mut self, stmt: &ExpressionStatement) -> Self::ReturnType;
    fn visit_ingredient_stmt(&mut self, stmt: &IngredientDecl) -> Self::ReturnType;
    fn visit_taste_stmt(&mut self, stmt: &TasteStatement) -> Self::ReturnType;
    fn visit_block_stmt(&mut self, stmt: &Block) -> Self::ReturnType;
    fn visit_if_stmt(&mut self, stmt: &IfStatement) -> Self::ReturnType;
    fn visit_while_stmt(&mut self, stmt: &WhileStatement) -> Self::ReturnType;
    fn visit_function_stmt(&mut self, stmt: &FunctionDecl) -> Self::ReturnType;
}

/// Statement visitor acceptor.
pub trait Acceptor {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType;
}

impl Acceptor for Stmt {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        match self {
            Stmt::Expression(s) => visitor.visit_expression_stmt(s),
            Stmt::Ingredient(s) => visitor.visit_ingredient_stmt(s),
            Stmt::Taste(s) => visitor.visit_taste_stmt(s),
            Stmt::Block(s) => s.accept(visitor),
            Stmt::If(s) => s.accept(visitor),
            Stmt::While(s) => s.accept(visitor),
            Stmt::Function(s) => s.accept(visitor),
        }
    }
}

impl Acceptor for Block {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        visitor.visit_block_stmt(self)
    }
}
impl Acceptor for IfStatement {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        visitor.visit_if_stmt(self)
    }
}
impl Acceptor for WhileStatement {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        visitor.visit_while_stmt(self)
    }
}
impl Acceptor for FunctionDecl {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        visitor.visit_function_stmt(self)
    }
}
