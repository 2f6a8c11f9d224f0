use crate::{literal::LiteralValue, token::Span};

/// Expression AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign(Assignment),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Literal(Literal),
    Identifier(Identifier),
    Call(CallExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterEqual,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Remainder,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "-" => Some(UnaryOp::Negate),
            "!" => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Assign(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::Identifier(e) => e.span,
            Expr::Call(e) => e.span,
        }
    }

    /// Same node, covering `span` instead.
    pub fn with_span(mut self, span: Span) -> Self {
        match &mut self {
            Expr::Assign(e) => e.span = span,
            Expr::Binary(e) => e.span = span,
            Expr::Unary(e) => e.span = span,
            Expr::Literal(e) => e.span = span,
            Expr::Identifier(e) => e.span = span,
            Expr::Call(e) => e.span = span,
        }
        self
    }
}

/// Expressions visitor.
pub trait Visitor {
    type ReturnType;

    fn visit_assign_expr(&mut self, expr: &Assignment) -> Self::ReturnType;
    fn visit_binary_expr(&mut self, expr: &BinaryExpr) -> Self::ReturnType;
    fn visit_unary_expr(&mut self, expr: &UnaryExpr) -> Self::ReturnType;
    fn visit_literal_expr(&mut self, expr: &Literal) -> Self::ReturnType;
    fn visit_identifier_expr(&mut self, expr: &Identifier) -> Self::ReturnType;
    fn visit_call_expr(&mut self, expr: &CallExpr) -> Self::ReturnType;
}

/// Expression visitor acceptor.
pub trait Acceptor {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType;
}

impl Acceptor for Expr {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::ReturnType {
        match self {
            Expr::Assign(e) => visitor.visit_assign_expr(e),
            Expr::Binary(e) => visitor.visit_binary_expr(e),
            Expr::Unary(e) => visitor.visit_unary_expr(e),
            Expr::Literal(e) => visitor.visit_literal_expr(e),
            Expr::Identifier(e) => visitor.visit_identifier_expr(e),
            Expr::Call(e) => visitor.visit_call_expr(e),
        }
    }
}
