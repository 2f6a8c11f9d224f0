use crate::{
    expr::{self, Acceptor as ExprAcceptor, Expr},
    stmt::{self, Acceptor as StmtAcceptor, Program, Stmt},
};

/// Renders the tree as S-expressions, one top-level statement per line.
#[derive(Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn print_program(&mut self, program: &Program) -> String {
        program
            .statements
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        stmt.accept(self)
    }

    pub fn print_expr(&mut self, expr: &Expr) -> String {
        expr.accept(self)
    }

    fn parenthesize(&mut self, name: &str, parts: Vec<String>) -> String {
        let mut s = "(".to_string() + name;
        for part in parts {
            s += " ";
            s += &part;
        }
        s += ")";
        s
    }
}

impl stmt::Visitor for AstPrinter {
    type ReturnType = String;

    fn visit_expression_stmt(&mut self, stmt: &stmt::ExpressionStatement) -> Self::ReturnType {
        let expr = self.print_expr(&stmt.expr);
        self.parenthesize("expr", vec![expr])
    }

    fn visit_ingredient_stmt(&mut self, stmt: &stmt::IngredientDecl) -> Self::ReturnType {
        let mut parts = vec![stmt.name.name.clone()];
        if let Some(initializer) = &stmt.initializer {
            parts.push(self.print_expr(initializer));
        }
        self.parenthesize("ingredient", parts)
    }

    fn visit_taste_stmt(&mut self, stmt: &stmt::TasteStatement) -> Self::ReturnType {
        let expr = self.print_expr(&stmt.expr);
        self.parenthesize("taste", vec![expr])
    }

    fn visit_block_stmt(&mut self, stmt: &stmt::Block) -> Self::ReturnType {
        let parts = stmt.statements.iter().map(|s| self.print_stmt(s)).collect();
        self.parenthesize("block", parts)
    }

    fn visit_if_stmt(&mut self, stmt: &stmt::IfStatement) -> Self::ReturnType {
        let mut parts = vec![
            self.print_expr(&stmt.cond),
            self.print_stmt(&stmt.then_branch),
        ];
        if let Some(else_branch) = &stmt.else_branch {
            parts.push(self.print_stmt(else_branch));
        }
        self.parenthesize("if", parts)
    }

    fn visit_while_stmt(&mut self, stmt: &stmt::WhileStatement) -> Self::ReturnType {
        let parts = vec![self.print_expr(&stmt.cond), self.print_stmt(&stmt.body)];
        self.parenthesize("while", parts)
    }

    fn visit_function_stmt(&mut self, stmt: &stmt::FunctionDecl) -> Self::ReturnType {
        let params = stmt
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let body = stmt.body.accept(self);
        self.parenthesize(
            "recipe",
            vec![stmt.name.name.clone(), format!("({params})"), body],
        )
    }
}

impl expr::Visitor for AstPrinter {
    type ReturnType = String;

    fn visit_assign_expr(&mut self, expr: &expr::Assignment) -> Self::ReturnType {
        let value = self.print_expr(&expr.value);
        self.parenthesize("=", vec![expr.target.name.clone(), value])
    }

    fn visit_binary_expr(&mut self, expr: &expr::BinaryExpr) -> Self::ReturnType {
        let parts = vec![self.print_expr(&expr.left), self.print_expr(&expr.right)];
        self.parenthesize(expr.op.symbol(), parts)
    }

    fn visit_unary_expr(&mut self, expr: &expr::UnaryExpr) -> Self::ReturnType {
        let operand = self.print_expr(&expr.operand);
        self.parenthesize(expr.op.symbol(), vec![operand])
    }

    fn visit_literal_expr(&mut self, expr: &expr::Literal) -> Self::ReturnType {
        expr.value.to_string()
    }

    fn visit_identifier_expr(&mut self, expr: &expr::Identifier) -> Self::ReturnType {
        expr.name.clone()
    }

    fn visit_call_expr(&mut self, expr: &expr::CallExpr) -> Self::ReturnType {
        let mut parts = vec![self.print_expr(&expr.callee)];
        parts.extend(expr.args.iter().map(|arg| self.print_expr(arg)));
        self.parenthesize("call", parts)
    }
}
