//! # Parser Module / 语法分析模块
//!
//! Recursive-descent parser: token stream → [`Program`]. Nesting of blocks
//! and sub-expressions is capped at [`MAX_NESTING`].
//!
//! 递归下降语法分析器：词法单元流 → [`Program`]。块与子表达式的嵌套深度
//! 上限为 [`MAX_NESTING`]。

use std::rc::Rc;

use crate::interp::ast::*;
use crate::interp::error::{EvalError, EvalResult};
use crate::interp::lexer::{tokenize, Keyword, Token, TokenKind};

/// Parse a complete source text (a module body or an example's source).
pub fn parse_program(source: &str) -> EvalResult<Program> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_program()
}

/// Deepest nesting of blocks and sub-expressions a source may contain.
pub const MAX_NESTING: usize = 100;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Current nesting, including operators already folded into the tree.
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn parse_program(mut self) -> EvalResult<Program> {
        let mut body = Vec::new();
        while !self.at(&TokenKind::Eof) {
            if self.eat(&TokenKind::Newline) {
                continue;
            }
            body.extend(self.parse_statement()?);
        }
        let docstring = docstring_of(&body);
        Ok(Program { body, docstring })
    }

    // ── Token cursor ──────────────────────────────────────────────────────

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn peek_next(&self) -> &TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn at_op(&self, op: &str) -> bool {
        matches!(self.peek(), TokenKind::Op(o) if *o == op)
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if *k == keyword)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.at_op(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Go one level deeper. Parsing stops at the first error, so only the
    /// success paths call [`Parser::ascend`].
    fn descend(&mut self) -> EvalResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return self.error("too many nested parentheses");
        }
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn error<T>(&self, message: impl Into<String>) -> EvalResult<T> {
        Err(EvalError::syntax(message, self.line()))
    }

    fn unexpected<T>(&self) -> EvalResult<T> {
        match self.peek() {
            TokenKind::Indent => self.error("unexpected indent"),
            TokenKind::Eof => self.error("unexpected end of input"),
            _ => self.error("invalid syntax"),
        }
    }

    fn expect_op(&mut self, op: &str) -> EvalResult<()> {
        if self.eat_op(op) {
            Ok(())
        } else {
            self.error(format!("expected '{op}'"))
        }
    }

    fn expect_name(&mut self) -> EvalResult<String> {
        match self.peek().clone() {
            TokenKind::Name(name) => {
                self.pos += 1;
                Ok(name)
            }
            _ => self.error("expected a name"),
        }
    }

    fn expect_newline(&mut self) -> EvalResult<()> {
        if self.eat(&TokenKind::Newline) || self.at(&TokenKind::Eof) {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn parse_statement(&mut self) -> EvalResult<Vec<Stmt>> {
        let line = self.line();
        let kind = match self.peek() {
            TokenKind::Keyword(Keyword::If) => self.parse_if()?,
            TokenKind::Keyword(Keyword::While) => self.parse_while()?,
            TokenKind::Keyword(Keyword::For) => self.parse_for()?,
            TokenKind::Keyword(Keyword::Def) => StmtKind::FunctionDef(Rc::new(self.parse_def()?)),
            TokenKind::Keyword(Keyword::Class) => StmtKind::ClassDef(Rc::new(self.parse_class()?)),
            _ => return self.parse_simple_line(),
        };
        Ok(vec![Stmt { kind, line }])
    }

    /// One or more `;`-separated simple statements ending in a newline.
    fn parse_simple_line(&mut self) -> EvalResult<Vec<Stmt>> {
        let mut stmts = vec![self.parse_simple()?];
        while self.eat_op(";") {
            if self.at(&TokenKind::Newline) || self.at(&TokenKind::Eof) {
                break;
            }
            stmts.push(self.parse_simple()?);
        }
        self.expect_newline()?;
        Ok(stmts)
    }

    fn parse_simple(&mut self) -> EvalResult<Stmt> {
        let line = self.line();
        let kind = match self.peek() {
            TokenKind::Keyword(Keyword::Pass) => {
                self.advance();
                StmtKind::Pass
            }
            TokenKind::Keyword(Keyword::Break) => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Keyword(Keyword::Continue) => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Keyword(Keyword::Return) => {
                self.advance();
                StmtKind::Return(self.parse_optional_expr()?)
            }
            TokenKind::Keyword(Keyword::Raise) => {
                self.advance();
                StmtKind::Raise(self.parse_optional_expr()?)
            }
            TokenKind::Keyword(Keyword::Assert) => {
                self.advance();
                let test = self.parse_expr()?;
                let message = if self.eat_op(",") {
                    Some(self.parse_expr()?)
                } else {
                    None
                };
                StmtKind::Assert { test, message }
            }
            TokenKind::Indent | TokenKind::Dedent => return self.unexpected(),
            _ => self.parse_expr_statement()?,
        };
        Ok(Stmt { kind, line })
    }

    fn parse_optional_expr(&mut self) -> EvalResult<Option<Expr>> {
        if self.at(&TokenKind::Newline) || self.at(&TokenKind::Eof) || self.at_op(";") {
            Ok(None)
        } else {
            self.parse_expr().map(Some)
        }
    }

    fn parse_expr_statement(&mut self) -> EvalResult<StmtKind> {
        let first = self.parse_expr()?;

        let aug = match self.peek() {
            TokenKind::Op("+=") => Some(BinOp::Add),
            TokenKind::Op("-=") => Some(BinOp::Sub),
            TokenKind::Op("*=") => Some(BinOp::Mul),
            TokenKind::Op("/=") => Some(BinOp::Div),
            TokenKind::Op("//=") => Some(BinOp::FloorDiv),
            TokenKind::Op("%=") => Some(BinOp::Mod),
            TokenKind::Op("**=") => Some(BinOp::Pow),
            _ => None,
        };
        if let Some(op) = aug {
            self.advance();
            self.check_target(&first)?;
            let value = self.parse_expr()?;
            return Ok(StmtKind::AugAssign {
                target: first,
                op,
                value,
            });
        }

        if !self.at_op("=") {
            return Ok(StmtKind::Expr(first));
        }

        let mut targets = vec![first];
        let mut value = None;
        while self.eat_op("=") {
            let next = self.parse_expr()?;
            if let Some(previous) = value.replace(next) {
                targets.push(previous);
            }
        }
        for target in &targets {
            self.check_target(target)?;
        }
        let value = match value {
            Some(value) => value,
            None => return self.unexpected(),
        };
        Ok(StmtKind::Assign { targets, value })
    }

    fn check_target(&self, target: &Expr) -> EvalResult<()> {
        match target {
            Expr::Name(_) | Expr::Attribute { .. } => Ok(()),
            Expr::Subscript {
                index: Subscript::Index(_),
                ..
            } => Ok(()),
            _ => self.error("cannot assign to expression"),
        }
    }

    /// A block after `:`: an indented suite, or simple statements on the same line.
    fn parse_suite(&mut self) -> EvalResult<Vec<Stmt>> {
        self.expect_op(":")?;
        self.descend()?;
        let body = if self.eat(&TokenKind::Newline) {
            self.parse_block()?
        } else {
            self.parse_simple_line()?
        };
        self.ascend(1);
        Ok(body)
    }

    fn parse_block(&mut self) -> EvalResult<Vec<Stmt>> {
        if !self.eat(&TokenKind::Indent) {
            return self.error("expected an indented block");
        }
        let mut body = Vec::new();
        while !self.eat(&TokenKind::Dedent) {
            if self.at(&TokenKind::Eof) {
                break;
            }
            if self.eat(&TokenKind::Newline) {
                continue;
            }
            body.extend(self.parse_statement()?);
        }
        Ok(body)
    }

    fn parse_if(&mut self) -> EvalResult<StmtKind> {
        self.advance();
        let mut branches = Vec::new();
        let test = self.parse_expr()?;
        branches.push((test, self.parse_suite()?));
        let mut orelse = Vec::new();
        loop {
            if self.eat_keyword(Keyword::Elif) {
                let test = self.parse_expr()?;
                branches.push((test, self.parse_suite()?));
            } else if self.eat_keyword(Keyword::Else) {
                orelse = self.parse_suite()?;
                break;
            } else {
                break;
            }
        }
        Ok(StmtKind::If { branches, orelse })
    }

    fn parse_while(&mut self) -> EvalResult<StmtKind> {
        self.advance();
        let test = self.parse_expr()?;
        let body = self.parse_suite()?;
        Ok(StmtKind::While { test, body })
    }

    fn parse_for(&mut self) -> EvalResult<StmtKind> {
        self.advance();
        let target = self.expect_name()?;
        if !self.eat_keyword(Keyword::In) {
            return self.error("expected 'in'");
        }
        let iter = self.parse_expr()?;
        let body = self.parse_suite()?;
        Ok(StmtKind::For { target, iter, body })
    }

    fn parse_def(&mut self) -> EvalResult<FunctionDef> {
        let line = self.line();
        self.advance();
        let name = self.expect_name()?;
        self.expect_op("(")?;
        let mut params: Vec<Param> = Vec::new();
        while !self.eat_op(")") {
            let param = self.expect_name()?;
            let default = if self.eat_op("=") {
                Some(self.parse_expr()?)
            } else {
                None
            };
            if default.is_none() && params.iter().any(|p| p.default.is_some()) {
                return self.error("non-default argument follows default argument");
            }
            params.push(Param {
                name: param,
                default,
            });
            if !self.eat_op(",") {
                self.expect_op(")")?;
                break;
            }
        }
        let body = self.parse_suite()?;
        let docstring = docstring_of(&body);
        Ok(FunctionDef {
            name,
            params,
            body,
            docstring,
            line,
        })
    }

    fn parse_class(&mut self) -> EvalResult<ClassDef> {
        let line = self.line();
        self.advance();
        let name = self.expect_name()?;
        if self.eat_op("(") {
            self.expect_op(")")?;
        }
        let body = self.parse_suite()?;
        let docstring = docstring_of(&body);
        Ok(ClassDef {
            name,
            body,
            docstring,
            line,
        })
    }

    // ── Expressions ───────────────────────────────────────────────────────

    pub fn parse_expr(&mut self) -> EvalResult<Expr> {
        self.descend()?;
        let expr = self.parse_conditional()?;
        self.ascend(1);
        Ok(expr)
    }

    fn parse_conditional(&mut self) -> EvalResult<Expr> {
        let body = self.parse_or()?;
        if !self.eat_keyword(Keyword::If) {
            return Ok(body);
        }
        let test = self.parse_or()?;
        if !self.eat_keyword(Keyword::Else) {
            return self.error("expected 'else' in conditional expression");
        }
        let orelse = self.parse_expr()?;
        Ok(Expr::IfElse {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    fn parse_or(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_and()?;
        let mut folded = 0;
        while self.eat_keyword(Keyword::Or) {
            self.descend()?;
            folded += 1;
            let right = self.parse_and()?;
            left = Expr::Logical {
                left: Box::new(left),
                op: BoolOp::Or,
                right: Box::new(right),
            };
        }
        self.ascend(folded);
        Ok(left)
    }

    fn parse_and(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_not()?;
        let mut folded = 0;
        while self.eat_keyword(Keyword::And) {
            self.descend()?;
            folded += 1;
            let right = self.parse_not()?;
            left = Expr::Logical {
                left: Box::new(left),
                op: BoolOp::And,
                right: Box::new(right),
            };
        }
        self.ascend(folded);
        Ok(left)
    }

    fn parse_not(&mut self) -> EvalResult<Expr> {
        if self.eat_keyword(Keyword::Not) {
            self.descend()?;
            let operand = self.parse_not()?;
            self.ascend(1);
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let left = self.parse_arith()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek().clone() {
                TokenKind::Op("==") => CmpOp::Eq,
                TokenKind::Op("!=") => CmpOp::NotEq,
                TokenKind::Op("<") => CmpOp::Lt,
                TokenKind::Op("<=") => CmpOp::LtE,
                TokenKind::Op(">") => CmpOp::Gt,
                TokenKind::Op(">=") => CmpOp::GtE,
                TokenKind::Keyword(Keyword::In) => CmpOp::In,
                TokenKind::Keyword(Keyword::Not)
                    if matches!(self.peek_next(), TokenKind::Keyword(Keyword::In)) =>
                {
                    self.advance();
                    CmpOp::NotIn
                }
                TokenKind::Keyword(Keyword::Is) => {
                    if matches!(self.peek_next(), TokenKind::Keyword(Keyword::Not)) {
                        self.advance();
                        CmpOp::IsNot
                    } else {
                        CmpOp::Is
                    }
                }
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_arith()?));
        }
        if rest.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                rest,
            })
        }
    }

    fn parse_arith(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_term()?;
        let mut folded = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Op("+") => BinOp::Add,
                TokenKind::Op("-") => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.descend()?;
            folded += 1;
            let right = self.parse_term()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        self.ascend(folded);
        Ok(left)
    }

    fn parse_term(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_factor()?;
        let mut folded = 0;
        loop {
            let op = match self.peek() {
                TokenKind::Op("*") => BinOp::Mul,
                TokenKind::Op("/") => BinOp::Div,
                TokenKind::Op("//") => BinOp::FloorDiv,
                TokenKind::Op("%") => BinOp::Mod,
                _ => break,
            };
            self.advance();
            self.descend()?;
            folded += 1;
            let right = self.parse_factor()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        self.ascend(folded);
        Ok(left)
    }

    fn parse_factor(&mut self) -> EvalResult<Expr> {
        let op = match self.peek() {
            TokenKind::Op("-") => UnaryOp::Neg,
            TokenKind::Op("+") => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        self.advance();
        self.descend()?;
        let operand = self.parse_factor()?;
        self.ascend(1);
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> EvalResult<Expr> {
        let base = self.parse_postfix()?;
        if self.eat_op("**") {
            // Right-associative and binds tighter than a unary minus on its left.
            self.descend()?;
            let exponent = self.parse_factor()?;
            self.ascend(1);
            return Ok(Expr::Binary {
                left: Box::new(base),
                op: BinOp::Pow,
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_atom()?;
        let mut folded = 0;
        loop {
            if matches!(self.peek(), TokenKind::Op("(" | "[" | ".")) {
                self.descend()?;
                folded += 1;
            }
            if self.eat_op("(") {
                let (args, keywords) = self.parse_call_args()?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    keywords,
                };
            } else if self.eat_op("[") {
                let index = self.parse_subscript()?;
                self.expect_op("]")?;
                expr = Expr::Subscript {
                    object: Box::new(expr),
                    index,
                };
            } else if self.eat_op(".") {
                let name = self.expect_name()?;
                expr = Expr::Attribute {
                    object: Box::new(expr),
                    name,
                };
            } else {
                self.ascend(folded);
                return Ok(expr);
            }
        }
    }

    fn parse_call_args(&mut self) -> EvalResult<(Vec<Expr>, Vec<(String, Expr)>)> {
        let mut args = Vec::new();
        let mut keywords: Vec<(String, Expr)> = Vec::new();
        while !self.eat_op(")") {
            let is_keyword = matches!(self.peek(), TokenKind::Name(_))
                && matches!(self.peek_next(), TokenKind::Op("="));
            if is_keyword {
                let name = self.expect_name()?;
                self.advance();
                if keywords.iter().any(|(existing, _)| *existing == name) {
                    return self.error(format!("keyword argument repeated: {name}"));
                }
                keywords.push((name, self.parse_expr()?));
            } else {
                if !keywords.is_empty() {
                    return self.error("positional argument follows keyword argument");
                }
                args.push(self.parse_expr()?);
            }
            if !self.eat_op(",") {
                self.expect_op(")")?;
                break;
            }
        }
        Ok((args, keywords))
    }

    fn parse_subscript(&mut self) -> EvalResult<Subscript> {
        let lower = if self.at_op(":") {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        if !self.eat_op(":") {
            return match lower {
                Some(index) => Ok(Subscript::Index(index)),
                None => self.unexpected(),
            };
        }
        let upper = if self.at_op("]") {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        Ok(Subscript::Slice { lower, upper })
    }

    fn parse_atom(&mut self) -> EvalResult<Expr> {
        match self.advance() {
            TokenKind::Name(name) => Ok(Expr::Name(name)),
            TokenKind::Int(value) => Ok(Expr::Int(value)),
            TokenKind::Float(value) => Ok(Expr::Float(value)),
            TokenKind::Str(mut text) => {
                while let TokenKind::Str(next) = self.peek() {
                    text.push_str(next);
                    self.pos += 1;
                }
                Ok(Expr::Str(text))
            }
            TokenKind::Keyword(Keyword::True) => Ok(Expr::Bool(true)),
            TokenKind::Keyword(Keyword::False) => Ok(Expr::Bool(false)),
            TokenKind::Keyword(Keyword::None) => Ok(Expr::None),
            TokenKind::Op("(") => {
                let inner = self.parse_expr()?;
                if self.at_op(",") {
                    return self.error("tuples are not supported");
                }
                self.expect_op(")")?;
                Ok(inner)
            }
            TokenKind::Op("[") => {
                let mut items = Vec::new();
                while !self.eat_op("]") {
                    items.push(self.parse_expr()?);
                    if !self.eat_op(",") {
                        self.expect_op("]")?;
                        break;
                    }
                }
                Ok(Expr::List(items))
            }
            TokenKind::Op("{") => {
                let mut entries = Vec::new();
                while !self.eat_op("}") {
                    let key = self.parse_expr()?;
                    self.expect_op(":")?;
                    let value = self.parse_expr()?;
                    entries.push((key, value));
                    if !self.eat_op(",") {
                        self.expect_op("}")?;
                        break;
                    }
                }
                Ok(Expr::Dict(entries))
            }
            _ => {
                self.pos = self.pos.saturating_sub(1);
                self.unexpected()
            }
        }
    }
}
