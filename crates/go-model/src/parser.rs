// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser for the Go subset.
//!
//! Precedence climbing for binary expressions, Go's composite-literal
//! restriction inside control-flow headers (parenthesize to use one),
//! and the usual `init ; cond ; post` disambiguation for `for` and
//! `switch` headers.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{tokenize, Tok, Token};

/// Parse one source file. The front-end half of the external contract;
/// the other half is [`check`](crate::checker::check).
pub fn parse(src: &str) -> Result<SourceFile, ParseError> {
    let toks = tokenize(src)?;
    Parser::new(toks).source_file()
}

struct Parser {
    toks: Vec<Token>,
    pos: usize,
    next_id: u32,
    /// Composite literals are not allowed at the top level of
    /// control-flow headers.
    composite_ok: bool,
    /// Only meaningful while parsing a `switch` header: permits the
    /// `.(type)` guard and records that one was seen.
    in_switch_header: bool,
    saw_type_guard: bool,
    /// Set while parsing a `for` header so `:= range` is accepted.
    allow_range: bool,
}

type PResult<T> = Result<T, ParseError>;

impl Parser {
    fn new(toks: Vec<Token>) -> Self {
        Self {
            toks,
            pos: 0,
            next_id: 0,
            composite_ok: true,
            in_switch_header: false,
            saw_type_guard: false,
            allow_range: false,
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> &Tok {
        &self.toks[self.pos].tok
    }

    fn peek2(&self) -> &Tok {
        let i = (self.pos + 1).min(self.toks.len() - 1);
        &self.toks[i].tok
    }

    fn span(&self) -> Span {
        self.toks[self.pos].span
    }

    fn prev_span(&self) -> Span {
        self.toks[self.pos.saturating_sub(1)].span
    }

    fn advance(&mut self) -> Token {
        let t = self.toks[self.pos].clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        t
    }

    fn at(&self, tok: &Tok) -> bool {
        self.peek() == tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.at(tok) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok, what: &str) -> PResult<Span> {
        if self.at(&tok) {
            Ok(self.advance().span)
        } else {
            Err(self.err(format!("expected {}", what)))
        }
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.span(), message)
    }

    fn ident(&mut self, what: &str) -> PResult<(String, Span)> {
        match self.peek().clone() {
            Tok::Ident(name) => {
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.err(format!("expected {}", what))),
        }
    }

    fn mk_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Expr { id, span, kind }
    }

    fn skip_semis(&mut self) {
        while self.at(&Tok::Semi) {
            self.advance();
        }
    }

    fn starts_type(&self) -> bool {
        matches!(
            self.peek(),
            Tok::Ident(_)
                | Tok::LBracket
                | Tok::Map
                | Tok::Struct
                | Tok::Interface
                | Tok::Star
                | Tok::Func
                | Tok::Chan
        )
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn source_file(&mut self) -> PResult<SourceFile> {
        self.skip_semis();
        self.expect(Tok::Package, "`package` clause")?;
        let (package, _) = self.ident("package name")?;
        self.expect(Tok::Semi, "newline after package clause")?;

        let mut decls = Vec::new();
        loop {
            self.skip_semis();
            match self.peek() {
                Tok::Eof => break,
                Tok::Import => decls.push(self.import_decl()?),
                Tok::Func => decls.push(self.func_decl()?),
                Tok::Var => decls.push(self.gen_decl(GenKeyword::Var)?),
                Tok::Const => decls.push(self.gen_decl(GenKeyword::Const)?),
                Tok::Type => decls.push(self.gen_decl(GenKeyword::Type)?),
                _ => return Err(self.err("expected top-level declaration")),
            }
        }
        Ok(SourceFile { package, decls })
    }

    fn import_decl(&mut self) -> PResult<Decl> {
        let start = self.expect(Tok::Import, "`import`")?;
        let mut specs = Vec::new();
        if self.eat(&Tok::LParen) {
            loop {
                self.skip_semis();
                if self.eat(&Tok::RParen) {
                    break;
                }
                specs.push(Spec::Import(self.import_spec()?));
            }
        } else {
            specs.push(Spec::Import(self.import_spec()?));
        }
        Ok(Decl {
            span: start.merge(self.prev_span()),
            kind: DeclKind::Gen {
                keyword: GenKeyword::Import,
                specs,
            },
        })
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let alias = match self.peek().clone() {
            Tok::Ident(name) => {
                self.advance();
                Some(name)
            }
            _ => None,
        };
        match self.peek().clone() {
            Tok::Str(text) => {
                self.advance();
                Ok(ImportSpec {
                    alias,
                    path: text.trim_matches('"').to_string(),
                })
            }
            _ => Err(self.err("expected import path")),
        }
    }

    fn gen_decl(&mut self, keyword: GenKeyword) -> PResult<Decl> {
        let start = self.advance().span;
        let mut specs = Vec::new();
        if self.eat(&Tok::LParen) {
            loop {
                self.skip_semis();
                if self.eat(&Tok::RParen) {
                    break;
                }
                specs.push(self.spec(keyword)?);
            }
        } else {
            specs.push(self.spec(keyword)?);
        }
        Ok(Decl {
            span: start.merge(self.prev_span()),
            kind: DeclKind::Gen { keyword, specs },
        })
    }

    fn spec(&mut self, keyword: GenKeyword) -> PResult<Spec> {
        match keyword {
            GenKeyword::Type => {
                let (name, _) = self.ident("type name")?;
                let ty = self.parse_type()?;
                Ok(Spec::Type(TypeSpec { name, ty }))
            }
            GenKeyword::Var | GenKeyword::Const => {
                let mut names = vec![self.ident("name")?.0];
                while self.eat(&Tok::Comma) {
                    names.push(self.ident("name")?.0);
                }
                let ty = if self.starts_type() {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let mut values = Vec::new();
                if self.eat(&Tok::Assign) {
                    values = self.expr_list()?;
                }
                Ok(Spec::Value(ValueSpec { names, ty, values }))
            }
            GenKeyword::Import => Ok(Spec::Import(self.import_spec()?)),
        }
    }

    fn func_decl(&mut self) -> PResult<Decl> {
        let start = self.expect(Tok::Func, "`func`")?;
        let recv = if self.eat(&Tok::LParen) {
            let (name, _) = self.ident("receiver name")?;
            let ty = self.parse_type()?;
            self.expect(Tok::RParen, "`)` after receiver")?;
            Some(Param { name, ty })
        } else {
            None
        };
        let (name, _) = self.ident("function name")?;
        let params = self.param_list()?;
        let results = self.result_list()?;
        let body = self.block()?;
        Ok(Decl {
            span: start.merge(self.prev_span()),
            kind: DeclKind::Func(FuncDecl {
                name,
                recv,
                params,
                results,
                body,
            }),
        })
    }

    /// `(a, b int, c string)` — named parameters only.
    fn param_list(&mut self) -> PResult<Vec<Param>> {
        self.expect(Tok::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.at(&Tok::RParen) {
            let mut names = vec![self.ident("parameter name")?.0];
            while self.eat(&Tok::Comma) {
                names.push(self.ident("parameter name")?.0);
            }
            let ty = self.parse_type()?;
            for name in names {
                params.push(Param {
                    name,
                    ty: ty.clone(),
                });
            }
            if !self.eat(&Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RParen, "`)` after parameters")?;
        Ok(params)
    }

    fn result_list(&mut self) -> PResult<Vec<TypeExpr>> {
        if self.eat(&Tok::LParen) {
            let mut results = Vec::new();
            while !self.at(&Tok::RParen) {
                results.push(self.parse_type()?);
                if !self.eat(&Tok::Comma) {
                    break;
                }
            }
            self.expect(Tok::RParen, "`)` after results")?;
            Ok(results)
        } else if self.starts_type() && !self.at(&Tok::LBrace) {
            Ok(vec![self.parse_type()?])
        } else {
            Ok(Vec::new())
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn block(&mut self) -> PResult<Block> {
        let start = self.expect(Tok::LBrace, "`{`")?;
        let mut stmts = Vec::new();
        loop {
            self.skip_semis();
            if self.at(&Tok::RBrace) {
                break;
            }
            stmts.push(self.stmt()?);
        }
        let end = self.expect(Tok::RBrace, "`}`")?;
        Ok(Block {
            span: start.merge(end),
            stmts,
        })
    }

    fn stmt(&mut self) -> PResult<Stmt> {
        let start = self.span();
        match self.peek().clone() {
            Tok::Var => {
                let decl = self.gen_decl(GenKeyword::Var)?;
                Ok(self.finish_stmt(start, StmtKind::Decl(Box::new(decl))))
            }
            Tok::Const => {
                let decl = self.gen_decl(GenKeyword::Const)?;
                Ok(self.finish_stmt(start, StmtKind::Decl(Box::new(decl))))
            }
            Tok::Type => {
                let decl = self.gen_decl(GenKeyword::Type)?;
                Ok(self.finish_stmt(start, StmtKind::Decl(Box::new(decl))))
            }
            Tok::Return => {
                self.advance();
                let values = if self.at(&Tok::Semi) || self.at(&Tok::RBrace) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                Ok(self.finish_stmt(start, StmtKind::Return(values)))
            }
            Tok::If => self.if_stmt(),
            Tok::For => self.for_stmt(),
            Tok::Switch => self.switch_stmt(),
            Tok::Break => {
                self.advance();
                let label = self.opt_label();
                Ok(self.finish_stmt(
                    start,
                    StmtKind::Branch {
                        kind: BranchKind::Break,
                        label,
                    },
                ))
            }
            Tok::Continue => {
                self.advance();
                let label = self.opt_label();
                Ok(self.finish_stmt(
                    start,
                    StmtKind::Branch {
                        kind: BranchKind::Continue,
                        label,
                    },
                ))
            }
            Tok::Goto => {
                self.advance();
                let label = Some(self.ident("label")?.0);
                Ok(self.finish_stmt(
                    start,
                    StmtKind::Branch {
                        kind: BranchKind::Goto,
                        label,
                    },
                ))
            }
            Tok::Fallthrough => {
                self.advance();
                Ok(self.finish_stmt(
                    start,
                    StmtKind::Branch {
                        kind: BranchKind::Fallthrough,
                        label: None,
                    },
                ))
            }
            Tok::Go => {
                self.advance();
                let call = self.expr()?;
                Ok(self.finish_stmt(start, StmtKind::Go(call)))
            }
            Tok::Defer => {
                self.advance();
                let call = self.expr()?;
                Ok(self.finish_stmt(start, StmtKind::Defer(call)))
            }
            Tok::LBrace => {
                let block = self.block()?;
                Ok(self.finish_stmt(start, StmtKind::Block(block)))
            }
            Tok::Semi => {
                self.advance();
                Ok(self.finish_stmt(start, StmtKind::Empty))
            }
            Tok::Select => Err(self.err("select statements are not supported")),
            _ => self.simple_stmt(),
        }
    }

    fn finish_stmt(&self, start: Span, kind: StmtKind) -> Stmt {
        Stmt {
            span: start.merge(self.prev_span()),
            kind,
        }
    }

    fn opt_label(&mut self) -> Option<String> {
        match self.peek().clone() {
            Tok::Ident(name) => {
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Expression statements, assignments, defines, inc/dec, sends and
    /// labels — anything that can appear in a control-flow header.
    fn simple_stmt(&mut self) -> PResult<Stmt> {
        let start = self.span();

        // Labels: `name: stmt`. `:=` is a distinct token, so a single
        // lookahead is enough.
        if matches!(self.peek(), Tok::Ident(_)) && matches!(self.peek2(), Tok::Colon) {
            let (label, _) = self.ident("label")?;
            self.advance(); // colon
            self.skip_semis();
            let stmt = self.stmt()?;
            return Ok(self.finish_stmt(
                start,
                StmtKind::Labeled {
                    label,
                    stmt: Box::new(stmt),
                },
            ));
        }

        let lhs = self.expr_list()?;
        let op = match self.peek() {
            Tok::Define => Some(AssignOp::Define),
            Tok::Assign => Some(AssignOp::Assign),
            Tok::PlusAssign => Some(AssignOp::Add),
            Tok::MinusAssign => Some(AssignOp::Sub),
            Tok::StarAssign => Some(AssignOp::Mul),
            Tok::SlashAssign => Some(AssignOp::Div),
            Tok::PercentAssign => Some(AssignOp::Rem),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            if self.at(&Tok::Range) {
                if !self.allow_range {
                    return Err(self.err("`range` is only valid in a for statement"));
                }
                self.advance();
                let collection = self.expr()?;
                let mut iter = lhs.into_iter();
                let key = iter.next();
                let value = iter.next();
                // Body is filled in by the enclosing for statement.
                return Ok(self.finish_stmt(
                    start,
                    StmtKind::Range(RangeStmt {
                        key,
                        value,
                        define: op.is_define(),
                        collection,
                        body: Block {
                            span: Span::default(),
                            stmts: Vec::new(),
                        },
                    }),
                ));
            }
            let rhs = self.expr_list()?;
            return Ok(self.finish_stmt(start, StmtKind::Assign { lhs, op, rhs }));
        }

        let mut lhs = lhs;
        if lhs.len() != 1 {
            return Err(self.err("expected assignment"));
        }
        let first = lhs.remove(0);

        match self.peek() {
            Tok::Inc | Tok::Dec => {
                let inc = self.at(&Tok::Inc);
                self.advance();
                Ok(self.finish_stmt(start, StmtKind::IncDec { target: first, inc }))
            }
            Tok::Arrow => {
                self.advance();
                let value = self.expr()?;
                Ok(self.finish_stmt(
                    start,
                    StmtKind::Send {
                        chan: first,
                        value,
                    },
                ))
            }
            _ => Ok(self.finish_stmt(start, StmtKind::Expr(first))),
        }
    }

    fn if_stmt(&mut self) -> PResult<Stmt> {
        let start = self.expect(Tok::If, "`if`")?;
        let saved = self.composite_ok;
        self.composite_ok = false;
        let first = self.simple_stmt()?;
        let (init, cond) = if self.eat(&Tok::Semi) {
            let cond = self.expr()?;
            (Some(Box::new(first)), cond)
        } else {
            match first.kind {
                StmtKind::Expr(e) => (None, e),
                _ => return Err(self.err("expected condition")),
            }
        };
        self.composite_ok = saved;
        let then = self.block()?;
        let els = if self.eat(&Tok::Else) {
            if self.at(&Tok::If) {
                Some(Box::new(self.if_stmt()?))
            } else {
                let s = self.span();
                let block = self.block()?;
                Some(Box::new(self.finish_stmt(s, StmtKind::Block(block))))
            }
        } else {
            None
        };
        Ok(self.finish_stmt(
            start,
            StmtKind::If(IfStmt {
                init,
                cond,
                then,
                els,
            }),
        ))
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        let start = self.expect(Tok::For, "`for`")?;
        let saved = self.composite_ok;
        self.composite_ok = false;
        self.allow_range = true;

        let result = self.for_header(start);

        self.composite_ok = saved;
        self.allow_range = false;
        result
    }

    fn for_header(&mut self, start: Span) -> PResult<Stmt> {
        // `for { ... }`
        if self.at(&Tok::LBrace) {
            self.allow_range = false;
            self.composite_ok = true;
            let body = self.block()?;
            return Ok(self.finish_stmt(
                start,
                StmtKind::For(ForStmt {
                    init: None,
                    cond: None,
                    post: None,
                    body,
                }),
            ));
        }

        // `for range coll { ... }`
        if self.eat(&Tok::Range) {
            self.allow_range = false;
            let collection = self.expr()?;
            self.composite_ok = true;
            let body = self.block()?;
            return Ok(self.finish_stmt(
                start,
                StmtKind::Range(RangeStmt {
                    key: None,
                    value: None,
                    define: false,
                    collection,
                    body,
                }),
            ));
        }

        // `for ; cond ; post { ... }` with an empty initializer.
        if self.eat(&Tok::Semi) {
            self.allow_range = false;
            return self.for_clause(start, None);
        }

        let first = self.simple_stmt()?;
        self.allow_range = false;

        if self.eat(&Tok::Semi) {
            return self.for_clause(start, Some(Box::new(first)));
        }

        match first.kind {
            StmtKind::Range(mut range) => {
                self.composite_ok = true;
                range.body = self.block()?;
                Ok(self.finish_stmt(start, StmtKind::Range(range)))
            }
            StmtKind::Expr(cond) => {
                self.composite_ok = true;
                let body = self.block()?;
                Ok(self.finish_stmt(
                    start,
                    StmtKind::For(ForStmt {
                        init: None,
                        cond: Some(cond),
                        post: None,
                        body,
                    }),
                ))
            }
            _ => Err(self.err("expected `;` or `{` in for header")),
        }
    }

    fn for_clause(&mut self, start: Span, init: Option<Box<Stmt>>) -> PResult<Stmt> {
        let cond = if self.at(&Tok::Semi) {
            None
        } else {
            Some(self.expr()?)
        };
        self.expect(Tok::Semi, "`;` after for condition")?;
        let post = if self.at(&Tok::LBrace) {
            None
        } else {
            Some(Box::new(self.simple_stmt()?))
        };
        self.composite_ok = true;
        let body = self.block()?;
        Ok(self.finish_stmt(
            start,
            StmtKind::For(ForStmt {
                init,
                cond,
                post,
                body,
            }),
        ))
    }

    fn switch_stmt(&mut self) -> PResult<Stmt> {
        let start = self.expect(Tok::Switch, "`switch`")?;
        let saved = self.composite_ok;
        let saved_header = self.in_switch_header;
        let saved_guard = self.saw_type_guard;
        self.composite_ok = false;
        self.in_switch_header = true;
        self.saw_type_guard = false;

        let mut init = None;
        let mut tag = None;
        let mut subject = None;

        if !self.at(&Tok::LBrace) {
            let first = self.simple_stmt()?;
            let first = if self.eat(&Tok::Semi) {
                init = Some(Box::new(first));
                if self.at(&Tok::LBrace) {
                    None
                } else {
                    Some(self.simple_stmt()?)
                }
            } else {
                Some(first)
            };
            if let Some(stmt) = first {
                match stmt.kind {
                    StmtKind::Expr(e) => {
                        if self.saw_type_guard {
                            subject = Some(e);
                        } else {
                            tag = Some(e);
                        }
                    }
                    StmtKind::Assign { .. } if self.saw_type_guard => {
                        return Err(
                            self.err("type switch variable bindings are not supported")
                        );
                    }
                    _ => return Err(self.err("expected switch expression")),
                }
            }
        }

        let type_switch = self.saw_type_guard;
        self.in_switch_header = saved_header;
        self.saw_type_guard = saved_guard;
        self.composite_ok = saved;

        self.expect(Tok::LBrace, "`{` after switch header")?;
        let mut cases = Vec::new();
        loop {
            self.skip_semis();
            if self.at(&Tok::RBrace) {
                break;
            }
            cases.push(self.case_clause(type_switch)?);
        }
        self.expect(Tok::RBrace, "`}` closing switch")?;

        Ok(self.finish_stmt(
            start,
            StmtKind::Switch(SwitchStmt {
                init,
                tag,
                subject,
                cases,
            }),
        ))
    }

    fn case_clause(&mut self, type_switch: bool) -> PResult<CaseClause> {
        let start = self.span();
        let labels = if self.eat(&Tok::Default) {
            CaseLabels::Default
        } else {
            self.expect(Tok::Case, "`case` or `default`")?;
            if type_switch {
                let mut types = vec![self.parse_type()?];
                while self.eat(&Tok::Comma) {
                    types.push(self.parse_type()?);
                }
                CaseLabels::Types(types)
            } else {
                CaseLabels::Exprs(self.expr_list()?)
            }
        };
        self.expect(Tok::Colon, "`:` after case labels")?;
        let mut body = Vec::new();
        loop {
            self.skip_semis();
            if matches!(self.peek(), Tok::Case | Tok::Default | Tok::RBrace) {
                break;
            }
            body.push(self.stmt()?);
        }
        Ok(CaseClause {
            span: start.merge(self.prev_span()),
            labels,
            body,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.expr()?];
        while self.eat(&Tok::Comma) {
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    fn expr(&mut self) -> PResult<Expr> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.unary_expr()?;
        loop {
            let (op, prec) = match self.peek() {
                Tok::OrOr => (BinOp::Or, 1),
                Tok::AndAnd => (BinOp::And, 2),
                Tok::Eq => (BinOp::Eq, 3),
                Tok::Ne => (BinOp::Ne, 3),
                Tok::Lt => (BinOp::Lt, 3),
                Tok::Le => (BinOp::Le, 3),
                Tok::Gt => (BinOp::Gt, 3),
                Tok::Ge => (BinOp::Ge, 3),
                Tok::Plus => (BinOp::Add, 4),
                Tok::Minus => (BinOp::Sub, 4),
                Tok::Pipe => (BinOp::BitOr, 4),
                Tok::Caret => (BinOp::BitXor, 4),
                Tok::Star => (BinOp::Mul, 5),
                Tok::Slash => (BinOp::Div, 5),
                Tok::Percent => (BinOp::Rem, 5),
                Tok::Shl => (BinOp::Shl, 5),
                Tok::Shr => (BinOp::Shr, 5),
                Tok::Amp => (BinOp::BitAnd, 5),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let rhs = self.binary_expr(prec + 1)?;
            let span = lhs.span.merge(rhs.span);
            lhs = self.mk_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn unary_expr(&mut self) -> PResult<Expr> {
        let op = match self.peek() {
            Tok::Minus => Some(UnOp::Neg),
            Tok::Not => Some(UnOp::Not),
            Tok::Plus => Some(UnOp::Plus),
            Tok::Amp => Some(UnOp::Addr),
            Tok::Star => Some(UnOp::Deref),
            Tok::Arrow => Some(UnOp::Recv),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.advance().span;
            let operand = self.unary_expr()?;
            let span = start.merge(operand.span);
            return Ok(self.mk_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.postfix_expr()
    }

    fn postfix_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.primary_expr()?;
        loop {
            match self.peek() {
                Tok::Dot => {
                    self.advance();
                    if self.eat(&Tok::LParen) {
                        if self.at(&Tok::Type) {
                            if !self.in_switch_header {
                                return Err(
                                    self.err("type switch guard outside switch statement")
                                );
                            }
                            self.advance();
                            self.expect(Tok::RParen, "`)` after type guard")?;
                            self.saw_type_guard = true;
                            // The guarded expression itself is the result.
                            return Ok(expr);
                        }
                        let ty = self.parse_type()?;
                        self.expect(Tok::RParen, "`)` after asserted type")?;
                        let span = expr.span.merge(self.prev_span());
                        expr = self.mk_expr(
                            ExprKind::TypeAssert {
                                base: Box::new(expr),
                                ty,
                            },
                            span,
                        );
                    } else {
                        let (member, mspan) = self.ident("selector member")?;
                        let span = expr.span.merge(mspan);
                        expr = self.mk_expr(
                            ExprKind::Selector {
                                base: Box::new(expr),
                                member,
                            },
                            span,
                        );
                    }
                }
                Tok::LParen => {
                    self.advance();
                    let saved = self.composite_ok;
                    self.composite_ok = true;
                    let mut args = Vec::new();
                    while !self.at(&Tok::RParen) {
                        args.push(self.expr()?);
                        if !self.eat(&Tok::Comma) {
                            break;
                        }
                    }
                    self.composite_ok = saved;
                    let end = self.expect(Tok::RParen, "`)` after arguments")?;
                    let span = expr.span.merge(end);
                    expr = self.mk_expr(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                Tok::LBracket => {
                    self.advance();
                    let saved = self.composite_ok;
                    self.composite_ok = true;
                    let low = if self.at(&Tok::Colon) {
                        None
                    } else {
                        Some(Box::new(self.expr()?))
                    };
                    if self.eat(&Tok::Colon) {
                        let high = if self.at(&Tok::RBracket) {
                            None
                        } else {
                            Some(Box::new(self.expr()?))
                        };
                        self.composite_ok = saved;
                        let end = self.expect(Tok::RBracket, "`]` closing slice")?;
                        let span = expr.span.merge(end);
                        expr = self.mk_expr(
                            ExprKind::Slice {
                                base: Box::new(expr),
                                low,
                                high,
                            },
                            span,
                        );
                    } else {
                        self.composite_ok = saved;
                        let end = self.expect(Tok::RBracket, "`]` closing index")?;
                        let index = low.expect("index expression");
                        let span = expr.span.merge(end);
                        expr = self.mk_expr(
                            ExprKind::Index {
                                base: Box::new(expr),
                                index,
                            },
                            span,
                        );
                    }
                }
                Tok::LBrace if self.composite_ok => {
                    // `Name{...}` composite literal.
                    let name = match &expr.kind {
                        ExprKind::Ident(name) => name.clone(),
                        _ => break,
                    };
                    let ty = TypeExpr {
                        span: expr.span,
                        kind: TypeExprKind::Named(name),
                    };
                    let start = expr.span;
                    expr = self.composite_body(ty, start)?;
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn primary_expr(&mut self) -> PResult<Expr> {
        let start = self.span();
        match self.peek().clone() {
            Tok::Ident(name) => {
                self.advance();
                Ok(self.mk_expr(ExprKind::Ident(name), start))
            }
            Tok::Int(text) => {
                self.advance();
                Ok(self.mk_expr(
                    ExprKind::Lit {
                        kind: LitKind::Int,
                        text,
                    },
                    start,
                ))
            }
            Tok::Float(text) => {
                self.advance();
                Ok(self.mk_expr(
                    ExprKind::Lit {
                        kind: LitKind::Float,
                        text,
                    },
                    start,
                ))
            }
            Tok::Str(text) => {
                self.advance();
                Ok(self.mk_expr(
                    ExprKind::Lit {
                        kind: LitKind::Str,
                        text,
                    },
                    start,
                ))
            }
            Tok::Char(text) => {
                self.advance();
                Ok(self.mk_expr(
                    ExprKind::Lit {
                        kind: LitKind::Char,
                        text,
                    },
                    start,
                ))
            }
            Tok::LParen => {
                self.advance();
                let saved = self.composite_ok;
                self.composite_ok = true;
                let inner = self.expr()?;
                self.composite_ok = saved;
                let end = self.expect(Tok::RParen, "`)`")?;
                let span = start.merge(end);
                Ok(self.mk_expr(ExprKind::Paren(Box::new(inner)), span))
            }
            Tok::LBracket | Tok::Map | Tok::Struct => {
                // Slice, array, map or struct composite literal.
                let ty = self.parse_type()?;
                self.composite_body(ty, start)
            }
            Tok::Func => {
                self.advance();
                let params = self.param_list()?;
                let results = self.result_list()?;
                let body = self.block()?;
                let span = start.merge(self.prev_span());
                Ok(self.mk_expr(
                    ExprKind::FuncLit {
                        params,
                        results,
                        body,
                    },
                    span,
                ))
            }
            _ => Err(self.err("expected expression")),
        }
    }

    fn composite_body(&mut self, ty: TypeExpr, start: Span) -> PResult<Expr> {
        self.expect(Tok::LBrace, "`{` opening composite literal")?;
        let saved = self.composite_ok;
        self.composite_ok = true;
        let mut elems = Vec::new();
        loop {
            self.skip_semis();
            if self.at(&Tok::RBrace) {
                break;
            }
            let first = self.expr()?;
            let elem = if self.eat(&Tok::Colon) {
                let value = self.expr()?;
                CompositeElem {
                    key: Some(first),
                    value,
                }
            } else {
                CompositeElem {
                    key: None,
                    value: first,
                }
            };
            elems.push(elem);
            if !self.eat(&Tok::Comma) {
                self.skip_semis();
                break;
            }
        }
        self.composite_ok = saved;
        let end = self.expect(Tok::RBrace, "`}` closing composite literal")?;
        let span = start.merge(end);
        Ok(self.mk_expr(ExprKind::Composite { ty, elems }, span))
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type(&mut self) -> PResult<TypeExpr> {
        let start = self.span();
        match self.peek().clone() {
            Tok::Ident(name) => {
                self.advance();
                Ok(TypeExpr {
                    span: start,
                    kind: TypeExprKind::Named(name),
                })
            }
            Tok::LBracket => {
                self.advance();
                if self.eat(&Tok::RBracket) {
                    let elem = self.parse_type()?;
                    let span = start.merge(elem.span);
                    Ok(TypeExpr {
                        span,
                        kind: TypeExprKind::Slice(Box::new(elem)),
                    })
                } else {
                    let len = match self.peek().clone() {
                        Tok::Int(text) => {
                            self.advance();
                            text
                        }
                        Tok::Ident(text) => {
                            self.advance();
                            text
                        }
                        _ => return Err(self.err("expected array length")),
                    };
                    self.expect(Tok::RBracket, "`]` after array length")?;
                    let elem = self.parse_type()?;
                    let span = start.merge(elem.span);
                    Ok(TypeExpr {
                        span,
                        kind: TypeExprKind::Array {
                            len,
                            elem: Box::new(elem),
                        },
                    })
                }
            }
            Tok::Map => {
                self.advance();
                self.expect(Tok::LBracket, "`[` after `map`")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBracket, "`]` after map key type")?;
                let value = self.parse_type()?;
                let span = start.merge(value.span);
                Ok(TypeExpr {
                    span,
                    kind: TypeExprKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                })
            }
            Tok::Struct => {
                self.advance();
                self.expect(Tok::LBrace, "`{` after `struct`")?;
                let mut fields = Vec::new();
                loop {
                    self.skip_semis();
                    if self.at(&Tok::RBrace) {
                        break;
                    }
                    let mut names = vec![self.ident("field name")?.0];
                    while self.eat(&Tok::Comma) {
                        names.push(self.ident("field name")?.0);
                    }
                    let ty = self.parse_type()?;
                    for name in names {
                        fields.push(Param {
                            name,
                            ty: ty.clone(),
                        });
                    }
                }
                let end = self.expect(Tok::RBrace, "`}` closing struct type")?;
                Ok(TypeExpr {
                    span: start.merge(end),
                    kind: TypeExprKind::Struct { fields },
                })
            }
            Tok::Interface => {
                self.advance();
                self.expect(Tok::LBrace, "`{` after `interface`")?;
                if !self.at(&Tok::RBrace) {
                    return Err(self.err("only the empty interface is supported"));
                }
                let end = self.expect(Tok::RBrace, "`}`")?;
                Ok(TypeExpr {
                    span: start.merge(end),
                    kind: TypeExprKind::Interface,
                })
            }
            Tok::Star => {
                self.advance();
                let inner = self.parse_type()?;
                let span = start.merge(inner.span);
                Ok(TypeExpr {
                    span,
                    kind: TypeExprKind::Pointer(Box::new(inner)),
                })
            }
            Tok::Func => {
                self.advance();
                self.expect(Tok::LParen, "`(` after `func`")?;
                let mut params = Vec::new();
                while !self.at(&Tok::RParen) {
                    params.push(self.parse_type()?);
                    if !self.eat(&Tok::Comma) {
                        break;
                    }
                }
                self.expect(Tok::RParen, "`)` after parameter types")?;
                let results = if self.starts_type() {
                    vec![self.parse_type()?]
                } else {
                    Vec::new()
                };
                Ok(TypeExpr {
                    span: start.merge(self.prev_span()),
                    kind: TypeExprKind::Func { params, results },
                })
            }
            Tok::Chan => {
                self.advance();
                let inner = self.parse_type()?;
                let span = start.merge(inner.span);
                Ok(TypeExpr {
                    span,
                    kind: TypeExprKind::Chan(Box::new(inner)),
                })
            }
            _ => Err(self.err("expected type")),
        }
    }
}
