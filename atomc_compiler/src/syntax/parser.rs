//! Recursive-descent recognizer with backtracking
//!
//! Every rule returns `Ok(Some(node))` when it matched, `Ok(None)` when it
//! did not apply (with the cursor back where the rule started), or `Err`
//! once it has consumed the token that identifies its shape and then finds
//! a required token missing. Binary layers loop over operators instead of
//! recursing on themselves, which keeps them left-associative.
//!
//! `exprAssign` parses a unary expression speculatively and falls back to
//! `exprOr` from the same position, so unary results are memoized by
//! start position to keep nested parentheses linear.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::*;
use crate::log_debug;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind, TokenStream, TokenValue};
use std::collections::HashMap;

type RuleResult<T> = SyntaxResult<Option<T>>;

pub struct Parser {
    tokens: TokenStream,
    depth: usize,
    max_depth_reached: usize,
    /// exprUnary results by start position: the node and the position after it
    unary_memo: HashMap<usize, Option<(Expr, usize)>>,
    backtracks: usize,
    trace_backtracking: bool,
}

impl Parser {
    pub fn new(tokens: TokenStream) -> Self {
        Self::with_preferences(tokens, &SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream, preferences: &SyntaxPreferences) -> Self {
        log_debug!("Creating parser", "tokens" => tokens.len());

        Self {
            tokens,
            depth: 0,
            max_depth_reached: 0,
            unary_memo: HashMap::new(),
            backtracks: 0,
            trace_backtracking: preferences.trace_backtracking,
        }
    }

    /// `unit := (declStruct | declFunc | declVar)* End`
    pub fn parse_unit(&mut self) -> SyntaxResult<Unit> {
        let mut items = Vec::new();

        loop {
            if let Some(decl) = self.decl_struct()? {
                items.push(Item::Struct(decl));
            } else if let Some(decl) = self.decl_func()? {
                items.push(Item::Function(decl));
            } else if let Some(decl) = self.decl_var()? {
                items.push(Item::Vars(decl));
            } else {
                break;
            }
        }

        if self.tokens.check(TokenKind::End) {
            Ok(Unit { items })
        } else {
            Err(SyntaxError::top_level(self.tokens.current()))
        }
    }

    /// A single expression spanning the whole stream
    pub fn parse_expression(&mut self) -> SyntaxResult<Expr> {
        let expr = self.required_expr("expected expression")?;
        if self.tokens.check(TokenKind::End) {
            Ok(expr)
        } else {
            Err(SyntaxError::top_level(self.tokens.current()))
        }
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Number of times a rule gave back consumed tokens
    pub fn backtrack_count(&self) -> usize {
        self.backtracks
    }

    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }

    // === CURSOR HELPERS ===

    fn line(&self) -> u32 {
        self.tokens.current().line
    }

    fn fail(&self, message: &str) -> SyntaxError {
        SyntaxError::expected(self.tokens.current(), message)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> SyntaxResult<Token> {
        match self.tokens.consume(kind) {
            Some(token) => Ok(token),
            None => Err(self.fail(message)),
        }
    }

    fn consume_identifier(&mut self) -> Option<Identifier> {
        self.tokens
            .consume(TokenKind::Id)
            .and_then(|token| token.name().map(str::to_string))
    }

    fn expect_identifier(&mut self, message: &str) -> SyntaxResult<Identifier> {
        match self.consume_identifier() {
            Some(name) => Ok(name),
            None => Err(self.fail(message)),
        }
    }

    fn backtrack(&mut self, mark: usize, rule: &str) {
        if self.tokens.position() != mark {
            self.backtracks += 1;
            if self.trace_backtracking {
                log_debug!("Backtracking",
                    "rule" => rule,
                    "from" => self.tokens.position(),
                    "to" => mark
                );
            }
        }
        self.tokens.reset(mark);
    }

    /// Run a recursive rule one level deeper
    fn nested<T>(&mut self, rule: fn(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::depth_exceeded(self.tokens.current()));
        }

        self.depth += 1;
        self.max_depth_reached = self.max_depth_reached.max(self.depth);
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // === DECLARATIONS ===

    /// `declStruct := 'struct' Id '{' declVar* '}' ';'`
    fn decl_struct(&mut self) -> RuleResult<StructDecl> {
        let mark = self.tokens.mark();
        let Some(keyword) = self.tokens.consume(TokenKind::Struct) else {
            return Ok(None);
        };
        let name = self.expect_identifier("expected identifier")?;

        // `struct S x;` declares a variable
        if self.tokens.consume(TokenKind::Lacc).is_none() {
            self.backtrack(mark, "declStruct");
            return Ok(None);
        }

        let mut fields = Vec::new();
        while let Some(field) = self.decl_var()? {
            fields.push(field);
        }

        self.expect(TokenKind::Racc, "expected `}` at the end of the struct")?;
        self.expect(TokenKind::Semicolon, "expected `;` at the end of the struct")?;

        Ok(Some(StructDecl {
            name,
            fields,
            line: keyword.line,
        }))
    }

    /// `declVar := typeBase Id arrayDecl? (',' Id arrayDecl?)* ';'`
    fn decl_var(&mut self) -> RuleResult<VarDecl> {
        let line = self.line();
        let Some(base) = self.type_base()? else {
            return Ok(None);
        };

        let mut declarators = vec![self.declarator()?];
        while self.tokens.consume(TokenKind::Comma).is_some() {
            declarators.push(self.declarator()?);
        }
        self.expect(TokenKind::Semicolon, "expected `;`")?;

        Ok(Some(VarDecl {
            base,
            declarators,
            line,
        }))
    }

    fn declarator(&mut self) -> SyntaxResult<Declarator> {
        let line = self.line();
        let name = self.expect_identifier("expected identifier")?;
        let array = self.array_decl()?;
        Ok(Declarator { name, array, line })
    }

    /// `typeBase := 'int' | 'double' | 'char' | 'struct' Id`
    fn type_base(&mut self) -> RuleResult<TypeBase> {
        let base = match self.tokens.current().kind {
            TokenKind::Int => TypeBase::Int,
            TokenKind::Double => TypeBase::Double,
            TokenKind::Char => TypeBase::Char,
            TokenKind::Struct => {
                self.tokens.advance();
                let name = self.expect_identifier("expected identifier after struct")?;
                return Ok(Some(TypeBase::Struct(name)));
            }
            _ => return Ok(None),
        };
        self.tokens.advance();
        Ok(Some(base))
    }

    /// `arrayDecl := '[' expr? ']'`
    fn array_decl(&mut self) -> SyntaxResult<ArraySpec> {
        if self.tokens.consume(TokenKind::Lbracket).is_none() {
            return Ok(ArraySpec::None);
        }
        let size = self.expr()?;
        self.expect(TokenKind::Rbracket, "expected `]`")?;

        Ok(match size {
            Some(size) => ArraySpec::Sized(Box::new(size)),
            None => ArraySpec::Unsized,
        })
    }

    /// `typeName := typeBase arrayDecl?`
    fn type_name(&mut self) -> RuleResult<TypeName> {
        let Some(base) = self.type_base()? else {
            return Ok(None);
        };
        let array = self.array_decl()?;
        Ok(Some(TypeName { base, array }))
    }

    /// `declFunc := (typeBase '*'? | 'void') Id '(' (funcArg (',' funcArg)*)? ')' stmCompound`
    fn decl_func(&mut self) -> RuleResult<FuncDecl> {
        let mark = self.tokens.mark();
        let line = self.line();

        let ret = if self.tokens.consume(TokenKind::Void).is_some() {
            ReturnType::Void
        } else if let Some(base) = self.type_base()? {
            let pointer = self.tokens.consume(TokenKind::Mul).is_some();
            ReturnType::Value { base, pointer }
        } else {
            return Ok(None);
        };

        // Only `void` and `type *` rule out a variable declaration
        let committed = matches!(
            ret,
            ReturnType::Void | ReturnType::Value { pointer: true, .. }
        );

        let Some(name) = self.consume_identifier() else {
            if committed {
                return Err(self.fail("expected identifier"));
            }
            self.backtrack(mark, "declFunc");
            return Ok(None);
        };

        if self.tokens.consume(TokenKind::Lpar).is_none() {
            self.backtrack(mark, "declFunc");
            return Ok(None);
        }

        let mut params = Vec::new();
        if let Some(param) = self.func_arg()? {
            params.push(param);
            while self.tokens.consume(TokenKind::Comma).is_some() {
                match self.func_arg()? {
                    Some(param) => params.push(param),
                    None => return Err(self.fail("expected argument after comma")),
                }
            }
        }
        self.expect(TokenKind::Rpar, "expected `)` at the end of the argument list")?;

        let Some(body) = self.stm_compound()? else {
            return Err(self.fail("expected statement after function declaration"));
        };

        Ok(Some(FuncDecl {
            ret,
            name,
            params,
            body,
            line,
        }))
    }

    /// `funcArg := typeBase Id arrayDecl?`
    fn func_arg(&mut self) -> RuleResult<Param> {
        let Some(base) = self.type_base()? else {
            return Ok(None);
        };
        let name = self.expect_identifier("expected identifier")?;
        let array = self.array_decl()?;
        Ok(Some(Param { base, name, array }))
    }

    // === STATEMENTS ===

    /// `stmCompound := '{' (declVar | stm)* '}'`
    fn stm_compound(&mut self) -> RuleResult<Block> {
        if self.tokens.consume(TokenKind::Lacc).is_none() {
            return Ok(None);
        }

        let mut entries = Vec::new();
        loop {
            if let Some(decl) = self.decl_var()? {
                entries.push(BlockEntry::Decl(decl));
            } else if let Some(stmt) = self.stm()? {
                entries.push(BlockEntry::Stmt(stmt));
            } else {
                break;
            }
        }

        self.expect(TokenKind::Racc, "expected `}` at the end of the statement")?;
        Ok(Some(Block { entries }))
    }

    fn stm(&mut self) -> RuleResult<Stmt> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> RuleResult<Stmt> {
        let line = self.line();

        if let Some(block) = self.stm_compound()? {
            return Ok(Some(Stmt::Block { block, line }));
        }

        match self.tokens.current().kind {
            TokenKind::If => self.stm_if(line).map(Some),
            TokenKind::While => self.stm_while(line).map(Some),
            TokenKind::For => self.stm_for(line).map(Some),
            TokenKind::Break => {
                self.tokens.advance();
                self.expect(TokenKind::Semicolon, "expected `;` after break")?;
                Ok(Some(Stmt::Break { line }))
            }
            TokenKind::Return => {
                self.tokens.advance();
                let value = self.expr()?;
                self.expect(TokenKind::Semicolon, "expected `;` after return")?;
                Ok(Some(Stmt::Return { value, line }))
            }
            TokenKind::Semicolon => {
                self.tokens.advance();
                Ok(Some(Stmt::Empty { line }))
            }
            _ => match self.expr()? {
                Some(expr) => {
                    self.expect(TokenKind::Semicolon, "expected `;` after expression")?;
                    Ok(Some(Stmt::Expr { expr, line }))
                }
                None => Ok(None),
            },
        }
    }

    fn required_stm(&mut self, message: &str) -> SyntaxResult<Box<Stmt>> {
        match self.stm()? {
            Some(stmt) => Ok(Box::new(stmt)),
            None => Err(self.fail(message)),
        }
    }

    /// `'if' '(' expr ')' stm ('else' stm)?`
    ///
    /// An `else if` chain is read in a loop, so its links add no nesting depth.
    fn stm_if(&mut self, line: u32) -> SyntaxResult<Stmt> {
        let (cond, then_branch) = self.if_head()?;

        let mut chain = Vec::new();
        let mut tail = None;
        while self.tokens.consume(TokenKind::Else).is_some() {
            if !self.tokens.check(TokenKind::If) {
                tail = Some(self.required_stm("expected statement inside else")?);
                break;
            }
            let line = self.line();
            let (cond, then_branch) = self.if_head()?;
            chain.push((cond, then_branch, line));
        }

        let else_branch = chain
            .into_iter()
            .rev()
            .fold(tail, |else_branch, (cond, then_branch, line)| {
                Some(Box::new(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                    line,
                }))
            });

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            line,
        })
    }

    /// `'if' '(' expr ')' stm`
    fn if_head(&mut self) -> SyntaxResult<(Expr, Box<Stmt>)> {
        self.tokens.advance();
        self.expect(TokenKind::Lpar, "expected `(` at the beginning of the if statement")?;
        let cond = self.required_expr("expected expression inside if")?;
        self.expect(TokenKind::Rpar, "expected `)` at the end of the if statement")?;
        let then_branch = self.required_stm("expected statement inside if")?;
        Ok((cond, then_branch))
    }

    /// `'while' '(' expr ')' stm`
    fn stm_while(&mut self, line: u32) -> SyntaxResult<Stmt> {
        self.tokens.advance();
        self.expect(TokenKind::Lpar, "expected `(` at the beginning of the while statement")?;
        let cond = self.required_expr("expected expression inside while")?;
        self.expect(TokenKind::Rpar, "expected `)` at the end of the while statement")?;
        let body = self.required_stm("expected statement inside while")?;

        Ok(Stmt::While { cond, body, line })
    }

    /// `'for' '(' expr? ';' expr? ';' expr? ')' stm`
    fn stm_for(&mut self, line: u32) -> SyntaxResult<Stmt> {
        self.tokens.advance();
        self.expect(TokenKind::Lpar, "expected `(` at the beginning of the for statement")?;
        let init = self.expr()?;
        self.expect(
            TokenKind::Semicolon,
            "expected `;` after the first expression in for",
        )?;
        let cond = self.expr()?;
        self.expect(TokenKind::Semicolon, "expected `;` after the second expression")?;
        let step = self.expr()?;
        self.expect(TokenKind::Rpar, "expected `)` at the end of the for statement")?;
        let body = self.required_stm("expected statement inside for")?;

        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
            line,
        })
    }

    // === EXPRESSIONS ===

    fn expr(&mut self) -> RuleResult<Expr> {
        self.nested(Self::expr_assign)
    }

    fn required_expr(&mut self, message: &str) -> SyntaxResult<Expr> {
        match self.expr()? {
            Some(expr) => Ok(expr),
            None => Err(self.fail(message)),
        }
    }

    /// `exprAssign := exprUnary '=' exprAssign | exprOr`
    fn expr_assign(&mut self) -> RuleResult<Expr> {
        let mark = self.tokens.mark();

        if let Some(target) = self.expr_unary()? {
            if self.tokens.consume(TokenKind::Assign).is_some() {
                let value = self.required_expr("expected right operand")?;
                return Ok(Some(Expr::assign(target, value)));
            }
        }

        self.backtrack(mark, "exprAssign");
        self.expr_or()
    }

    /// One left-associative layer: `operand (op operand)*`
    fn binary_layer(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> RuleResult<Expr>,
        missing_operand: &str,
    ) -> RuleResult<Expr> {
        let Some(mut lhs) = operand(self)? else {
            return Ok(None);
        };

        loop {
            let kind = self.tokens.current().kind;
            let op = match BinaryOp::from_token(kind) {
                Some(op) if operators.contains(&kind) => op,
                _ => break,
            };
            self.tokens.advance();

            let Some(rhs) = operand(self)? else {
                return Err(self.fail(missing_operand));
            };
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(Some(lhs))
    }

    fn expr_or(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[TokenKind::Or],
            Self::expr_and,
            "expected expression on the right side of `or`",
        )
    }

    fn expr_and(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[TokenKind::And],
            Self::expr_eq,
            "expected expression on the right side of `and`",
        )
    }

    fn expr_eq(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[TokenKind::Equal, TokenKind::NotEq],
            Self::expr_rel,
            "expected expression on the right side of equality",
        )
    }

    fn expr_rel(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[
                TokenKind::Less,
                TokenKind::LessEq,
                TokenKind::Greater,
                TokenKind::GreaterEq,
            ],
            Self::expr_add,
            "expected expression on the right side of comparison",
        )
    }

    fn expr_add(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[TokenKind::Add, TokenKind::Sub],
            Self::expr_mul,
            "expected multiplication expression",
        )
    }

    fn expr_mul(&mut self) -> RuleResult<Expr> {
        self.binary_layer(
            &[TokenKind::Mul, TokenKind::Div],
            Self::expr_cast,
            "expected cast expression",
        )
    }

    /// `exprCast := '(' typeName ')' exprCast | exprUnary`
    fn expr_cast(&mut self) -> RuleResult<Expr> {
        if self.tokens.check(TokenKind::Lpar) {
            let mark = self.tokens.mark();
            self.tokens.advance();

            if let Some(ty) = self.type_name()? {
                self.expect(TokenKind::Rpar, "expected `)` for casting")?;
                let Some(expr) = self.nested(Self::expr_cast)? else {
                    return Err(self.fail("expected expression after casting"));
                };
                return Ok(Some(Expr::Cast {
                    ty,
                    expr: Box::new(expr),
                }));
            }

            self.backtrack(mark, "exprCast");
        }

        self.expr_unary()
    }

    fn expr_unary(&mut self) -> RuleResult<Expr> {
        let start = self.tokens.mark();

        if let Some(cached) = self.unary_memo.get(&start).cloned() {
            return Ok(cached.map(|(expr, end)| {
                self.tokens.reset(end);
                expr
            }));
        }

        let result = self.unary_uncached()?;
        let end = self.tokens.mark();
        self.unary_memo
            .insert(start, result.clone().map(|expr| (expr, end)));

        Ok(result)
    }

    /// `exprUnary := ('-' | '!') exprUnary | exprPostfix`
    fn unary_uncached(&mut self) -> RuleResult<Expr> {
        let op = match self.tokens.current().kind {
            TokenKind::Sub => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.expr_postfix(),
        };
        self.tokens.advance();

        let Some(operand) = self.nested(Self::expr_unary)? else {
            return Err(self.fail("expected unary expression"));
        };
        Ok(Some(Expr::unary(op, operand)))
    }

    /// `exprPostfix := exprPrimary ('[' expr ']' | '.' Id)*`
    fn expr_postfix(&mut self) -> RuleResult<Expr> {
        let Some(mut expr) = self.expr_primary()? else {
            return Ok(None);
        };

        loop {
            if self.tokens.consume(TokenKind::Lbracket).is_some() {
                let index = self.required_expr("expected expression after `[`")?;
                self.expect(TokenKind::Rbracket, "expected `]` after expression")?;
                expr = Expr::Index {
                    base: Box::new(expr),
                    index: Box::new(index),
                };
            } else if self.tokens.consume(TokenKind::Dot).is_some() {
                let field = self.expect_identifier("expected identifier after `.`")?;
                expr = Expr::Member {
                    base: Box::new(expr),
                    field,
                };
            } else {
                break;
            }
        }

        Ok(Some(expr))
    }

    /// `exprPrimary := Id ('(' (expr (',' expr)*)? ')')? | literal | '(' expr ')'`
    fn expr_primary(&mut self) -> RuleResult<Expr> {
        match self.tokens.current().kind {
            TokenKind::Id => {
                let Some(name) = self.consume_identifier() else {
                    return Ok(None);
                };
                if self.tokens.consume(TokenKind::Lpar).is_none() {
                    return Ok(Some(Expr::Var(name)));
                }

                let mut args = Vec::new();
                if let Some(arg) = self.expr()? {
                    args.push(arg);
                    while self.tokens.consume(TokenKind::Comma).is_some() {
                        args.push(self.required_expr("expected expression after `,`")?);
                    }
                }
                self.expect(TokenKind::Rpar, "expected `)` after expression")?;

                Ok(Some(Expr::Call { callee: name, args }))
            }
            TokenKind::CtInt | TokenKind::CtReal | TokenKind::CtChar | TokenKind::CtString => {
                let token = self.tokens.advance();
                Ok(literal(token))
            }
            TokenKind::Lpar => {
                let mark = self.tokens.mark();
                self.tokens.advance();

                // `(int)x` must reach the cast rule, so a failed inner expression backtracks
                match self.expr()? {
                    Some(inner) => {
                        self.expect(TokenKind::Rpar, "expected `)` after expression")?;
                        Ok(Some(inner))
                    }
                    None => {
                        self.backtrack(mark, "exprPrimary");
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }
}

fn literal(token: &Token) -> Option<Expr> {
    match token.value() {
        TokenValue::Int(value) => Some(Expr::Int(*value)),
        TokenValue::Real(value) => Some(Expr::Real(*value)),
        TokenValue::Char(byte) => Some(Expr::Char(*byte)),
        TokenValue::Text(text) => Some(Expr::Str(text.clone())),
        TokenValue::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source.as_bytes()).unwrap())
    }

    fn parse(source: &str) -> SyntaxResult<Unit> {
        parser(source).parse_unit()
    }

    fn parse_expr(source: &str) -> String {
        parser(source).parse_expression().unwrap().to_string()
    }

    /// Message of the error raised inside `void f() { <body> }`
    fn body_error(body: &str) -> String {
        parse(&format!("void f() {{ {} }}", body))
            .unwrap_err()
            .message
    }

    #[test]
    fn test_accepts_minimal_program() {
        let mut parser = parser("int x; void main(){ return; }");
        let unit = parser.parse_unit().unwrap();

        assert_eq!(unit.items.len(), 2);
        assert!(parser.tokens().is_at_end());
        assert_matches!(&unit.items[1], Item::Function(FuncDecl { ret: ReturnType::Void, name, .. }) if name == "main");
    }

    #[test]
    fn test_accepts_full_program() {
        let source = r#"
            struct Pt { int x, y; double w[4]; };
            struct Pt origin;
            int count;
            char *name(struct Pt p, int v[]) { return "pt"; }
            double avg(double v[], int n) {
                int i; double s;
                s = 0.0;
                for (i = 0; i < n; i = i + 1) s = s + v[i];
                if (n != 0) return s / (double)n; else return 0;
            }
            void main() {
                struct Pt a[10];
                int k;
                k = 0;
                while (k < 10 && !(a[k].x == -1)) {
                    a[k].y = k * 2;
                    if (k >= 5 || k <= 1) { break; }
                    ;
                }
                put_s("done\n", 'x');
            }
        "#;

        let unit = parse(source).unwrap();
        assert_eq!(unit.structs().count(), 1);
        assert_eq!(unit.globals().count(), 2);
        assert_eq!(unit.functions().count(), 3);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_expr("a - b - c"), "((a - b) - c)");
        assert_eq!(parse_expr("a / b * c"), "((a / b) * c)");
        assert_eq!(parse_expr("a || b || c"), "((a || b) || c)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_expr("a = b = c"), "(a = (b = c))");
        assert_eq!(parse_expr("v[0].x = 1 + 2"), "(v[0].x = (1 + 2))");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse_expr("a + b * c < d || !e && f == g"),
            "(((a + (b * c)) < d) || ((!e) && (f == g)))"
        );
        assert_eq!(parse_expr("-a * -b"), "((-a) * (-b))");
        assert_eq!(parse_expr("(a + b) * c"), "((a + b) * c)");
    }

    #[test]
    fn test_casts_and_parentheses() {
        assert_eq!(parse_expr("(int)x"), "((int)x)");
        assert_eq!(parse_expr("(double)(int)x / 2"), "(((double)((int)x)) / 2)");
        assert_eq!(parse_expr("(struct P[])p"), "((struct P[])p)");
        assert_eq!(parse_expr("(x)"), "x");
    }

    #[test]
    fn test_postfix_and_calls() {
        assert_eq!(parse_expr("v[i].x[0]"), "v[i].x[0]");
        assert_eq!(parse_expr("f(a, b + 1, g())"), "f(a, (b + 1), g())");
        assert_eq!(parse_expr("'c'"), "'c'");
        assert_eq!(parse_expr("\"s\""), "\"s\"");
        assert_eq!(parse_expr("2.5"), "2.5");
    }

    #[test]
    fn test_deep_parentheses_stay_linear() {
        let depth = 20;
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let mut parser = parser(&source);

        assert_eq!(parser.parse_expression().unwrap().to_string(), "x");
        assert!(parser.backtrack_count() < 10 * depth);
    }

    #[test]
    fn test_statements() {
        let unit = parse(
            "void f() { { } if (a) ; else b = 1; while (1) break; for (;;) ; return a; x; ; }",
        )
        .unwrap();

        let Item::Function(func) = &unit.items[0] else {
            panic!("expected function");
        };
        let kinds: Vec<&str> = func
            .body
            .entries
            .iter()
            .map(|entry| match entry {
                BlockEntry::Stmt(Stmt::Block { .. }) => "block",
                BlockEntry::Stmt(Stmt::If { else_branch: Some(_), .. }) => "if-else",
                BlockEntry::Stmt(Stmt::While { .. }) => "while",
                BlockEntry::Stmt(Stmt::For { init: None, cond: None, step: None, .. }) => "for",
                BlockEntry::Stmt(Stmt::Return { value: Some(_), .. }) => "return",
                BlockEntry::Stmt(Stmt::Expr { .. }) => "expr",
                BlockEntry::Stmt(Stmt::Empty { .. }) => "empty",
                _ => "other",
            })
            .collect();

        assert_eq!(
            kinds,
            vec!["block", "if-else", "while", "for", "return", "expr", "empty"]
        );
    }

    #[test]
    fn test_statement_lines() {
        let unit = parse("void f() {\n  x = 1;\n\n  return;\n}").unwrap();
        let Item::Function(func) = &unit.items[0] else {
            panic!("expected function");
        };
        let lines: Vec<u32> = func
            .body
            .entries
            .iter()
            .filter_map(|entry| match entry {
                BlockEntry::Stmt(stmt) => Some(stmt.line()),
                BlockEntry::Decl(_) => None,
            })
            .collect();

        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_missing_semicolon() {
        let error = parse("int x").unwrap_err();
        assert_eq!(error.line, 1);
        assert_eq!(error.to_string(), "error in line 1: expected `;`");
    }

    #[test]
    fn test_struct_alone_commits() {
        let error = parse("struct").unwrap_err();
        assert_eq!(error.message, "expected identifier");
        assert_eq!(error.kind, TokenKind::End);
    }

    #[test]
    fn test_top_level_statement_fails_unit() {
        let error = parse("x = 1;").unwrap_err();
        assert_eq!(error.to_string(), "error in line 1: top level error, found \"x\"");
    }

    #[test]
    fn test_struct_variable_backtracks() {
        let unit = parse("struct S x;").unwrap();
        assert_matches!(
            &unit.items[0],
            Item::Vars(VarDecl { base: TypeBase::Struct(name), .. }) if name == "S"
        );
    }

    #[test]
    fn test_struct_declaration() {
        let unit = parse("struct S { int a; double b[10]; };").unwrap();
        let Item::Struct(decl) = &unit.items[0] else {
            panic!("expected struct");
        };
        assert_eq!(decl.name, "S");
        assert_eq!(decl.fields.len(), 2);
        assert_matches!(decl.fields[1].declarators[0].array, ArraySpec::Sized(_));
    }

    #[test]
    fn test_declaration_errors() {
        let cases = [
            ("struct S { int a; ", "expected `}` at the end of the struct"),
            ("struct S { int a; }", "expected `;` at the end of the struct"),
            ("int a[3;", "expected `]`"),
            ("int x, ;", "expected identifier"),
            ("int 5;", "expected identifier"),
            ("void ;", "expected identifier"),
            ("int * ;", "expected identifier"),
            ("void f(struct ;", "expected identifier after struct"),
            ("int f(int a, ) {}", "expected argument after comma"),
            ("int f(int a {}", "expected `)` at the end of the argument list"),
            ("int f(int ) {}", "expected identifier"),
            ("int f() ;", "expected statement after function declaration"),
            ("void f() { int x; ", "expected `}` at the end of the statement"),
        ];

        for (source, message) in cases {
            let error = parse(source).unwrap_err();
            assert_eq!(error.message, message, "source: {}", source);
        }
    }

    #[test]
    fn test_statement_errors() {
        let cases = [
            ("if x", "expected `(` at the beginning of the if statement"),
            ("if () ;", "expected expression inside if"),
            ("if (a ;", "expected `)` at the end of the if statement"),
            ("if (a)", "expected statement inside if"),
            ("if (a) ; else", "expected statement inside else"),
            ("while x", "expected `(` at the beginning of the while statement"),
            ("while () ;", "expected expression inside while"),
            ("while (a ;", "expected `)` at the end of the while statement"),
            ("while (a)", "expected statement inside while"),
            ("for x", "expected `(` at the beginning of the for statement"),
            ("for (i = 0 i < 3;) ;", "expected `;` after the first expression in for"),
            ("for (; i ) ;", "expected `;` after the second expression"),
            ("for (;; i ;", "expected `)` at the end of the for statement"),
            ("for (;;)", "expected statement inside for"),
            ("break", "expected `;` after break"),
            ("return 1", "expected `;` after return"),
            ("a + 1", "expected `;` after expression"),
        ];

        for (body, message) in cases {
            assert_eq!(body_error(body), message, "body: {}", body);
        }
    }

    #[test]
    fn test_expression_errors() {
        let cases = [
            ("a = ;", "expected right operand"),
            ("a || ;", "expected expression on the right side of `or`"),
            ("a && ;", "expected expression on the right side of `and`"),
            ("a == ;", "expected expression on the right side of equality"),
            ("a < ;", "expected expression on the right side of comparison"),
            ("a + ;", "expected multiplication expression"),
            ("a * ;", "expected cast expression"),
            ("x = (int) ;", "expected expression after casting"),
            ("x = (int 5;", "expected `)` for casting"),
            ("x = - ;", "expected unary expression"),
            ("v[ ] ;", "expected expression after `[`"),
            ("v[1 ;", "expected `]` after expression"),
            ("s. ;", "expected identifier after `.`"),
            ("g(1, );", "expected expression after `,`"),
            ("g(1 ;", "expected `)` after expression"),
            ("(a ;", "expected `)` after expression"),
        ];

        for (body, message) in cases {
            assert_eq!(body_error(body), message, "body: {}", body);
        }
    }

    #[test]
    fn test_error_reports_current_token() {
        let error = parse("void f() {\n  x = 1\n  y = 2;\n}").unwrap_err();

        assert_eq!(error.line, 3);
        assert_eq!(error.found, Some(TokenValue::Text("y".to_string())));
        assert_eq!(
            error.to_string(),
            "error in line 3: expected `;` after expression, found \"y\""
        );
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_PARSE_DEPTH * 2;
        let source = format!(
            "void f() {{ x = {}1{}; }}",
            "(".repeat(depth),
            ")".repeat(depth)
        );

        let error = std::thread::Builder::new()
            .stack_size(64 * 1024 * 1024)
            .spawn(move || parse(&source).unwrap_err())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(error.message, "maximum nesting depth exceeded");
        assert_eq!(error.error_code(), crate::logging::codes::syntax::MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_long_else_if_chain_adds_no_depth() {
        let mut source = String::from("void f() { if (x == 0) y = 0;");
        for i in 1..=100 {
            source.push_str(&format!("\n else if (x == {}) y = {};", i, i));
        }
        source.push_str(" else y = -1; }");

        let mut parser = parser(&source);
        let unit = parser.parse_unit().unwrap();
        assert!(parser.max_depth_reached() < 10);

        let Item::Function(func) = &unit.items[0] else {
            panic!("expected a function");
        };
        let BlockEntry::Stmt(first) = &func.body.entries[0] else {
            panic!("expected a statement");
        };
        let mut stmt = first;
        let mut links = 0;
        while let Stmt::If { else_branch: Some(next), .. } = stmt {
            links += 1;
            stmt = next.as_ref();
        }
        assert_eq!(links, 101);
        assert_matches!(stmt, Stmt::Expr { line: 101, .. });
    }

    #[test]
    fn test_deep_parentheses_and_negations_parse() {
        let source = format!(
            "void f() {{ x = {}1{}; y = {}1; z = {}(int)x; }}",
            "(".repeat(60),
            ")".repeat(60),
            "-".repeat(100),
            "(int)".repeat(100)
        );

        let mut parser = parser(&source);
        parser.parse_unit().unwrap();
        assert!(parser.max_depth_reached() <= 110);
    }

    #[test]
    fn test_backtracking_trace_preference() {
        let preferences = SyntaxPreferences {
            trace_backtracking: true,
        };
        let mut parser = Parser::with_preferences(tokenize(b"int x;").unwrap(), &preferences);

        parser.parse_unit().unwrap();
        assert!(parser.backtrack_count() >= 1);
        assert!(parser.max_depth_reached() <= MAX_PARSE_DEPTH);
    }
}
