//! Builder DSL parser implementation.

use super::error::ParseError;
use crate::dsl::ast::{Argument, Expr, ExprKind, Invocation, LambdaBody, Literal, Member};
use crate::dsl::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Builder DSL parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
        }
    }

    /// Parses every statement up to the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` at the first token that does not fit the
    /// grammar.
    pub fn parse_program(&mut self) -> Result<Vec<Invocation>, ParseError> {
        let mut statements = Vec::new();
        while !self.current.is_eof() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parses a single `target.Method(args);` statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a call statement.
    pub fn parse_statement(&mut self) -> Result<Invocation, ParseError> {
        let invocation = self.parse_invocation()?;
        self.expect(&TokenKind::Semicolon)?;
        Ok(invocation)
    }

    /// Parses `target.Method(args)`.
    fn parse_invocation(&mut self) -> Result<Invocation, ParseError> {
        let start = self.current.span;
        let target = self.expect_identifier()?;
        self.expect(&TokenKind::Dot)?;
        let method = self.expect_identifier()?;
        self.parse_call_arguments(target, method, start)
    }

    /// Parses the parenthesised argument list of a call whose target and
    /// method have been consumed.
    fn parse_call_arguments(
        &mut self,
        target: String,
        method: String,
        start: Span,
    ) -> Result<Invocation, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_argument()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Invocation {
            target,
            method,
            args,
            span: start.merge(self.previous.span),
        })
    }

    /// Parses `name: value` or a bare value.
    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        let start = self.current.span;
        let name = if matches!(self.current.kind, TokenKind::Identifier(_))
            && self.peek_kind() == TokenKind::Colon
        {
            let name = self.expect_identifier()?;
            self.advance(); // :
            Some(name)
        } else {
            None
        };
        let value = self.parse_expression()?;
        Ok(Argument {
            name,
            span: start.merge(value.span),
            value,
        })
    }

    /// Parses an expression.
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span;
        let kind = match &self.current.kind {
            TokenKind::String(s) => {
                let literal = Literal::String(s.clone());
                self.advance();
                ExprKind::Literal(literal)
            }
            TokenKind::Integer(_) | TokenKind::Long(_) | TokenKind::Double(_) => {
                ExprKind::Literal(self.parse_number(false)?)
            }
            TokenKind::Minus => {
                self.advance();
                ExprKind::Literal(self.parse_number(true)?)
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                ExprKind::Literal(Literal::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                ExprKind::Literal(Literal::Bool(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ExprKind::Literal(Literal::Null)
            }
            TokenKind::Keyword(Keyword::New) => self.parse_new()?,
            TokenKind::Identifier(_) if self.peek_kind() == TokenKind::Arrow => {
                self.parse_lambda()?
            }
            TokenKind::Identifier(_) => {
                let segments = self.parse_path()?;
                if self.check(&TokenKind::LeftParen) {
                    match <[String; 2]>::try_from(segments) {
                        Ok([target, method]) => {
                            ExprKind::Call(self.parse_call_arguments(target, method, start)?)
                        }
                        Err(_) => {
                            return Err(ParseError::new(
                                "Calls must have the form target.Method(...)",
                                start.merge(self.previous.span),
                            ));
                        }
                    }
                } else {
                    ExprKind::Path(segments)
                }
            }
            _ => return Err(self.error_at_current("expression")),
        };
        Ok(Expr {
            kind,
            span: start.merge(self.previous.span),
        })
    }

    /// Parses a numeric literal, applying a preceding minus sign.
    fn parse_number(&mut self, negative: bool) -> Result<Literal, ParseError> {
        let literal = match self.current.kind {
            TokenKind::Integer(n) => Literal::Integer {
                value: i128::from(n),
                long: false,
            },
            TokenKind::Long(n) => Literal::Integer {
                value: i128::from(n),
                long: true,
            },
            TokenKind::Double(d) => Literal::Double(d),
            _ => return Err(self.error_at_current("number")),
        };
        self.advance();
        Ok(match literal {
            Literal::Integer { value, long } if negative => Literal::Integer {
                value: -value,
                long,
            },
            Literal::Double(d) if negative => Literal::Double(-d),
            other => other,
        })
    }

    /// Parses `new[] { ... }` or `new { ... }`.
    fn parse_new(&mut self) -> Result<ExprKind, ParseError> {
        self.advance(); // new
        if self.check(&TokenKind::LeftBracket) {
            self.advance();
            self.expect(&TokenKind::RightBracket)?;
            self.expect(&TokenKind::LeftBrace)?;
            let mut elements = Vec::new();
            while !self.check(&TokenKind::RightBrace) {
                elements.push(self.parse_expression()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(&TokenKind::RightBrace)?;
            return Ok(ExprKind::Array(elements));
        }

        if !self.check(&TokenKind::LeftBrace) {
            return Err(self.error_at_current("'[' or '{'"));
        }
        self.advance();
        let mut members = Vec::new();
        while !self.check(&TokenKind::RightBrace) {
            members.push(self.parse_member()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RightBrace)?;
        Ok(ExprKind::Object(members))
    }

    /// Parses `Name = value` or a projected path.
    fn parse_member(&mut self) -> Result<Member, ParseError> {
        let start = self.current.span;
        if matches!(self.current.kind, TokenKind::Identifier(_)) && self.peek_kind() == TokenKind::Eq
        {
            let name = self.expect_identifier()?;
            self.advance(); // =
            let value = self.parse_expression()?;
            return Ok(Member::Named {
                name,
                span: start.merge(value.span),
                value,
            });
        }
        let segments = self.parse_path()?;
        Ok(Member::Path {
            segments,
            span: start.merge(self.previous.span),
        })
    }

    /// Parses `param => expr` or `param => { statements }`.
    fn parse_lambda(&mut self) -> Result<ExprKind, ParseError> {
        let param = self.expect_identifier()?;
        self.expect(&TokenKind::Arrow)?;
        let body = if self.check(&TokenKind::LeftBrace) {
            self.advance();
            let mut statements = Vec::new();
            while !self.check(&TokenKind::RightBrace) {
                if self.current.is_eof() {
                    return Err(self.error_at_current("'}'"));
                }
                statements.push(self.parse_statement()?);
            }
            self.advance(); // }
            LambdaBody::Block(statements)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expression()?))
        };
        Ok(ExprKind::Lambda { param, body })
    }

    /// Parses `a.b.c`.
    fn parse_path(&mut self) -> Result<Vec<String>, ParseError> {
        let mut segments = vec![self.expect_identifier()?];
        while self.check(&TokenKind::Dot) {
            self.advance();
            segments.push(self.expect_identifier()?);
        }
        Ok(segments)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Builds an error for the current token, surfacing lexer errors as-is.
    fn error_at_current(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Error(message) => ParseError::new(message.clone(), self.current.span),
            kind => ParseError::unexpected(expected, kind.clone(), self.current.span),
        }
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_at_current(&kind.to_string()))
        }
    }

    /// Expects and returns an identifier.
    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_at_current("identifier")),
        }
    }
}
