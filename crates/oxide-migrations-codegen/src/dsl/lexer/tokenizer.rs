//! Builder DSL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes builder DSL input.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // Single-line comments (// ...)
            if self.peek() == Some('/') && self.peek_next() == Some('/') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Multi-line comments (/* ... */)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a span from start to current position.
    const fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    /// Creates a token with the current span.
    const fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Scans an identifier or keyword. A leading `@` makes the identifier
    /// verbatim: it is never a keyword.
    fn scan_identifier(&mut self, verbatim: bool) -> Token {
        let name_start = self.pos;
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }
        let text = &self.input[name_start..self.pos];

        match Keyword::from_str(text) {
            Some(keyword) if !verbatim => self.make_token(TokenKind::Keyword(keyword)),
            _ => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans a number: integer, `L`-suffixed long, or double.
    fn scan_number(&mut self) -> Token {
        let mut is_double = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_double = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_double = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return self.error("Missing exponent digits");
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let input = self.input;
        let text = &input[self.start..self.pos];
        let suffix = self.peek();

        if !is_double && matches!(suffix, Some('L' | 'l')) {
            self.advance();
            return match text.parse::<u64>() {
                Ok(n) => self.make_token(TokenKind::Long(n)),
                Err(e) => self.error(format!("Invalid long literal: {e}")),
            };
        }
        if matches!(suffix, Some('D' | 'd')) {
            self.advance();
            is_double = true;
        }
        if self.peek().is_some_and(is_identifier_part) {
            self.advance();
            return self.error("Invalid numeric literal suffix");
        }

        if is_double {
            match text.parse::<f64>() {
                Ok(d) => self.make_token(TokenKind::Double(d)),
                Err(e) => self.error(format!("Invalid double literal: {e}")),
            }
        } else {
            match text.parse::<u64>() {
                Ok(n) => self.make_token(TokenKind::Integer(n)),
                Err(e) => self.error(format!("Invalid integer literal: {e}")),
            }
        }
    }

    /// Scans exactly four hex digits of a `\u` escape.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        let digits_start = self.pos;
        for _ in 0..4 {
            if !self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            self.advance();
        }
        u32::from_str_radix(&self.input[digits_start..self.pos], 16)
            .ok()
            .and_then(char::from_u32)
    }

    /// Scans a regular string literal with backslash escapes.
    fn scan_string(&mut self) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('0') => '\0',
                        Some('u') => match self.scan_unicode_escape() {
                            Some(c) => c,
                            None => return self.error("Invalid unicode escape"),
                        },
                        Some(c) => return self.error(format!("Unknown escape sequence: \\{c}")),
                        None => return self.error("Unterminated string literal"),
                    };
                    value.push(escaped);
                }
                Some('\n') | None => return self.error("Unterminated string literal"),
                Some(c) => value.push(c),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans a verbatim string literal (`@"..."`, with `""` for a quote).
    fn scan_verbatim_string(&mut self) -> Token {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('"') if self.peek() == Some('"') => {
                    self.advance();
                    value.push('"');
                }
                Some('"') => break,
                Some(c) => value.push(c),
                None => return self.error("Unterminated verbatim string literal"),
            }
        }

        self.make_token(TokenKind::String(value))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '"' => return self.scan_string(),
            '@' => {
                self.advance();
                return match self.peek() {
                    Some('"') => self.scan_verbatim_string(),
                    Some(c) if is_identifier_start(c) => self.scan_identifier(true),
                    _ => self.error("Expected identifier or string after '@'"),
                };
            }
            c if c.is_ascii_digit() => return self.scan_number(),
            c if is_identifier_start(c) => return self.scan_identifier(false),
            _ => {}
        }

        self.advance();
        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            ':' => self.make_token(TokenKind::Colon),
            '-' => self.make_token(TokenKind::Minus),
            '=' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.make_token(TokenKind::Arrow)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with EOF.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize()
    }

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds(""), vec![TokenKind::Eof]);
        assert_eq!(token_kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("mb // trailing\n/* block\n */ ;"),
            vec![
                TokenKind::Identifier("mb".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_call() {
        assert_eq!(
            token_kinds("mb.DropTable(name: \"Post\");"),
            vec![
                TokenKind::Identifier("mb".into()),
                TokenKind::Dot,
                TokenKind::Identifier("DropTable".into()),
                TokenKind::LeftParen,
                TokenKind::Identifier("name".into()),
                TokenKind::Colon,
                TokenKind::String("Post".into()),
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            token_kinds("new true false null New TRUE"),
            vec![
                TokenKind::Keyword(Keyword::New),
                TokenKind::Keyword(Keyword::True),
                TokenKind::Keyword(Keyword::False),
                TokenKind::Keyword(Keyword::Null),
                TokenKind::Identifier("New".into()),
                TokenKind::Identifier("TRUE".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_verbatim_identifiers() {
        assert_eq!(
            token_kinds("@new @Post"),
            vec![
                TokenKind::Identifier("new".into()),
                TokenKind::Identifier("Post".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("1 2L 3l 1.5 1e300 2.5e-3 4D 18446744073709551615"),
            vec![
                TokenKind::Integer(1),
                TokenKind::Long(2),
                TokenKind::Long(3),
                TokenKind::Double(1.5),
                TokenKind::Double(1e300),
                TokenKind::Double(2.5e-3),
                TokenKind::Double(4.0),
                TokenKind::Integer(u64::MAX),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_number_errors() {
        assert!(matches!(
            &token_kinds("18446744073709551616")[0],
            TokenKind::Error(m) if m.starts_with("Invalid integer literal")
        ));
        assert!(matches!(&token_kinds("1x")[0], TokenKind::Error(_)));
        assert!(matches!(&token_kinds("1e")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_negative_number_is_two_tokens() {
        assert_eq!(
            token_kinds("-5"),
            vec![TokenKind::Minus, TokenKind::Integer(5), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            token_kinds(r#""a\"b\\c\n\r\t\0\u00e9""#),
            vec![TokenKind::String("a\"b\\c\n\r\t\0é".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_verbatim_string() {
        assert_eq!(
            token_kinds(r#"@"say ""hi"" \n""#),
            vec![TokenKind::String("say \"hi\" \\n".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_errors() {
        assert!(matches!(&token_kinds("\"open")[0], TokenKind::Error(_)));
        assert!(matches!(&token_kinds("\"bad \\q\"")[0], TokenKind::Error(_)));
        assert!(matches!(&token_kinds("\"\\u12\"")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_lambda_punctuation() {
        assert_eq!(
            token_kinds("x => new { x.A, B = 1 } new[] { }"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Arrow,
                TokenKind::Keyword(Keyword::New),
                TokenKind::LeftBrace,
                TokenKind::Identifier("x".into()),
                TokenKind::Dot,
                TokenKind::Identifier("A".into()),
                TokenKind::Comma,
                TokenKind::Identifier("B".into()),
                TokenKind::Eq,
                TokenKind::Integer(1),
                TokenKind::RightBrace,
                TokenKind::Keyword(Keyword::New),
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("mb.Sql(\"x\")");
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[2].span, Span::new(3, 6));
        assert_eq!(tokens[4].span, Span::new(7, 10));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            token_kinds("#")[0],
            TokenKind::Error("Unexpected character: #".into())
        );
    }
}
