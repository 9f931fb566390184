//! Tokenizer for the declaration mini-grammar.
//!
//! Only the handful of tokens that can appear in a supported prototype get their own
//! kind. Everything else (string literals, brackets, `...`, operators) becomes
//! [`TokenKind::Other`] so the parser can reject the surrounding declaration with a
//! precise location instead of silently not matching it. Comments and preprocessor
//! lines are dropped here.

use crate::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Ident(&'a str),
    Star,
    Comma,
    LParen,
    RParen,
    Semicolon,
    Other(&'a str),
}

impl std::fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(ident) => write!(f, "`{ident}`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::Other(text) => write!(f, "`{text}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub location: SourceLocation,
}

pub(crate) struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    /// True until a non-whitespace character is seen on the current line
    line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            column: 1,
            line_start: true,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = true;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.line_start = false;
            }
        }
        Some(c)
    }

    fn bump_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while self.peek_char().is_some_and(&mut predicate) {
            self.bump();
        }
    }

    /// Skip a preprocessor directive, honouring `\` line continuations
    fn skip_directive(&mut self) {
        while let Some(c) = self.bump() {
            match c {
                '\\' if self.peek_char() == Some('\n') => {
                    self.bump();
                }
                '\n' => break,
                _ => {}
            }
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if self.peek_char().is_some_and(char::is_whitespace) {
                self.bump();
            } else if rest.starts_with("//") {
                self.bump_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                self.bump();
                self.bump();
                while !self.rest().is_empty() && !self.rest().starts_with("*/") {
                    self.bump();
                }
                self.bump();
                self.bump();
            } else if rest.starts_with('#') && self.line_start {
                self.skip_directive();
            } else {
                break;
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.skip_trivia();
        let location = self.location();
        let start = self.offset;
        let c = self.bump()?;
        let kind = match c {
            '*' => TokenKind::Star,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ';' => TokenKind::Semicolon,
            c if c == '_' || c.is_ascii_alphabetic() => {
                self.bump_while(|c| c == '_' || c.is_ascii_alphanumeric());
                TokenKind::Ident(&self.text[start..self.offset])
            }
            '"' | '\'' => {
                let mut escaped = false;
                while let Some(next) = self.bump() {
                    match next {
                        '\\' if !escaped => escaped = true,
                        next if next == c && !escaped => break,
                        _ => escaped = false,
                    }
                }
                TokenKind::Other(&self.text[start..self.offset])
            }
            '.' if self.rest().starts_with("..") => {
                self.bump();
                self.bump();
                TokenKind::Other("...")
            }
            c if c.is_ascii_digit() => {
                self.bump_while(|c| c == '_' || c == '.' || c.is_ascii_alphanumeric());
                TokenKind::Other(&self.text[start..self.offset])
            }
            _ => TokenKind::Other(&self.text[start..self.offset]),
        };
        Some(Token { kind, location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind<'_>> {
        Lexer::new(text).map(|t| t.kind).collect()
    }

    #[test]
    fn test_prototype_tokens() {
        assert_eq!(
            kinds("extern int *f(const Foo **x);"),
            vec![
                TokenKind::Ident("extern"),
                TokenKind::Ident("int"),
                TokenKind::Star,
                TokenKind::Ident("f"),
                TokenKind::LParen,
                TokenKind::Ident("const"),
                TokenKind::Ident("Foo"),
                TokenKind::Star,
                TokenKind::Star,
                TokenKind::Ident("x"),
                TokenKind::RParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_and_directives_are_skipped() {
        let text = "#include <meos.h>\n/* block\n comment */ extern // tail\n  #define X 1\nvoid";
        assert_eq!(kinds(text), vec![TokenKind::Ident("extern"), TokenKind::Ident("void")]);
    }

    #[test]
    fn test_directive_continuation() {
        let text = "#define LONG(a) \\\n  extern int a;\nbool";
        assert_eq!(kinds(text), vec![TokenKind::Ident("bool")]);
    }

    #[test]
    fn test_hash_inside_line_is_not_a_directive() {
        assert_eq!(kinds("a # b"), vec![
            TokenKind::Ident("a"),
            TokenKind::Other("#"),
            TokenKind::Ident("b"),
        ]);
    }

    #[test]
    fn test_ellipsis_and_literals() {
        assert_eq!(
            kinds(r#"extern "C" (...)"#),
            vec![
                TokenKind::Ident("extern"),
                TokenKind::Other(r#""C""#),
                TokenKind::LParen,
                TokenKind::Other("..."),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_locations() {
        let tokens = Lexer::new("a\n  b").collect::<Vec<_>>();
        assert_eq!(tokens[1].location, SourceLocation { offset: 4, line: 2, column: 3 });
    }
}
