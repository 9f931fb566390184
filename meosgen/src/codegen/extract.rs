//! Declaration extractor: a recursive-descent parser over the prototype mini-grammar
//!
//! ```text
//! declaration := "extern" type IDENT "(" params ")" ";"
//! type        := ["const"] IDENT "*"{0,2}
//! params      := "void" | param ("," param)* | <empty>
//! param       := type IDENT
//! ```
//!
//! Every `extern` keyword in the input starts one parse attempt. Attempts that fail
//! (variadics, function pointer parameters, arrays, variables, three or more pointer
//! levels, `extern "C"` blocks) are reported as [`ParseError`]s and scanning resumes at
//! the token that broke the grammar.

use std::iter::Peekable;

use crate::{
    codegen::lexer::{Lexer, Token, TokenKind},
    error::ParseError,
    RawDeclaration, SourceLocation,
};

const MAX_POINTER_DEPTH: usize = 2;

/// Lazy, source ordered sequence of parse attempts over a header text
pub struct Extractor<'a> {
    tokens: Peekable<Lexer<'a>>,
    end: SourceLocation,
}

/// `["const"] IDENT "*"*` as written in the header
struct TypeSpec<'a> {
    is_const: bool,
    base: &'a str,
    pointers: usize,
}

impl TypeSpec<'_> {
    fn qualified_base(&self) -> String {
        if self.is_const {
            format!("const {}", self.base)
        } else {
            self.base.to_string()
        }
    }

    /// Return type text: `char *`, `TimestampTz **`, `bool`
    fn render(&self) -> String {
        if self.pointers == 0 {
            self.qualified_base()
        } else {
            format!("{} {}", self.qualified_base(), "*".repeat(self.pointers))
        }
    }

    /// Parameter text with pointer markers on the name: `const Period *p`
    fn render_with_name(&self, name: &str) -> String {
        format!("{} {}{}", self.qualified_base(), "*".repeat(self.pointers), name)
    }
}

impl<'a> Extractor<'a> {
    pub fn new(text: &'a str) -> Self {
        let last_line = text.rsplit('\n').next().unwrap_or_default();
        let end = SourceLocation {
            offset: text.len(),
            line: text.matches('\n').count() + 1,
            column: last_line.chars().count() + 1,
        };
        Self {
            tokens: Lexer::new(text).peekable(),
            end,
        }
    }

    fn eof(&self) -> ParseError {
        ParseError::UnexpectedEof { location: self.end }
    }

    fn peek(&mut self) -> Result<Token<'a>, ParseError> {
        match self.tokens.peek() {
            Some(token) => Ok(*token),
            None => Err(self.eof()),
        }
    }

    fn unexpected(expected: &'static str, token: Token<'_>) -> ParseError {
        ParseError::Unexpected {
            expected,
            found: token.kind.to_string(),
            location: token.location,
        }
    }

    /// Consume the next token if it has the given kind
    fn expect(&mut self, kind: TokenKind<'static>, expected: &'static str) -> Result<(), ParseError> {
        let token = self.peek()?;
        if token.kind == kind {
            self.tokens.next();
            Ok(())
        } else {
            Err(Self::unexpected(expected, token))
        }
    }

    fn ident(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Ident(ident) => {
                self.tokens.next();
                Ok(ident)
            }
            _ => Err(Self::unexpected(expected, token)),
        }
    }

    fn eat(&mut self, kind: TokenKind<'static>) -> bool {
        if self.tokens.peek().is_some_and(|t| t.kind == kind) {
            self.tokens.next();
            true
        } else {
            false
        }
    }

    fn type_spec(&mut self) -> Result<TypeSpec<'a>, ParseError> {
        let is_const = self.eat(TokenKind::Ident("const"));
        let base = self.ident("type name")?;
        let start = self.peek().map(|t| t.location).unwrap_or(self.end);
        let mut pointers = 0;
        while self.eat(TokenKind::Star) {
            pointers += 1;
        }
        if pointers > MAX_POINTER_DEPTH {
            return Err(ParseError::PointerDepth {
                depth: pointers,
                location: start,
            });
        }
        Ok(TypeSpec {
            is_const,
            base,
            pointers,
        })
    }

    fn params(&mut self) -> Result<String, ParseError> {
        if self.peek()?.kind == TokenKind::RParen {
            return Ok(String::new());
        }
        let mut params = Vec::new();
        loop {
            let ty = self.type_spec()?;
            let is_bare_void = ty.base == "void" && ty.pointers == 0 && !ty.is_const;
            if is_bare_void && params.is_empty() && self.peek()?.kind == TokenKind::RParen {
                return Ok("void".to_string());
            }
            let name = self.ident("parameter name")?;
            params.push(ty.render_with_name(name));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(params.join(", "))
    }

    /// Parse one declaration; the leading `extern` has already been consumed
    fn declaration(&mut self, location: SourceLocation) -> Result<RawDeclaration, ParseError> {
        let return_type = self.type_spec()?;
        let name = self.ident("function name")?;
        self.expect(TokenKind::LParen, "`(`")?;
        let params = self.params()?;
        self.expect(TokenKind::RParen, "`,` or `)`")?;
        self.expect(TokenKind::Semicolon, "`;`")?;
        Ok(RawDeclaration::new(return_type.render(), name, params, location))
    }
}

impl Iterator for Extractor<'_> {
    type Item = Result<RawDeclaration, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = self.tokens.next()?;
            if token.kind == TokenKind::Ident("extern") {
                return Some(self.declaration(token.location));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(text: &str) -> Vec<RawDeclaration> {
        Extractor::new(text).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_simple_declarations() {
        let text = r#"
extern bool period_shift_tscale(Period *p, Interval *start, Interval *duration);
extern void set_srid(STBox *box, int srid);
extern char *period_out(const Period *p);
"#;
        let decls = declarations(text);
        assert_eq!(decls.len(), 3);
        assert_eq!(decls[0].return_type, "bool");
        assert_eq!(decls[0].name, "period_shift_tscale");
        assert_eq!(decls[0].params, "Period *p, Interval *start, Interval *duration");
        assert_eq!(decls[1].return_type, "void");
        assert_eq!(decls[1].params, "STBox *box, int srid");
        assert_eq!(decls[2].return_type, "char *");
        assert_eq!(decls[2].params, "const Period *p");
        assert_eq!(decls[0].location.line, 2);
    }

    #[test]
    fn test_declaration_spanning_lines() {
        let text = "extern TimestampTz **\nperiodset_timestamps(const PeriodSet *ps,\n    int *count_out);";
        let decls = declarations(text);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].return_type, "TimestampTz **");
        assert_eq!(decls[0].params, "const PeriodSet *ps, int *count_out");
    }

    #[test]
    fn test_pointer_on_type_side_is_normalized() {
        let decls = declarations("extern Period* period_copy(const Period* p);");
        assert_eq!(decls[0].return_type, "Period *");
        assert_eq!(decls[0].params, "const Period *p");
    }

    #[test]
    fn test_void_and_empty_parameter_lists() {
        let decls = declarations("extern void meos_initialize(void);\nextern void meos_finish();");
        assert_eq!(decls[0].params, "void");
        assert_eq!(decls[1].params, "");
    }

    #[test]
    fn test_unsupported_shapes_are_reported_and_skipped() {
        let text = r#"
extern int printf_like(const char *fmt, ...);
extern void callback(int (*fn)(int));
extern int ***too_deep(int x);
extern void arrays(int values[]);
extern int global_counter;
extern "C" {
extern bool kept(int x);
}
extern void too_deep_param(char ***argv);
"#;
        let results = Extractor::new(text).collect::<Vec<_>>();
        assert_eq!(results.len(), 8);
        let kept = results.iter().filter_map(|r| r.as_ref().ok()).collect::<Vec<_>>();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "kept");
        assert!(matches!(results[2], Err(ParseError::PointerDepth { depth: 3, .. })));
        assert!(matches!(results[7], Err(ParseError::PointerDepth { depth: 3, .. })));
    }

    #[test]
    fn test_truncated_declaration_does_not_hide_the_next_one() {
        let text = "extern int broken(int x\nextern int fine(int y);";
        let results = Extractor::new(text).collect::<Vec<_>>();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().name, "fine");
    }

    #[test]
    fn test_truncated_input() {
        let results = Extractor::new("extern int f(int").collect::<Vec<_>>();
        assert!(matches!(results[..], [Err(ParseError::UnexpectedEof { .. })]));
    }

    #[test]
    fn test_unnamed_parameter_is_rejected() {
        let results = Extractor::new("extern int f(const Period *);").collect::<Vec<_>>();
        assert!(matches!(
            &results[..],
            [Err(ParseError::Unexpected { expected: "parameter name", .. })]
        ));
    }
}
