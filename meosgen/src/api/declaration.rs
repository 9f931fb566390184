use serde::{Deserialize, Serialize};

/// A native prototype as recognised by the extractor, before any classification.
///
/// The parameter list is kept as canonical text (`const Base *name, ...`), pointer
/// markers attached to the parameter name the way the library headers write them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    /// Return type text, e.g. `bool`, `char *`, `const Period *`
    pub return_type: String,
    /// Name of the native function
    pub name: String,
    /// Comma separated parameter list, `void` for an explicit empty list
    pub params: String,
    /// Where the `extern` keyword of the declaration starts
    pub location: SourceLocation,
}

impl RawDeclaration {
    pub fn new(
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            params: params.into(),
            location,
        }
    }

    /// Raw parameter tokens, trimmed, in declared order
    pub fn param_tokens(&self) -> impl Iterator<Item = &str> {
        self.params
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

impl std::fmt::Display for RawDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separator = if self.return_type.ends_with('*') { "" } else { " " };
        write!(
            f,
            "extern {}{}{}({});",
            self.return_type, separator, self.name, self.params
        )
    }
}

/// Position of a declaration in the input artifact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLocation {
    /// Byte offset of the first character
    pub offset: usize,
    /// The line number (1-based)
    pub line: usize,
    /// The column number (1-based)
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_tokens_are_trimmed() {
        let decl = RawDeclaration::new(
            "bool",
            "tbox_make",
            "const Span *s, const Period *p,  TBox *result",
            SourceLocation::default(),
        );
        let tokens = decl.param_tokens().collect::<Vec<_>>();
        assert_eq!(tokens, ["const Span *s", "const Period *p", "TBox *result"]);
    }

    #[test]
    fn test_display_matches_header_style() {
        let decl = RawDeclaration::new("char *", "period_out", "const Period *p", SourceLocation::default());
        assert_eq!(decl.to_string(), "extern char *period_out(const Period *p);");

        let decl = RawDeclaration::new("void", "meos_finish", "void", SourceLocation::default());
        assert_eq!(decl.to_string(), "extern void meos_finish(void);");
    }
}
