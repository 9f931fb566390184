//! Fixed configuration tables. They are plain data and never change during a run.

/// Name of the parameter a native call writes its primary value into
pub const RESULT_PARAM: &str = "result";

/// Suffix marking parameters the native call writes secondary values into
pub const OUTPUT_SUFFIX: &str = "_out";

/// Parameter names that clash with Rust keywords or read ambiguously
const NAME_REMAP: &[(&str, &str)] = &[
    ("str", "string"),
    ("is", "iset"),
    ("box", "bbox"),
    ("type", "kind"),
    ("in", "input"),
    ("ref", "reference"),
    ("fn", "func"),
    ("self", "this"),
    ("Self", "self_type"),
    ("super", "parent"),
    ("crate", "krate"),
];

/// Functions whose generated wrapper deserves a second look from a human
const MANUAL_NOTES: &[(&str, &str)] = &[
    (
        "period_shift_tscale",
        "result parameter is also input. start and duration parameters can be null.",
    ),
    ("timestampset_shift_tscale", "start and duration parameters can be null."),
    ("periodset_shift_tscale", "start and duration parameters can be null."),
    ("periodset_timestamps", "count is an output parameter."),
    ("periodset_periods", "count is an output parameter."),
];

/// Strict and reserved Rust keywords, emitted as raw identifiers when not remapped
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

pub fn remap_name(name: &str) -> &str {
    NAME_REMAP
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |(_, to)| *to)
}

pub fn manual_note(function: &str) -> Option<&'static str> {
    MANUAL_NOTES
        .iter()
        .find(|(name, _)| *name == function)
        .map(|(_, note)| *note)
}

pub fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap() {
        assert_eq!(remap_name("str"), "string");
        assert_eq!(remap_name("is"), "iset");
        assert_eq!(remap_name("box"), "bbox");
        assert_eq!(remap_name("period"), "period");
    }

    #[test]
    fn test_keywords_that_cannot_be_raw_are_remapped() {
        for keyword in ["self", "Self", "super", "crate"] {
            assert!(is_rust_keyword(keyword));
            assert_ne!(remap_name(keyword), keyword);
        }
    }

    #[test]
    fn test_manual_notes() {
        assert_eq!(manual_note("periodset_periods"), Some("count is an output parameter."));
        assert_eq!(manual_note("period_in"), None);
    }
}
