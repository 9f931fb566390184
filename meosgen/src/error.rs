//! Error types for every stage of the generator.

use std::path::PathBuf;

use crate::SourceLocation;

/// A declaration that starts with `extern` but falls outside the supported grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{location}: expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: String,
        location: SourceLocation,
    },
    #[error("{location}: pointer depth {depth} is not supported (at most 2)")]
    PointerDepth { depth: usize, location: SourceLocation },
    #[error("{location}: unexpected end of input")]
    UnexpectedEof { location: SourceLocation },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Unexpected { location, .. }
            | ParseError::PointerDepth { location, .. }
            | ParseError::UnexpectedEof { location } => *location,
        }
    }
}

/// A declaration whose parameter shape cannot be turned into a correct wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("more than one `result` parameter ({count})")]
    MultipleResults { count: usize },
    #[error("`result` parameter combined with output parameters: {outputs:?}")]
    ResultWithOutputs { outputs: Vec<String> },
    #[error("parameter `{name}` of type `{native_type}` cannot carry a returned value")]
    NotABuffer { name: String, native_type: String },
    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),
    #[error("`{0}` is not a valid native type")]
    InvalidType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("cannot generate `{name}` at {location}: {source}")]
    Declaration {
        name: String,
        location: SourceLocation,
        #[source]
        source: SynthesisError,
    },
    #[error("{} declaration(s) could not be generated:\n{}", .0.len(), itertools::join(.0.iter(), "\n"))]
    Declarations(Vec<GenerationError>),
}
