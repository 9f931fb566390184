//! Code generation: extraction, classification, conversion lookup and synthesis.

pub(crate) mod classify;
pub(crate) mod conversion;
pub(crate) mod extract;
pub(crate) mod lexer;
pub(crate) mod native_type;
pub(crate) mod preamble;
pub(crate) mod synthesize;
pub(crate) mod tables;
