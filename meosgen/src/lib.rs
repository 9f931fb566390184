//! # meosgen
//!
//! Generates Rust wrapper functions from the public function prototypes of the MEOS
//! C library.
//!
//! ## Problem
//!
//! bindgen turns a C header into raw `extern "C"` declarations. Calling them directly
//! means converting strings, timestamps and intervals by hand at every call site,
//! allocating buffers for values the library returns through pointer parameters, and
//! checking boolean status flags. With several hundred functions this boilerplate
//! dominates any binding.
//!
//! ## Solution
//!
//! `meosgen` reads the header, recognises prototypes of the form
//! `extern <Type> <name>(<params>);` and writes one wrapper per prototype:
//!
//! - parameters are converted through a fixed conversion registry (`&str`,
//!   `DateTime<Utc>`, `TimeDelta`, integers); other types pass through as handles
//! - a trailing `result` parameter becomes the returned value; when the native
//!   function returns `bool` the wrapper returns `Result<_, StatusError>`
//! - parameters named `*_out` are appended to a returned tuple
//!
//! Declarations outside this narrow grammar (variadics, function pointers, three
//! pointer levels) are skipped.
//!
//! ## Usage example
//!
//! ```rust,no_run
//! // build.rs
//! fn main() {
//!     let generator = meosgen::Builder::new().native_module("crate::ffi").build();
//!     let source = meosgen::Source::read("meos.h").unwrap();
//!     let destination = generator.generate(&source).unwrap();
//!     destination.write_to_out_dir("meos_functions.rs").unwrap();
//! }
//! ```
//!
//! ```rust,ignore
//! // lib.rs
//! mod ffi; // bindgen output
//! include!(concat!(env!("OUT_DIR"), "/meos_functions.rs"));
//! ```

pub(crate) mod api;
pub(crate) mod codegen;
pub(crate) mod error;
pub(crate) mod utils;

pub use crate::api::builder::{validate_module_path, Builder, Generator, DEFAULT_NATIVE_MODULE};
pub use crate::api::declaration::{RawDeclaration, SourceLocation};
pub use crate::api::destination::Destination;
pub use crate::api::record::{RecordParam, WrapperRecord};
pub use crate::api::source::Source;
pub use crate::codegen::classify::{classify_parameter, Parameter, RawParameter, Role};
pub use crate::codegen::conversion::{Conversion, ConversionRegistry, Converter, HostType, Strategy};
pub use crate::codegen::extract::Extractor;
pub use crate::codegen::native_type::{NativeType, PointerShape};
pub use crate::codegen::synthesize::{Argument, FunctionSpec, ReturnShape};
pub use crate::error::{GenerationError, ParseError, SynthesisError};

/// Read a manifest written by [`Destination::write_manifest`]
pub fn read_manifest<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<WrapperRecord>, GenerationError> {
    crate::utils::jsonl::read_jsonl_file(path)
}
