//! Emission driver: configuration and the extraction → classification → synthesis →
//! output pipeline.

use std::path::Path;

use roxygen::roxygen;

use crate::{
    api::{destination::Destination, record::WrapperRecord, source::Source},
    codegen::{
        conversion::ConversionRegistry,
        preamble::{native_alias, preamble_items},
        synthesize::FunctionSpec,
    },
    error::GenerationError,
    RawDeclaration,
};

/// Default path of the bindgen-generated `extern "C"` module
pub const DEFAULT_NATIVE_MODULE: &str = "meos_sys";

/// Builder for configuring [`Generator`] instances
///
/// # Example
///
/// ```
/// let generator = meosgen::Builder::new()
///     .native_module("crate::ffi")
///     .keep_going(false)
///     .build();
/// ```
pub struct Builder {
    pub(crate) native_module: syn::Path,
    pub(crate) keep_going: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            native_module: syn::parse_quote!(meos_sys),
            keep_going: false,
        }
    }

    /// Set the module the generated wrappers call into
    ///
    /// The module is expected to hold `extern "C"` declarations and type definitions
    /// for the native library, as produced by bindgen. It is re-exported as `_lib`
    /// from the generated file.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid Rust path; see [`validate_module_path`].
    #[roxygen]
    pub fn native_module<S: AsRef<str>>(
        mut self,
        /// Rust path of the bindings module, e.g. `crate::ffi` or `meos_sys`
        path: S,
    ) -> Self {
        self.native_module = syn::parse_str(path.as_ref())
            .unwrap_or_else(|e| panic!("invalid native module path `{}`: {e}", path.as_ref()));
        self
    }

    /// Drop declarations that cannot be generated instead of failing the whole run
    #[roxygen]
    pub fn keep_going(
        mut self,
        /// Whether unsupported parameter shapes are only logged
        keep_going: bool,
    ) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn build(self) -> Generator {
        Generator {
            builder: self,
            registry: ConversionRegistry::global(),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a native module path before handing it to [`Builder::native_module`]
pub fn validate_module_path(path: &str) -> Result<(), String> {
    syn::parse_str::<syn::Path>(path)
        .map(drop)
        .map_err(|e| format!("`{path}` is not a valid Rust path: {e}"))
}

/// Generates wrapper source from native declarations
pub struct Generator {
    builder: Builder,
    registry: &'static ConversionRegistry,
}

impl Generator {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Build the wrapper specification of one declaration
    pub fn synthesize(&self, declaration: &RawDeclaration) -> Result<FunctionSpec, GenerationError> {
        FunctionSpec::synthesize(declaration, self.registry).map_err(|source| {
            GenerationError::Declaration {
                name: declaration.name.clone(),
                location: declaration.location,
                source,
            }
        })
    }

    /// Run the whole pipeline over a source in memory
    pub fn generate(&self, source: &Source) -> Result<Destination, GenerationError> {
        let native = native_alias();
        let mut items = preamble_items(&self.builder.native_module);
        let mut records = Vec::new();
        let mut failures = Vec::new();

        for declaration in source.declarations() {
            match self.synthesize(&declaration) {
                Ok(spec) => {
                    tracing::trace!(function = %spec.name, shape = ?spec.shape, "synthesized wrapper");
                    items.push(syn::Item::Fn(spec.to_item(&native)));
                    records.push(WrapperRecord::from(&spec));
                }
                Err(error) if self.builder.keep_going => {
                    tracing::warn!(%error, "dropping declaration");
                }
                Err(error) => failures.push(error),
            }
        }

        if !failures.is_empty() {
            return Err(GenerationError::Declarations(failures));
        }
        Ok(Destination::new(items, records))
    }

    /// Read `input`, generate, and write `output`; nothing is written on failure
    #[roxygen]
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        /// Header with the native prototypes
        input: P,
        /// Rust file receiving the wrappers
        output: Q,
    ) -> Result<Destination, GenerationError> {
        let source = Source::read(input)?;
        let destination = self.generate(&source)?;
        let path = destination.write(output)?;
        tracing::info!(
            functions = destination.records().len(),
            output = %path.display(),
            "wrote wrappers"
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"
extern bool tbox_make(const Span *s, const Period *p, TBox *result);
extern bool bad_mix(const Span *s, int *count_out, TBox *result);
extern void set_srid(STBox *box, int srid);
"#;

    #[test]
    fn test_failures_abort_the_run_by_default() {
        let error = Builder::new()
            .build()
            .generate(&Source::from_text(HEADER))
            .err()
            .unwrap();
        let GenerationError::Declarations(failures) = error else {
            panic!("unexpected error {error}");
        };
        assert_eq!(failures.len(), 1);
        assert!(matches!(&failures[0], GenerationError::Declaration { name, .. } if name == "bad_mix"));
    }

    #[test]
    fn test_keep_going_drops_failing_declarations() {
        let destination = Builder::new()
            .keep_going(true)
            .build()
            .generate(&Source::from_text(HEADER))
            .unwrap();
        let names = destination.records().iter().map(|r| r.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["tbox_make", "set_srid"]);
    }

    #[test]
    fn test_native_module_is_configurable() {
        let destination = Builder::new()
            .native_module("crate::ffi")
            .build()
            .generate(&Source::from_text("extern void meos_finish(void);"))
            .unwrap();
        assert!(destination.render().contains("pub(crate) use crate::ffi as _lib;"));
    }

    #[test]
    #[should_panic(expected = "invalid native module path")]
    fn test_invalid_native_module_panics() {
        let _ = Builder::new().native_module("not a path");
    }

    #[test]
    fn test_validate_module_path() {
        assert!(validate_module_path("crate::ffi").is_ok());
        assert!(validate_module_path("meos_sys").is_ok());
        assert!(validate_module_path("1abc").is_err());
    }
}
