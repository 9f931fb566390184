//! Conversion registry: native type → host type plus per-direction converter steps.
//!
//! Primitive and value types are registered explicitly. Every other type resolves to
//! one of three synthesized strategies picked by its [`PointerShape`], so a lookup
//! never fails and never builds anything but a fixed [`Converter`] variant.

use std::{borrow::Cow, collections::HashMap, sync::OnceLock};

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::codegen::native_type::{NativeType, PointerShape};

/// Type seen by the code that calls a generated wrapper
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostType {
    /// No value, `()`
    Unit,
    /// A Rust primitive with the same layout as the native type (`bool`, `f64`, `i32`)
    Primitive(&'static str),
    /// `&str` going in, `String` coming out
    Text,
    /// `chrono::DateTime<Utc>`
    DateTime,
    /// `chrono::TimeDelta`
    TimeDelta,
    /// The native type itself, trusted to be a valid handle
    Handle(NativeType),
    /// `Vec` of element handles going in; the native array comes out untouched
    HandleSequence(NativeType),
}

impl HostType {
    /// Rust type of a wrapper parameter
    pub fn param_tokens(&self, native: &syn::Ident) -> TokenStream {
        match self {
            HostType::Text => quote! { &str },
            HostType::HandleSequence(native_type) => {
                let element = native_type
                    .pointee()
                    .map(|element| element.rust_tokens(native))
                    .unwrap_or_else(|| native_type.rust_tokens(native));
                quote! { Vec<#element> }
            }
            other => other.return_tokens(native),
        }
    }

    /// Rust type of a value handed back by a wrapper
    pub fn return_tokens(&self, native: &syn::Ident) -> TokenStream {
        match self {
            HostType::Unit => quote! { () },
            HostType::Primitive(name) => {
                let ident = format_ident!("{}", name);
                quote! { #ident }
            }
            HostType::Text => quote! { String },
            HostType::DateTime => quote! { ::chrono::DateTime<::chrono::Utc> },
            HostType::TimeDelta => quote! { ::chrono::TimeDelta },
            HostType::Handle(native_type) | HostType::HandleSequence(native_type) => {
                native_type.rust_tokens(native)
            }
        }
    }

    /// Short human readable name of the returned type, used in manifests
    pub fn return_name(&self) -> String {
        match self {
            HostType::Text => "String".to_string(),
            HostType::HandleSequence(native_type) => native_type.to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for HostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostType::Unit => write!(f, "()"),
            HostType::Primitive(name) => write!(f, "{name}"),
            HostType::Text => write!(f, "&str"),
            HostType::DateTime => write!(f, "DateTime<Utc>"),
            HostType::TimeDelta => write!(f, "TimeDelta"),
            HostType::Handle(native_type) => write!(f, "{native_type}"),
            HostType::HandleSequence(native_type) => match native_type.pointee() {
                Some(element) => write!(f, "Vec<{element}>"),
                None => write!(f, "Vec<{native_type}>"),
            },
        }
    }
}

/// One conversion step. Casts and pins target the native type of the owning
/// [`Conversion`]; helpers are functions emitted in the generated preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// `(expr) as T`
    Cast,
    /// `::core::convert::identity::<T>(expr)`, a typed pass-through for non-primitive values
    Pin,
    /// `helper(expr)`
    Helper(&'static str),
    /// `&mut helper(expr)`, a native temporary living for the duration of the call
    HelperRef(&'static str),
    /// `to_cstring(expr).as_ptr() as T`, for text the native side only reads
    CString,
    /// `to_cbuffer(expr).as_mut_ptr()`, an owned NUL-terminated buffer the native side may write
    CBuffer,
    /// Cast every element of a host `Vec` and hand the collected array to the call
    CollectHandles,
}

impl Converter {
    /// Render this step around `expr`
    #[roxygen::roxygen]
    pub fn apply(
        &self,
        /// Expression to convert
        expr: TokenStream,
        /// Native type on the native side of the conversion
        target: &NativeType,
        /// Alias of the bindings module
        native: &syn::Ident,
    ) -> TokenStream {
        let target_tokens = target.rust_tokens(native);
        match self {
            Converter::Cast => quote! { (#expr) as #target_tokens },
            Converter::Pin => quote! { ::core::convert::identity::<#target_tokens>(#expr) },
            Converter::Helper(helper) => {
                let helper = format_ident!("{}", helper);
                quote! { #helper(#expr) }
            }
            Converter::HelperRef(helper) => {
                let helper = format_ident!("{}", helper);
                quote! { &mut #helper(#expr) }
            }
            Converter::CString => quote! { to_cstring(#expr).as_ptr() as #target_tokens },
            Converter::CBuffer => quote! { to_cbuffer(#expr).as_mut_ptr() },
            Converter::CollectHandles => {
                let element = target
                    .pointee()
                    .map(|element| element.rust_tokens(native))
                    .unwrap_or(target_tokens);
                quote! {
                    #expr
                        .iter()
                        .map(|handle| *handle as #element)
                        .collect::<Vec<_>>()
                        .as_mut_ptr()
                }
            }
        }
    }
}

/// Where a [`Conversion`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Explicit,
    NonPointer,
    SinglePointer,
    DoublePointer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub native_type: NativeType,
    pub host_type: HostType,
    /// Host → native step; `None` passes the value unchanged
    pub to_native: Option<Converter>,
    /// Native → host step; `None` passes the value unchanged
    pub to_host: Option<Converter>,
    pub strategy: Strategy,
}

impl Conversion {
    fn explicit(
        native_type: &str,
        host_type: HostType,
        to_native: Option<Converter>,
        to_host: Option<Converter>,
    ) -> Option<Self> {
        Some(Self {
            native_type: NativeType::parse(native_type).ok()?,
            host_type,
            to_native,
            to_host,
            strategy: Strategy::Explicit,
        })
    }

    fn synthesize(native_type: &NativeType) -> Self {
        let (host_type, to_native, to_host, strategy) = match native_type.shape {
            PointerShape::DoublePointer => (
                HostType::HandleSequence(native_type.clone()),
                Some(Converter::CollectHandles),
                None,
                Strategy::DoublePointer,
            ),
            PointerShape::SinglePointer => (
                HostType::Handle(native_type.clone()),
                Some(Converter::Cast),
                Some(Converter::Cast),
                Strategy::SinglePointer,
            ),
            PointerShape::NonPointer => (
                HostType::Handle(native_type.clone()),
                Some(Converter::Pin),
                Some(Converter::Pin),
                Strategy::NonPointer,
            ),
        };
        Self {
            native_type: native_type.clone(),
            host_type,
            to_native,
            to_host,
            strategy,
        }
    }

    /// Expression handed to the native call for a host value
    pub fn host_to_native(&self, expr: TokenStream, native: &syn::Ident) -> TokenStream {
        match &self.to_native {
            Some(converter) => converter.apply(expr, &self.native_type, native),
            None => expr,
        }
    }

    /// Expression handed back to the host for a native value
    pub fn native_to_host(&self, expr: TokenStream, native: &syn::Ident) -> TokenStream {
        match &self.to_host {
            Some(converter) => converter.apply(expr, &self.native_type, native),
            None => expr,
        }
    }
}

/// Native type → [`Conversion`], read-only once built
pub struct ConversionRegistry {
    explicit: HashMap<String, Conversion>,
}

impl ConversionRegistry {
    fn new() -> Self {
        use Converter::*;
        use HostType::*;

        let mut entries = vec![
            Conversion::explicit("void", Unit, None, None),
            Conversion::explicit("bool", Primitive("bool"), None, None),
            Conversion::explicit("double", Primitive("f64"), None, None),
            Conversion::explicit("float", Primitive("f32"), None, None),
            Conversion::explicit("int", Primitive("i32"), None, None),
            Conversion::explicit("char *", Text, Some(CBuffer), Some(Helper("from_cstring"))),
            Conversion::explicit("const char *", Text, Some(CString), Some(Helper("from_cstring"))),
            Conversion::explicit(
                "TimestampTz",
                DateTime,
                Some(Helper("datetime_to_timestamptz")),
                Some(Helper("timestamptz_to_datetime")),
            ),
            Conversion::explicit("Timestamp", Primitive("i64"), Some(Cast), None),
            Conversion::explicit("TimeOffset", Primitive("i64"), Some(Cast), None),
            Conversion::explicit(
                "Interval *",
                TimeDelta,
                Some(HelperRef("timedelta_to_interval")),
                Some(Helper("interval_to_timedelta")),
            ),
            Conversion::explicit(
                "const Interval *",
                TimeDelta,
                Some(HelperRef("timedelta_to_interval")),
                Some(Helper("interval_to_timedelta")),
            ),
        ];
        for (native_type, host_type) in [
            ("int8", "i8"),
            ("int16", "i16"),
            ("int32", "i32"),
            ("int64", "i64"),
            ("uint8", "u8"),
            ("uint16", "u16"),
            ("uint32", "u32"),
            ("uint64", "u64"),
        ] {
            entries.push(Conversion::explicit(native_type, Primitive(host_type), Some(Cast), None));
        }

        let explicit = entries
            .into_iter()
            .flatten()
            .map(|conversion| (conversion.native_type.to_string(), conversion))
            .collect();
        Self { explicit }
    }

    /// The process-wide registry
    pub fn global() -> &'static ConversionRegistry {
        static REGISTRY: OnceLock<ConversionRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ConversionRegistry::new)
    }

    pub fn is_registered(&self, native_type: &NativeType) -> bool {
        self.explicit.contains_key(&native_type.to_string())
    }

    /// Resolve a native type; unregistered types get the strategy of their pointer shape
    pub fn lookup(&self, native_type: &NativeType) -> Cow<'_, Conversion> {
        match self.explicit.get(&native_type.to_string()) {
            Some(conversion) => Cow::Borrowed(conversion),
            None => Cow::Owned(Conversion::synthesize(native_type)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native() -> syn::Ident {
        format_ident!("_lib")
    }

    fn lookup(text: &str) -> Conversion {
        let native_type = NativeType::parse(text).unwrap();
        ConversionRegistry::global().lookup(&native_type).into_owned()
    }

    #[test]
    fn test_explicit_entries_are_returned_verbatim() {
        let text = lookup("const char *");
        assert_eq!(text.strategy, Strategy::Explicit);
        assert_eq!(text.host_type, HostType::Text);
        assert_eq!(text.to_native, Some(Converter::CString));

        let int = lookup("int");
        assert_eq!(int.host_type, HostType::Primitive("i32"));
        assert_eq!(int.host_to_native(quote! { x }, &native()).to_string(), "x");
        assert_eq!(int.native_to_host(quote! { x }, &native()).to_string(), "x");
    }

    #[test]
    fn test_mutable_text_gets_a_writable_buffer() {
        let text = lookup("char *");
        assert_eq!(text.to_native, Some(Converter::CBuffer));
        assert_eq!(
            text.host_to_native(quote! { s }, &native()).to_string(),
            quote! { to_cbuffer(s).as_mut_ptr() }.to_string()
        );
        assert_eq!(
            text.native_to_host(quote! { r }, &native()).to_string(),
            quote! { from_cstring(r) }.to_string()
        );
    }

    #[test]
    fn test_unregistered_single_pointer_casts_both_ways() {
        let foo = lookup("Foo *");
        assert_eq!(foo.strategy, Strategy::SinglePointer);
        assert_eq!(foo.host_type.to_string(), "Foo *");
        let expected = quote! { (h) as *mut _lib::Foo }.to_string();
        assert_eq!(foo.host_to_native(quote! { h }, &native()).to_string(), expected);
        assert_eq!(foo.native_to_host(quote! { h }, &native()).to_string(), expected);
    }

    #[test]
    fn test_unregistered_value_is_pinned() {
        let datum = lookup("Datum");
        assert_eq!(datum.strategy, Strategy::NonPointer);
        assert_eq!(
            datum.host_to_native(quote! { d }, &native()).to_string(),
            quote! { ::core::convert::identity::<_lib::Datum>(d) }.to_string()
        );
    }

    #[test]
    fn test_double_pointer_collects_handles() {
        let periods = lookup("const Period **");
        assert_eq!(periods.strategy, Strategy::DoublePointer);
        assert_eq!(periods.host_type.to_string(), "Vec<const Period *>");
        assert_eq!(
            periods.host_type.param_tokens(&native()).to_string(),
            quote! { Vec<*const _lib::Period> }.to_string()
        );
        assert_eq!(
            periods.host_type.return_tokens(&native()).to_string(),
            quote! { *mut *const _lib::Period }.to_string()
        );
        assert_eq!(
            periods.host_to_native(quote! { ps }, &native()).to_string(),
            quote! {
                ps.iter()
                    .map(|handle| *handle as *const _lib::Period)
                    .collect::<Vec<_>>()
                    .as_mut_ptr()
            }
            .to_string()
        );
        assert_eq!(periods.native_to_host(quote! { r }, &native()).to_string(), "r");
    }

    #[test]
    fn test_const_qualifier_is_part_of_the_key() {
        assert_eq!(lookup("const char *").strategy, Strategy::Explicit);
        assert_eq!(lookup("const Interval *").host_type, HostType::TimeDelta);
        assert_eq!(lookup("const Period *").strategy, Strategy::SinglePointer);
    }

    #[test]
    fn test_timestamp_helpers() {
        let ts = lookup("TimestampTz");
        assert_eq!(
            ts.native_to_host(quote! { t }, &native()).to_string(),
            quote! { timestamptz_to_datetime(t) }.to_string()
        );
        assert_eq!(ts.host_type.return_name(), "DateTime<Utc>");
    }
}
