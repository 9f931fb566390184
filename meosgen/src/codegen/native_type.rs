//! Parsed form of a native type string such as `const Period *`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{codegen::tables::is_rust_keyword, error::SynthesisError};

/// Pointer arity of a native type; every type string resolves to exactly one shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerShape {
    NonPointer,
    SinglePointer,
    DoublePointer,
}

impl PointerShape {
    pub fn arity(self) -> usize {
        match self {
            PointerShape::NonPointer => 0,
            PointerShape::SinglePointer => 1,
            PointerShape::DoublePointer => 2,
        }
    }

    fn from_arity(arity: usize) -> Option<Self> {
        match arity {
            0 => Some(PointerShape::NonPointer),
            1 => Some(PointerShape::SinglePointer),
            2 => Some(PointerShape::DoublePointer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeType {
    pub is_const: bool,
    pub base: String,
    pub shape: PointerShape,
}

impl NativeType {
    /// Parse `["const"] base ["*" | "**"]`, stars may or may not be separated by spaces
    pub fn parse(text: &str) -> Result<Self, SynthesisError> {
        let invalid = || SynthesisError::InvalidType(text.to_string());
        let stars = text.chars().filter(|c| *c == '*').count();
        let words = text.replace('*', " ");
        let mut words = words.split_whitespace().peekable();
        let is_const = words.next_if_eq(&"const").is_some();
        let base = words.next().ok_or_else(invalid)?;
        if words.next().is_some() || !is_identifier(base) {
            return Err(invalid());
        }
        let shape = PointerShape::from_arity(stars).ok_or_else(invalid)?;
        // `const` only matters behind a pointer
        Ok(Self {
            is_const: is_const && shape != PointerShape::NonPointer,
            base: base.to_string(),
            shape,
        })
    }

    pub fn is_void(&self) -> bool {
        self.base == "void" && self.shape == PointerShape::NonPointer
    }

    /// The type one pointer level down, `None` for non-pointers
    pub fn pointee(&self) -> Option<NativeType> {
        let shape = PointerShape::from_arity(self.shape.arity().checked_sub(1)?)?;
        Some(NativeType {
            is_const: self.is_const && shape != PointerShape::NonPointer,
            base: self.base.clone(),
            shape,
        })
    }

    /// Rust spelling of the base type, `native` is the alias of the bindings module
    pub fn base_tokens(&self, native: &syn::Ident) -> TokenStream {
        match self.base.as_str() {
            "int" => quote! { ::std::os::raw::c_int },
            "char" => quote! { ::std::os::raw::c_char },
            "double" => quote! { f64 },
            "float" => quote! { f32 },
            "bool" => quote! { bool },
            "void" if self.shape == PointerShape::NonPointer => quote! { () },
            "void" => quote! { ::std::os::raw::c_void },
            base => {
                let ident = native_ident(base);
                quote! { #native::#ident }
            }
        }
    }

    /// Rust spelling of the whole type: `*const _lib::Period`, `*mut *mut _lib::Period`
    pub fn rust_tokens(&self, native: &syn::Ident) -> TokenStream {
        let base = self.base_tokens(native);
        match self.shape {
            PointerShape::NonPointer => base,
            PointerShape::SinglePointer if self.is_const => quote! { *const #base },
            PointerShape::SinglePointer => quote! { *mut #base },
            PointerShape::DoublePointer if self.is_const => quote! { *mut *const #base },
            PointerShape::DoublePointer => quote! { *mut *mut #base },
        }
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.base)?;
        if self.shape != PointerShape::NonPointer {
            write!(f, " {}", "*".repeat(self.shape.arity()))?;
        }
        Ok(())
    }
}

/// Name of a bindings item: bindgen appends `_` to C names that are Rust keywords
pub(crate) fn native_ident(name: &str) -> syn::Ident {
    if is_rust_keyword(name) {
        format_ident!("{}_", name)
    } else {
        format_ident!("{}", name)
    }
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
