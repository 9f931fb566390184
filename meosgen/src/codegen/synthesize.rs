//! Function synthesizer: one classified declaration → one wrapper function.

use itertools::Itertools;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use serde::{Deserialize, Serialize};

use crate::{
    codegen::{
        classify::{classify_parameters, Parameter, Role},
        conversion::{Conversion, ConversionRegistry},
        native_type::{native_ident, NativeType, PointerShape},
        tables::{is_rust_keyword, manual_note},
    },
    error::SynthesisError,
    RawDeclaration, SourceLocation,
};

/// What the wrapper hands back to its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnShape {
    /// The native function returns `void` and writes nothing back
    None,
    /// The converted native return value
    Value,
    /// The converted `result` buffer; the native return value is discarded
    Carried,
    /// The converted `result` buffer when the native `bool` return is true, an error otherwise
    Checked,
    /// The converted native return value followed by every output buffer
    Tuple,
}

/// A parameter together with the conversion used to render it.
///
/// Inputs carry the conversion of their own type. Result and output carriers carry
/// the conversion of their pointee, which is what the buffer holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub parameter: Parameter,
    pub conversion: Conversion,
}

impl Argument {
    fn ident(&self) -> syn::Ident {
        make_ident(&self.parameter.name)
    }

    /// Local variable holding the buffer of a result or output carrier
    fn buffer_ident(&self) -> syn::Ident {
        match self.parameter.role {
            Role::Result => format_ident!("out_{}", self.parameter.name),
            _ => self.ident(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    /// Every parameter in declared order, as passed to the native call
    pub arguments: Vec<Argument>,
    pub return_conversion: Conversion,
    pub shape: ReturnShape,
    pub note: Option<&'static str>,
    pub location: SourceLocation,
}

fn make_ident(name: &str) -> syn::Ident {
    // these cannot be raw identifiers
    if matches!(name, "self" | "Self" | "super" | "crate") {
        format_ident!("{}_", name)
    } else if is_rust_keyword(name) {
        syn::Ident::new_raw(name, Span::call_site())
    } else {
        syn::Ident::new(name, Span::call_site())
    }
}

impl FunctionSpec {
    /// Classify a declaration and resolve every type against the registry
    pub fn synthesize(
        declaration: &RawDeclaration,
        registry: &ConversionRegistry,
    ) -> Result<Self, SynthesisError> {
        let parameters = classify_parameters(declaration.param_tokens())?;
        let return_type = NativeType::parse(&declaration.return_type)?;
        let return_conversion = registry.lookup(&return_type).into_owned();

        let arguments = parameters
            .into_iter()
            .map(|parameter| {
                let resolved = match parameter.role {
                    Role::Input => parameter.native_type.clone(),
                    Role::Result | Role::Output => parameter
                        .native_type
                        .pointee()
                        .filter(|pointee| !pointee.is_void())
                        .ok_or_else(|| SynthesisError::NotABuffer {
                            name: parameter.name.clone(),
                            native_type: parameter.native_type.to_string(),
                        })?,
                };
                let conversion = registry.lookup(&resolved).into_owned();
                Ok(Argument {
                    parameter,
                    conversion,
                })
            })
            .collect::<Result<Vec<_>, SynthesisError>>()?;

        let has_result = arguments.iter().any(|a| a.parameter.role == Role::Result);
        let has_outputs = arguments.iter().any(|a| a.parameter.role == Role::Output);
        let returns_status =
            return_type.base == "bool" && return_type.shape == PointerShape::NonPointer;
        let shape = match (has_result, has_outputs) {
            (true, _) if returns_status => ReturnShape::Checked,
            (true, _) => ReturnShape::Carried,
            (false, true) => ReturnShape::Tuple,
            (false, false) if return_type.is_void() => ReturnShape::None,
            (false, false) => ReturnShape::Value,
        };

        Ok(Self {
            name: declaration.name.clone(),
            arguments,
            return_conversion,
            shape,
            note: manual_note(&declaration.name),
            location: declaration.location,
        })
    }

    /// Parameters of the wrapper signature, in declared order
    pub fn inputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments
            .iter()
            .filter(|a| a.parameter.role == Role::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Argument> {
        self.arguments
            .iter()
            .filter(|a| a.parameter.role == Role::Output)
    }

    pub fn result(&self) -> Option<&Argument> {
        self.arguments
            .iter()
            .find(|a| a.parameter.role == Role::Result)
    }

    fn returns_void(&self) -> bool {
        self.return_conversion.native_type.is_void()
    }

    /// Human readable return type, `None` when the wrapper returns nothing
    pub fn return_type_name(&self) -> Option<String> {
        match self.shape {
            ReturnShape::None => None,
            ReturnShape::Value => Some(self.return_conversion.host_type.return_name()),
            ReturnShape::Carried => self.result().map(|r| r.conversion.host_type.return_name()),
            ReturnShape::Checked => self
                .result()
                .map(|r| format!("Result<{}, StatusError>", r.conversion.host_type.return_name())),
            ReturnShape::Tuple => {
                let names = self
                    .tuple_primary()
                    .map(|c| c.host_type.return_name())
                    .into_iter()
                    .chain(self.outputs().map(|o| o.conversion.host_type.return_name()))
                    .collect::<Vec<_>>();
                Some(match &names[..] {
                    [single] => single.clone(),
                    names => format!("({})", names.iter().join(", ")),
                })
            }
        }
    }

    /// The primary element of a tuple return, absent when the native return is `void`
    fn tuple_primary(&self) -> Option<&Conversion> {
        (!self.returns_void()).then_some(&self.return_conversion)
    }

    /// Render the wrapper as a Rust function calling into the `native` module
    pub fn to_item(&self, native: &syn::Ident) -> syn::ItemFn {
        let name = make_ident(&self.name);
        let name_str = &self.name;

        let params = self.inputs().map(|input| {
            let ident = input.ident();
            let ty = input.conversion.host_type.param_tokens(native);
            quote! { #ident: #ty }
        });

        let buffers = self
            .arguments
            .iter()
            .filter(|a| a.parameter.role != Role::Input)
            .map(|carrier| {
                let ident = carrier.buffer_ident();
                let ty = carrier.conversion.native_type.rust_tokens(native);
                quote! { let mut #ident: #ty = ::std::mem::zeroed(); }
            })
            .collect::<Vec<_>>();

        let call_args = self.arguments.iter().map(|argument| match argument.parameter.role {
            Role::Input => argument
                .conversion
                .host_to_native(argument.ident().into_token_stream(), native),
            Role::Result | Role::Output => {
                let ident = argument.buffer_ident();
                quote! { &mut #ident }
            }
        });
        let native_name = native_ident(&self.name);
        let call = quote! { #native::#native_name(#(#call_args),*) };

        let converted_buffer = |carrier: &Argument| {
            let ident = carrier.buffer_ident();
            carrier.conversion.native_to_host(quote! { #ident }, native)
        };
        let converted_result = self.return_conversion.native_to_host(quote! { result }, native);

        let value_body = || {
            let ty = self.return_conversion.host_type.return_tokens(native);
            (
                quote! { -> #ty },
                quote! {
                    let result = #call;
                    #converted_result
                },
            )
        };

        let (output, body): (TokenStream, TokenStream) = match (self.shape, self.result()) {
            (ReturnShape::None, _) => (quote! {}, quote! { #call; }),
            (ReturnShape::Checked, Some(carrier)) => {
                let ty = carrier.conversion.host_type.return_tokens(native);
                let value = converted_buffer(carrier);
                (
                    quote! { -> Result<#ty, StatusError> },
                    quote! {
                        let result = #call;
                        if result {
                            Ok(#value)
                        } else {
                            Err(StatusError::new(#name_str, result))
                        }
                    },
                )
            }
            (ReturnShape::Carried, Some(carrier)) => {
                let ty = carrier.conversion.host_type.return_tokens(native);
                let value = converted_buffer(carrier);
                (quote! { -> #ty }, quote! { #call; #value })
            }
            (ReturnShape::Tuple, _) => {
                let (call_stmt, primary, primary_ty) = match self.tuple_primary() {
                    Some(conversion) => {
                        let ty = conversion.host_type.return_tokens(native);
                        (quote! { let result = #call; }, Some(converted_result.clone()), Some(ty))
                    }
                    None => (quote! { #call; }, None, None),
                };
                let values = primary
                    .into_iter()
                    .chain(self.outputs().map(converted_buffer))
                    .collect::<Vec<_>>();
                let types = primary_ty
                    .into_iter()
                    .chain(self.outputs().map(|o| o.conversion.host_type.return_tokens(native)))
                    .collect::<Vec<_>>();
                match (&values[..], &types[..]) {
                    ([value], [ty]) => (quote! { -> #ty }, quote! { #call_stmt #value }),
                    _ => (
                        quote! { -> (#(#types),*) },
                        quote! { #call_stmt (#(#values),*) },
                    ),
                }
            }
            // Carried and Checked always have a carrier
            (ReturnShape::Value | ReturnShape::Carried | ReturnShape::Checked, _) => value_body(),
        };

        let note = self.note.map(|note| {
            let note = format!(" Note: {note}");
            quote! { #[doc = #note] }
        });

        syn::parse_quote! {
            #note
            pub unsafe fn #name(#(#params),*) #output {
                unsafe {
                    #(#buffers)*
                    #body
                }
            }
        }
    }
}
