//! Parameter classifier: raw parameter tokens → named, typed parameters with roles.

use itertools::Itertools;

use crate::{
    codegen::{
        native_type::{is_identifier, NativeType},
        tables::{remap_name, OUTPUT_SUFFIX, RESULT_PARAM},
    },
    error::SynthesisError,
};

/// How a parameter takes part in the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Visible in the wrapper signature
    Input,
    /// Secondary value written by the native call, appended to a returned tuple
    Output,
    /// Primary value written by the native call, the native return becomes a status
    Result,
}

/// A parameter token split into name and type, before roles are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: String,
    pub native_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub native_type: NativeType,
    pub role: Role,
}

/// Split one parameter token; a bare `void` yields `None`
///
/// Pointer markers written on the name (`*p`, `**ps`) are folded into the type.
pub fn classify_parameter(token: &str) -> Option<RawParameter> {
    let token = token.trim();
    if token == "void" || token.is_empty() {
        return None;
    }
    let (type_part, name_part) = match token.rsplit_once(char::is_whitespace) {
        Some((type_part, name_part)) => (type_part.trim_end().to_string(), name_part),
        None => (String::new(), token),
    };
    let mut native_type = type_part;
    if name_part.starts_with("**") {
        native_type.push_str(" **");
    } else if name_part.starts_with('*') {
        native_type.push_str(" *");
    }
    let name = name_part.trim_start_matches('*');
    Some(RawParameter {
        name: remap_name(name).to_string(),
        native_type,
    })
}

/// Assign roles over a whole parameter list
///
/// `*_out` names are output carriers only when the list has at least two parameters.
/// A `result` parameter is the result carrier only in last position; anywhere else it
/// is an ordinary input. A result carrier cannot be mixed with output carriers.
pub fn assign_roles(params: Vec<RawParameter>) -> Result<Vec<Parameter>, SynthesisError> {
    let count = params.len();
    let carries_values = count >= 2;

    let results = params
        .iter()
        .positions(|p| carries_values && p.name == RESULT_PARAM)
        .collect::<Vec<_>>();
    if results.len() > 1 {
        return Err(SynthesisError::MultipleResults { count: results.len() });
    }
    let carrier = results.first().copied().filter(|position| position + 1 == count);

    let outputs = params
        .iter()
        .filter(|p| carries_values && p.name.ends_with(OUTPUT_SUFFIX))
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();
    if carrier.is_some() && !outputs.is_empty() {
        return Err(SynthesisError::ResultWithOutputs { outputs });
    }

    params
        .into_iter()
        .enumerate()
        .map(|(position, raw)| {
            if !is_identifier(&raw.name) {
                return Err(SynthesisError::InvalidIdentifier(raw.name));
            }
            let role = if carrier == Some(position) {
                Role::Result
            } else if outputs.contains(&raw.name) {
                Role::Output
            } else {
                Role::Input
            };
            Ok(Parameter {
                native_type: NativeType::parse(&raw.native_type)?,
                name: raw.name,
                role,
            })
        })
        .collect()
}

/// Classify every token of a raw parameter list and assign roles
pub fn classify_parameters<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Parameter>, SynthesisError> {
    assign_roles(tokens.into_iter().filter_map(classify_parameter).collect())
}
