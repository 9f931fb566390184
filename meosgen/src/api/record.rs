use serde::{Deserialize, Serialize};

use crate::{codegen::synthesize::ReturnShape, FunctionSpec, SourceLocation};

/// One generated wrapper as seen by code calling it.
///
/// The parameter order is the native declared order without result and output
/// carriers; higher level bindings rely on it staying stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrapperRecord {
    /// Native function name, which is also the wrapper name
    pub name: String,
    pub params: Vec<RecordParam>,
    /// Returned host type, absent when the wrapper returns nothing
    pub returns: Option<String>,
    pub shape: ReturnShape,
    pub note: Option<String>,
    pub source_location: SourceLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordParam {
    pub name: String,
    pub host_type: String,
}

impl From<&FunctionSpec> for WrapperRecord {
    fn from(spec: &FunctionSpec) -> Self {
        Self {
            name: spec.name.clone(),
            params: spec
                .inputs()
                .map(|input| RecordParam {
                    name: input.parameter.name.clone(),
                    host_type: input.conversion.host_type.to_string(),
                })
                .collect(),
            returns: spec.return_type_name(),
            shape: spec.shape,
            note: spec.note.map(str::to_string),
            source_location: spec.location,
        }
    }
}

impl WrapperRecord {
    pub fn to_jsonl_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
