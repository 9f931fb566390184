use std::path::{Path, PathBuf};
use std::env;

use crate::{
    api::record::WrapperRecord,
    codegen::preamble::BANNER,
    error::GenerationError,
    utils::{jsonl::write_jsonl_file, write_atomically},
};

/// The output artifact: preamble plus one wrapper per declaration, in source order
pub struct Destination {
    file: syn::File,
    records: Vec<WrapperRecord>,
}

impl Destination {
    pub(crate) fn new(items: Vec<syn::Item>, records: Vec<WrapperRecord>) -> Self {
        Self {
            file: syn::File {
                shebang: None,
                attrs: vec![],
                items,
            },
            records,
        }
    }

    /// Records of the generated wrappers, in source order
    pub fn records(&self) -> &[WrapperRecord] {
        &self.records
    }

    /// Render the generated Rust source
    pub fn render(&self) -> String {
        format!("{BANNER}{}", prettyplease::unparse(&self.file))
    }

    /// Write the Rust file to the specified path, atomically
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, GenerationError> {
        let path = path.as_ref().to_path_buf();
        write_atomically(&path, self.render().as_bytes())?;
        Ok(path)
    }

    /// Write the Rust file into `OUT_DIR`, for use from build scripts
    pub fn write_to_out_dir<P: AsRef<Path>>(&self, filename: P) -> Result<PathBuf, GenerationError> {
        let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
        self.write(PathBuf::from(out_dir).join(filename))
    }

    /// Write the JSON-lines manifest of the generated wrappers
    pub fn write_manifest<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, GenerationError> {
        let path = path.as_ref().to_path_buf();
        write_jsonl_file(&path, &self.records)?;
        Ok(path)
    }
}
