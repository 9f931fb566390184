use std::{
    fs,
    path::{Path, PathBuf},
};

use roxygen::roxygen;

use crate::{codegen::extract::Extractor, error::GenerationError, error::ParseError, RawDeclaration};

/// The input artifact: the full text of a header with the native prototypes
pub struct Source {
    path: Option<PathBuf>,
    text: String,
}

impl Source {
    /// Read the whole header at once
    #[roxygen]
    pub fn read<P: AsRef<Path>>(
        /// Path to the header file with `extern` prototypes
        path: P,
    ) -> Result<Self, GenerationError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| GenerationError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path: Some(path),
            text,
        })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every parse attempt, including the ones that fell outside the supported grammar
    pub fn scan(&self) -> impl Iterator<Item = Result<RawDeclaration, ParseError>> + '_ {
        Extractor::new(&self.text)
    }

    /// Supported declarations in source order; the rest are skipped
    pub fn declarations(&self) -> impl Iterator<Item = RawDeclaration> + '_ {
        self.scan().filter_map(|attempt| {
            attempt
                .inspect_err(|error| tracing::debug!(%error, "skipping unsupported declaration"))
                .ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = r#"
/* meos.h excerpt */
#include <stdbool.h>

extern void meos_initialize(const char *tz_str);
extern int printf_like(const char *fmt, ...);
extern char *period_out(const Period *p);
"#;

    #[test]
    fn test_declarations_skip_unsupported() {
        let source = Source::from_text(HEADER);
        let names = source.declarations().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(names, ["meos_initialize", "period_out"]);
        assert_eq!(source.scan().count(), 3);
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(HEADER.as_bytes()).unwrap();
        let source = Source::read(file.path()).unwrap();
        assert_eq!(source.path(), Some(file.path()));
        assert_eq!(source.text(), HEADER);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.h");
        let error = Source::read(&missing).err().unwrap();
        assert!(matches!(error, GenerationError::Read { path, .. } if path == missing));
    }
}
