use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Generate Rust wrapper functions from MEOS C function prototypes
#[derive(Debug, Parser)]
#[command(name = "meosgen", version)]
struct Args {
    /// Header with the `extern` prototypes
    input: PathBuf,

    /// Rust file receiving the generated wrappers
    #[arg(short, long)]
    output: PathBuf,

    /// Rust path of the bindgen module the wrappers call into
    #[arg(long, default_value = meosgen::DEFAULT_NATIVE_MODULE, value_parser = parse_module_path)]
    native_module: String,

    /// Also write a JSON-lines manifest of the generated wrappers
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Skip declarations whose parameters cannot be wrapped instead of failing
    #[arg(long)]
    keep_going: bool,

    /// Log skipped declarations
    #[arg(short, long)]
    verbose: bool,
}

fn parse_module_path(path: &str) -> Result<String, String> {
    meosgen::validate_module_path(path).map(|()| path.to_string())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);
    if let Err(err) = real_main(args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(args: Args) -> Result<()> {
    let generator = meosgen::Builder::new()
        .native_module(&args.native_module)
        .keep_going(args.keep_going)
        .build();

    let source = meosgen::Source::read(&args.input)
        .with_context(|| format!("reading declarations from {}", args.input.display()))?;
    let destination = generator
        .generate(&source)
        .with_context(|| format!("generating wrappers for {}", args.input.display()))?;

    // Manifest first: if it fails, the wrapper file is left untouched
    if let Some(manifest) = &args.manifest {
        destination
            .write_manifest(manifest)
            .with_context(|| format!("writing manifest {}", manifest.display()))?;
    }
    let output = destination
        .write(&args.output)
        .with_context(|| format!("writing wrappers to {}", args.output.display()))?;

    tracing::info!(
        functions = destination.records().len(),
        output = %output.display(),
        "wrote wrappers"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["meosgen", "meos.h", "-o", "out.rs"]).unwrap();
        assert_eq!(args.native_module, "meos_sys");
        assert!(!args.keep_going);
        assert!(args.manifest.is_none());
    }

    #[test]
    fn test_invalid_module_path_is_rejected() {
        let result = Args::try_parse_from(["meosgen", "meos.h", "-o", "out.rs", "--native-module", "a b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_real_main_writes_output_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("meos.h");
        std::fs::write(&input, "extern void set_srid(STBox *box, int srid);\n").unwrap();
        let output = dir.path().join("functions.rs");
        let manifest = dir.path().join("functions.jsonl");
        let args = Args::try_parse_from([
            OsStr::new("meosgen"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
            OsStr::new("--manifest"),
            manifest.as_os_str(),
        ])
        .unwrap();
        real_main(args).unwrap();
        assert!(std::fs::read_to_string(&output).unwrap().contains("pub unsafe fn set_srid("));
        assert_eq!(meosgen::read_manifest(&manifest).unwrap().len(), 1);
    }

    #[test]
    fn test_real_main_fails_without_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("functions.rs");
        let args = Args::try_parse_from([
            OsStr::new("meosgen"),
            dir.path().join("missing.h").as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();
        assert!(real_main(args).is_err());
        assert!(!output.exists());
    }
}
