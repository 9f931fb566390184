fn main() {
    let header = concat!(env!("CARGO_MANIFEST_DIR"), "/../meosgen/tests/resources/meos.h");
    println!("cargo:rerun-if-changed={header}");

    let source = meosgen::Source::read(header).unwrap();
    meosgen::Builder::new()
        .native_module("crate::meos_sys")
        .build()
        .generate(&source)
        .unwrap()
        .write_to_out_dir("meos_functions.rs")
        .unwrap();
}
