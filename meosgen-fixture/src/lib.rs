//! Wrappers generated by `meosgen` from `meosgen/tests/resources/meos.h` at build
//! time, compiled against [`meos_sys`].

pub mod meos_sys;

include!(concat!(env!("OUT_DIR"), "/meos_functions.rs"));
