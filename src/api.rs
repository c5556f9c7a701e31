//! OpenGL 3.3 core function table and constants, generated by `gl_generator` (see `build.rs`).
#![allow(
    clippy::all,
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    dead_code,
    unused_imports
)]

include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
