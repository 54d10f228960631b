// example/build.rs
//
// Compiles schemas/showcase.nsd into $OUT_DIR/showcase.rs, which
// src/lib.rs pulls in with `include!`.

use std::{env, fs, path::PathBuf};

use brine_nsd_compiler::Emitter;

const SCHEMA: &str = "schemas/showcase.nsd";

fn main() {
    println!("cargo:rerun-if-changed={}", SCHEMA);

    let text = fs::read_to_string(SCHEMA).unwrap_or_else(|err| panic!("cannot read {}: {}", SCHEMA, err));
    let code = Emitter::new()
        .compile("showcase.nsd", &text)
        .unwrap_or_else(|err| panic!("cannot compile {}: {}", SCHEMA, err));

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("showcase.rs"), code).expect("cannot write generated code");
}
