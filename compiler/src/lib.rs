//! brine-nsd-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.nsd` schema files, reporting every problem in one pass,
//!  2) A schema verifier (duplicate ids and names, empty enums, recursive messages, etc.),
//!  3) Per-type emitters that generate Rust pack/unpack code for the nsd wire format,
//!  4) The type and document compilers plus the `Emitter` facade,
//!  5) Error types (`NsdError`, `SchemaError`).

pub mod compiler;
pub mod emit;
pub mod emitter;
pub mod error;
pub mod parser;
pub mod tokenizer;
pub mod types;
pub mod utils;
pub mod verifier;
pub mod writer;

pub use compiler::{DocumentCompiler, TypeCompiler, LANGUAGE_VERSION};
pub use emitter::{Emitter, Source};
pub use error::{IssueKind, NsdError, SchemaError, SchemaIssue};
pub use parser::parse_schema;
pub use tokenizer::tokenize_schema;
pub use types::Nsd;
pub use writer::CodeWriter;

/// Compiles schema text into Rust source. Shorthand for [`Emitter::compile`].
pub fn compile_schema_to_rust(name: &str, text: &str) -> Result<String, NsdError> {
    Emitter::new().compile(name, text)
}
