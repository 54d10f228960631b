//! brine-nsd
//!
//! The crate generated code depends on.
//!
//! - Wire runtime (`ByteBuffer`, `ByteBufferMut`, `Message`, `size`) re-exported from the schema crate
//! - Schema compiler entry points (`Emitter`, `compile_schema_to_rust`) re-exported from the compiler
//! - `schema_to_json` for inspecting a parsed schema

pub use brine_nsd_compiler::error::{IssueKind, NsdError, SchemaError, SchemaIssue};
pub use brine_nsd_compiler::{compile_schema_to_rust, Emitter, Nsd, Source};
pub use brine_nsd_schema::{size, utf16_len, ByteBuffer, ByteBufferMut, DecodeError, EncodeError, Message};

/// Parse schema text and describe the result as pretty-printed JSON.
pub fn schema_to_json(text: &str) -> Result<String, NsdError> {
    let nsd = Emitter::new().parse(text)?;
    Ok(serde_json::to_string_pretty(&nsd)?)
}

pub mod error {
    pub use brine_nsd_compiler::error::{IssueKind, NsdError, SchemaError, SchemaIssue};
    pub use brine_nsd_schema::{DecodeError, EncodeError};
}

pub mod schema {
    pub use brine_nsd_compiler::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_to_json() {
        let json = schema_to_json("#namespace = Demo; enum E { A = 2; } message M { E? e = 1; }").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["defines"][0]["key"], "namespace");
        assert_eq!(value["defines"][0]["value"], "Demo");
        assert_eq!(value["type_definitions"][0]["name"], "E");
        assert_eq!(value["type_definitions"][0]["body"]["Enum"][0]["value"], 2);

        let field = &value["type_definitions"][1]["body"]["Message"][0];
        assert_eq!(field["field_type"], "Enum");
        assert_eq!(field["id"], 1);
        assert_eq!(field["is_optional"], true);
    }

    #[test]
    fn test_schema_to_json_reports_errors() {
        assert!(matches!(schema_to_json("message M { int a; int a; }"), Err(NsdError::Schema(_))));
    }
}
