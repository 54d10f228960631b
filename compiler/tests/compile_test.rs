#![cfg(test)]

use brine_nsd_compiler::{
    compile_schema_to_rust,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::{FieldType, Keyword, Primitive},
    Emitter, IssueKind, NsdError,
};

#[test]
fn test_parse_schema() {
    let input = r#"
    // Shared by every service.
    #namespace = Demo.Shapes;

    message Example {
      uint clientID;
      Type type = 4;
      Color[]? colors = 7;
      string name;
    }

    enum Type {
      FLAT;
      ROUND = 5;
      POINTED;
    }

    message Color {
      byte red;
      byte green;
      byte blue;
      byte? alpha;
    }
    "#;

    let tokens = tokenize_schema(input).expect("tokenize_schema failed");
    let schema = parse_schema(&tokens).expect("parse_schema failed");

    assert_eq!(schema.namespace(), Some("Demo.Shapes"));
    assert_eq!(schema.type_definitions.len(), 3);

    // Check message Example
    let example = &schema.type_definitions[0];
    assert_eq!(example.keyword(), Keyword::Message);
    assert_eq!(example.name, "Example");
    let fields = example.fields();
    assert_eq!(fields.len(), 4);

    assert_eq!(fields[0].name, "clientID");
    assert_eq!(fields[0].field_type, FieldType::Primitive(Primitive::UInt));
    assert_eq!(fields[0].id, 0);

    assert_eq!(fields[1].name, "type");
    assert_eq!(fields[1].field_type, FieldType::Enum);
    assert_eq!(fields[1].type_name, "Type");
    assert_eq!(fields[1].id, 4);

    assert_eq!(fields[2].name, "colors");
    assert_eq!(fields[2].field_type, FieldType::Object);
    assert!(fields[2].is_array);
    assert!(fields[2].is_optional);
    assert_eq!(fields[2].id, 7);

    // Auto ids use the declaration index, not the previous id.
    assert_eq!(fields[3].id, 3);

    // Check enum Type
    let type_def = &schema.type_definitions[1];
    assert_eq!(type_def.keyword(), Keyword::Enum);
    let values: Vec<(&str, i32)> = type_def.enum_values().iter().map(|v| (v.name.as_str(), v.value)).collect();
    assert_eq!(values, vec![("FLAT", 0), ("ROUND", 5), ("POINTED", 2)]);

    // Check message Color
    let color = &schema.type_definitions[2];
    assert_eq!(color.fields().len(), 4);
    assert!(color.fields()[3].is_optional);

    let rust_code = compile_schema_to_rust("example.nsd", input).expect("compile failed");
    println!("Generated Rust code:\n{}", rust_code);

    assert!(rust_code.contains("pub mod demo {\n    pub mod shapes {\n"));
    assert!(rust_code.contains("        pub enum Type {\n            #[default]\n            Flat = 0,\n            Round = 5,\n            Pointed = 2,\n        }\n"));
    assert!(rust_code.contains("            pub client_id: u32,\n"));
    assert!(rust_code.contains("            pub type_: Type,\n"));
    assert!(rust_code.contains("            pub colors: Option<Vec<Color>>,\n"));
    assert!(rust_code.contains("            pub const CLIENT_ID_ID: u16 = 0;\n"));
    assert!(rust_code.contains("            pub const TYPE_ID: u16 = 4;\n"));
    assert!(rust_code.contains("            pub const FIELD_COUNT: usize = 4;\n"));
    assert!(rust_code.contains("impl Message for Color {"));
}

#[test]
fn test_compile_reports_every_problem() {
    let input = r#"
    message Broken {
      int a = 1;
      int b = 1;
      Unknown c = 2;
      long d = 3
    }
    enum Empty { }
    "#;

    let err = Emitter::new().compile("broken.nsd", input).unwrap_err();
    let NsdError::Schema(schema_error) = err else {
        panic!("expected a schema error");
    };

    let kinds: Vec<IssueKind> = schema_error.causes.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::DuplicateFieldId,
            IssueKind::UnresolvedType,
            IssueKind::MissingTerminator,
            IssueKind::EmptyEnum,
        ]
    );

    let report = schema_error.to_string();
    assert!(report.starts_with("Schema has 4 error(s)\n  line 4, column 7: "), "{}", report);
}

#[test]
fn test_compile_is_deterministic() {
    let input = "enum E { A; B; } message M { E e; E[]? all; string s; }";
    let emitter = Emitter::new();
    assert_eq!(
        emitter.compile("m.nsd", input).unwrap(),
        emitter.compile("m.nsd", input).unwrap()
    );
}
