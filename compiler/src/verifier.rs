use std::collections::{HashMap, HashSet};

use brine_nsd_schema::size::RESERVED_FIELD_ID;

use crate::{
    error::{IssueKind, SchemaIssue},
    types::{FieldType, Nsd, TypeBody, TypeDefinition},
    utils::quote,
};

/// Semantic checks over a parsed document. Every problem is returned; an
/// empty list means the document is valid.
pub fn verify_schema(nsd: &Nsd) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let mut definitions: HashMap<&str, &TypeDefinition> = HashMap::new();

    // 1) Type names are unique
    for definition in &nsd.type_definitions {
        if definitions.contains_key(definition.name.as_str()) {
            issues.push(SchemaIssue::new(
                IssueKind::DuplicateTypeName,
                format!("The type {} is defined twice", quote(&definition.name)),
                definition.line,
                definition.column,
            ));
            continue;
        }
        definitions.insert(&definition.name, definition);
    }

    // 2) Fields and entries inside each definition
    for definition in &nsd.type_definitions {
        match &definition.body {
            TypeBody::Message(_) => verify_fields(definition, &mut issues),
            TypeBody::Enum(_) => verify_enum(definition, &mut issues),
        }
    }

    // 3) Messages do not contain themselves by value
    for definition in &nsd.type_definitions {
        if let TypeBody::Message(_) = definition.body {
            let mut visited = HashSet::new();
            if contains_by_value(&definition.name, definition, &definitions, &mut visited) {
                issues.push(SchemaIssue::new(
                    IssueKind::RecursiveMessage,
                    format!(
                        "Recursive nesting of {} is not allowed outside of an array",
                        quote(&definition.name)
                    ),
                    definition.line,
                    definition.column,
                ));
            }
        }
    }

    issues
}

fn verify_fields(definition: &TypeDefinition, issues: &mut Vec<SchemaIssue>) {
    let mut ids: HashMap<u16, &str> = HashMap::new();
    let mut names: HashSet<&str> = HashSet::new();

    for field in definition.fields() {
        if field.id == RESERVED_FIELD_ID {
            issues.push(SchemaIssue::new(
                IssueKind::ReservedFieldId,
                format!("The id {} of field {} is reserved", field.id, quote(&field.name)),
                field.line,
                field.column,
            ));
        }
        if let Some(first) = ids.get(&field.id) {
            issues.push(SchemaIssue::new(
                IssueKind::DuplicateFieldId,
                format!(
                    "The id {} of field {} is already used by field {} in {}",
                    field.id,
                    quote(&field.name),
                    quote(first),
                    quote(&definition.name)
                ),
                field.line,
                field.column,
            ));
        } else {
            ids.insert(field.id, &field.name);
        }
        if !names.insert(&field.name) {
            issues.push(SchemaIssue::new(
                IssueKind::DuplicateFieldName,
                format!("The field {} is defined twice in {}", quote(&field.name), quote(&definition.name)),
                field.line,
                field.column,
            ));
        }
    }
}

fn verify_enum(definition: &TypeDefinition, issues: &mut Vec<SchemaIssue>) {
    let values = definition.enum_values();
    if values.is_empty() {
        issues.push(SchemaIssue::new(
            IssueKind::EmptyEnum,
            format!("The enum {} has no entries", quote(&definition.name)),
            definition.line,
            definition.column,
        ));
        return;
    }

    let mut names: HashSet<&str> = HashSet::new();
    let mut seen: HashMap<i32, &str> = HashMap::new();
    for entry in values {
        if !names.insert(&entry.name) {
            issues.push(SchemaIssue::new(
                IssueKind::DuplicateEnumName,
                format!("The entry {} is defined twice in {}", quote(&entry.name), quote(&definition.name)),
                entry.line,
                entry.column,
            ));
        }
        if let Some(first) = seen.get(&entry.value) {
            issues.push(SchemaIssue::new(
                IssueKind::DuplicateEnumValue,
                format!(
                    "The value {} of entry {} is already used by entry {}",
                    entry.value,
                    quote(&entry.name),
                    quote(first)
                ),
                entry.line,
                entry.column,
            ));
        } else {
            seen.insert(entry.value, &entry.name);
        }
    }
}

/// Whether `target` is reachable from `definition` through non-array message
/// fields. Optional fields count: `Option<T>` still stores `T` inline.
fn contains_by_value<'a>(
    target: &str,
    definition: &'a TypeDefinition,
    definitions: &HashMap<&str, &'a TypeDefinition>,
    visited: &mut HashSet<&'a str>,
) -> bool {
    for field in definition.fields() {
        if field.is_array || field.field_type != FieldType::Object {
            continue;
        }
        if field.type_name == target {
            return true;
        }
        let Some(&child) = definitions.get(field.type_name.as_str()) else {
            continue;
        };
        if visited.insert(child.name.as_str()) && contains_by_value(target, child, definitions, visited) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use crate::tokenizer::tokenize_schema;

    fn issues(text: &str) -> Vec<IssueKind> {
        match parse_schema(&tokenize_schema(text).unwrap()) {
            Ok(_) => vec![],
            Err(err) => err.causes.into_iter().map(|c| c.kind).collect(),
        }
    }

    #[test]
    fn test_valid_schema_has_no_issues() {
        assert!(issues("enum E { A; } message M { E e; M[] children; M[]? more; }").is_empty());
    }

    #[test]
    fn test_duplicate_type_name() {
        assert_eq!(issues("message A { } enum A { X; }"), vec![IssueKind::DuplicateTypeName]);
    }

    #[test]
    fn test_duplicate_field_name_and_id() {
        assert_eq!(
            issues("message M { int a = 0; long a = 0; }"),
            vec![IssueKind::DuplicateFieldId, IssueKind::DuplicateFieldName]
        );
    }

    #[test]
    fn test_explicit_id_colliding_with_auto_id() {
        assert_eq!(issues("message M { int a; int b = 0; }"), vec![IssueKind::DuplicateFieldId]);
    }

    #[test]
    fn test_enum_checks() {
        assert_eq!(issues("enum E { }"), vec![IssueKind::EmptyEnum]);
        assert_eq!(issues("enum E { A = 1; B = 1; }"), vec![IssueKind::DuplicateEnumValue]);
        assert_eq!(issues("enum E { A = 1; A = 2; }"), vec![IssueKind::DuplicateEnumName]);
    }

    #[test]
    fn test_recursive_messages() {
        assert_eq!(issues("message Node { Node? next; }"), vec![IssueKind::RecursiveMessage]);
        assert_eq!(
            issues("message A { B b; } message B { C c; } message C { A a; }"),
            vec![
                IssueKind::RecursiveMessage,
                IssueKind::RecursiveMessage,
                IssueKind::RecursiveMessage
            ]
        );
        assert!(issues("message A { B b; } message B { int x; } message C { A a; B b; }").is_empty());
    }
}
