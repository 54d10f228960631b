use std::collections::HashMap;

use crate::{
    emit::{
        enums::variant_ident, field_const, field_ident, type_ident, ConstructorEmitter, DeserializeEmitter,
        EnumEmitter, FieldsEmitter, MessageBindingEmitter, SerializeEmitter, SizeEmitter, TypeEmitter,
    },
    error::NsdError,
    types::{FieldType, Keyword, Nsd, TypeDefinition},
    utils::{escape_rust_keyword, quote, to_snake_case},
    writer::CodeWriter,
};

/// Version of the generated code's contract, written into every document.
pub const LANGUAGE_VERSION: u32 = 1;

/// Names generated types may not take, because the generated module imports
/// or relies on them.
pub const RESERVED_TYPE_NAMES: [&str; 12] = [
    "ByteBuffer",
    "ByteBufferMut",
    "DecodeError",
    "EncodeError",
    "Message",
    "Default",
    "From",
    "TryFrom",
    "Option",
    "Result",
    "String",
    "Vec",
];

const RUNTIME_IMPORT: &str =
    "use brine_nsd::{size, utf16_len, ByteBuffer, ByteBufferMut, DecodeError, EncodeError, Message};";

/// Compiles one type by running every emitter that applies to it, in order.
pub struct TypeCompiler {
    emitters: Vec<Box<dyn TypeEmitter>>,
}

impl Default for TypeCompiler {
    fn default() -> Self {
        Self::with_emitters(vec![
            Box::new(FieldsEmitter),
            Box::new(ConstructorEmitter),
            Box::new(SizeEmitter),
            Box::new(SerializeEmitter),
            Box::new(DeserializeEmitter),
            Box::new(MessageBindingEmitter),
            Box::new(EnumEmitter),
        ])
    }
}

impl TypeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emitters(emitters: Vec<Box<dyn TypeEmitter>>) -> Self {
        TypeCompiler { emitters }
    }

    /// Generated code for `definition`. `nsd` is the document it belongs to
    /// and is used to check that every referenced type exists.
    pub fn compile(&self, definition: &TypeDefinition, nsd: &Nsd) -> Result<CodeWriter, NsdError> {
        check_definition(definition, nsd)?;

        let mut w = CodeWriter::new();
        for emitter in self.emitters.iter().filter(|emitter| emitter.can_compile(definition)) {
            let fragment = emitter.compile(definition)?;
            if !w.is_empty() {
                w.blank();
            }
            w.append(&fragment);
            tracing::trace!(emitter = emitter.name(), type_name = %definition.name, "emitted fragment");
        }
        Ok(w)
    }
}

fn unsupported(type_name: &str, reason: String) -> NsdError {
    NsdError::UnsupportedType {
        type_name: type_name.to_string(),
        reason,
    }
}

/// Case conversion drops underscores, so `_` or `_1` can come out empty,
/// as a bare `_`, or with a leading digit.
fn is_valid_ident(ident: &str) -> bool {
    !ident.is_empty() && ident != "_" && !ident.starts_with(|c: char| c.is_ascii_digit())
}

fn check_ident(owner: &str, name: &str, ident: &str) -> Result<(), NsdError> {
    if is_valid_ident(ident) {
        Ok(())
    } else {
        Err(unsupported(
            owner,
            format!("{} becomes {}, which is not a Rust identifier", quote(name), quote(ident)),
        ))
    }
}

/// Rejects definitions the emitters cannot turn into valid Rust.
fn check_definition(definition: &TypeDefinition, nsd: &Nsd) -> Result<(), NsdError> {
    let ident = type_ident(&definition.name);
    check_ident(&definition.name, &definition.name, &ident)?;
    if RESERVED_TYPE_NAMES.contains(&ident.as_str()) {
        return Err(unsupported(
            &definition.name,
            format!("the name {} is reserved in generated code", quote(&ident)),
        ));
    }

    let mut idents: HashMap<String, &str> = HashMap::new();
    let mut consts: HashMap<String, &str> = HashMap::new();
    for field in definition.fields() {
        let expected = match field.field_type {
            FieldType::Primitive(_) => None,
            FieldType::Enum => Some(Keyword::Enum),
            FieldType::Object => Some(Keyword::Message),
        };
        if let Some(keyword) = expected {
            let found = nsd.type_definition(&field.type_name).map(|def| def.keyword());
            if found != Some(keyword) {
                return Err(unsupported(
                    &field.type_name,
                    format!(
                        "field {} of {} refers to a type no emitter knows",
                        quote(&field.name),
                        quote(&definition.name)
                    ),
                ));
            }
        }

        let ident = field_ident(field);
        check_ident(&definition.name, &field.name, &ident)?;
        if let Some(other) = idents.insert(ident.clone(), &field.name) {
            return Err(unsupported(
                &definition.name,
                format!("fields {} and {} both become {}", quote(other), quote(&field.name), quote(&ident)),
            ));
        }
        let id_const = field_const(field, "ID");
        if let Some(other) = consts.insert(id_const.clone(), &field.name) {
            return Err(unsupported(
                &definition.name,
                format!("fields {} and {} both become {}", quote(other), quote(&field.name), quote(&id_const)),
            ));
        }
    }

    let mut variants: HashMap<String, &str> = HashMap::new();
    for entry in definition.enum_values() {
        let variant = variant_ident(&entry.name);
        check_ident(&definition.name, &entry.name, &variant)?;
        if let Some(other) = variants.insert(variant.clone(), &entry.name) {
            return Err(unsupported(
                &definition.name,
                format!("entries {} and {} both become {}", quote(other), quote(&entry.name), quote(&variant)),
            ));
        }
    }

    Ok(())
}

/// Compiles a whole document: header, namespace modules and every type,
/// enums first.
#[derive(Default)]
pub struct DocumentCompiler {
    types: TypeCompiler,
}

impl DocumentCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_compiler(types: TypeCompiler) -> Self {
        DocumentCompiler { types }
    }

    pub fn version(&self) -> u32 {
        LANGUAGE_VERSION
    }

    pub fn compile(&self, nsd: &Nsd, source_name: Option<&str>) -> Result<String, NsdError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for definition in &nsd.type_definitions {
            let ident = type_ident(&definition.name);
            if let Some(other) = seen.insert(ident.clone(), &definition.name) {
                return Err(unsupported(
                    &definition.name,
                    format!("types {} and {} both become {}", quote(other), quote(&definition.name), quote(&ident)),
                ));
            }
        }

        let mut definitions: Vec<&TypeDefinition> = nsd.type_definitions.iter().collect();
        definitions.sort_by_key(|definition| definition.keyword());

        let mut body = CodeWriter::new();
        body.line("#[allow(unused_imports)]");
        body.line(RUNTIME_IMPORT);
        for definition in definitions {
            body.blank();
            body.append(&self.types.compile(definition, nsd)?);
        }

        let mut document = CodeWriter::new();
        document.line("// <auto-generated>");
        document.line("// Generated by the nsd compiler. Do not modify!");
        document.line(format!("// Language version: {}", self.version()));
        if let Some(name) = source_name.filter(|name| !name.trim().is_empty()) {
            document.line(format!("// Source: {}", name));
        }
        document.line("// </auto-generated>");
        document.blank();

        let modules = match nsd.namespace() {
            Some(namespace) => namespace_modules(namespace)?,
            None => Vec::new(),
        };
        for module in &modules {
            document.open(format!("pub mod {}", module));
        }
        document.append(&body);
        for _ in &modules {
            document.close();
        }

        Ok(document.render())
    }
}

/// `A.B` becomes the module path `a::b`.
fn namespace_modules(namespace: &str) -> Result<Vec<String>, NsdError> {
    namespace
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let valid = segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !segment.starts_with(|c: char| c.is_ascii_digit());
            let module = escape_rust_keyword(&to_snake_case(segment));
            if valid && is_valid_ident(&module) {
                Ok(module)
            } else {
                Err(unsupported(
                    namespace,
                    format!("namespace segment {} is not a valid module name", quote(segment)),
                ))
            }
        })
        .collect()
}
