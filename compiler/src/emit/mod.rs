//! Per-type code emitters.
//!
//! Each emitter turns one [`TypeDefinition`] into one facet of the generated
//! Rust source. The message emitters must agree on a single byte layout:
//!
//! * a message is a run of field records `[id: u16][payload]`;
//! * optional fields are written only when present, as `[id][1u8][payload]`;
//! * arrays carry a `u16` element count, strings a `u16` UTF-16 unit count;
//! * nested messages carry their `u16` byte length, per element in arrays.

use crate::{
    error::NsdError,
    types::{FieldDefinition, FieldType, Primitive, TypeDefinition},
    utils::{escape_rust_keyword, to_pascal_case, to_screaming_snake_case, to_snake_case},
    writer::CodeWriter,
};

pub mod binding;
pub mod constructor;
pub mod deserialize;
pub mod enums;
pub mod fields;
pub mod serialize;
pub mod size;

pub use binding::MessageBindingEmitter;
pub use constructor::ConstructorEmitter;
pub use deserialize::DeserializeEmitter;
pub use enums::EnumEmitter;
pub use fields::FieldsEmitter;
pub use serialize::SerializeEmitter;
pub use size::SizeEmitter;

/// One facet of a generated type.
pub trait TypeEmitter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this emitter contributes to `definition`.
    fn can_compile(&self, definition: &TypeDefinition) -> bool;

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError>;
}

/// Rust name of a schema type.
pub fn type_ident(name: &str) -> String {
    escape_rust_keyword(&to_pascal_case(name))
}

/// Rust name of a field, used for the struct member and constructor argument.
pub fn field_ident(field: &FieldDefinition) -> String {
    escape_rust_keyword(&to_snake_case(&field.name))
}

/// Associated constant of a field, e.g. `SCORE_ID`.
pub fn field_const(field: &FieldDefinition, suffix: &str) -> String {
    format!("{}_{}", to_screaming_snake_case(&field.name), suffix)
}

/// Name of the "already read" flag in the generated read loop.
pub fn read_flag(field: &FieldDefinition) -> String {
    format!("{}_read", to_snake_case(&field.name))
}

pub fn rust_primitive(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool   => "bool",
        Primitive::Byte   => "u8",
        Primitive::SByte  => "i8",
        Primitive::Short  => "i16",
        Primitive::UShort => "u16",
        Primitive::Int    => "i32",
        Primitive::UInt   => "u32",
        Primitive::Long   => "i64",
        Primitive::ULong  => "u64",
        Primitive::Float  => "f32",
        Primitive::Double => "f64",
        Primitive::String => "String",
        Primitive::Char   => "u16",
    }
}

/// Suffix of the `read_*` / `write_*` buffer methods for a primitive.
fn codec_suffix(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Bool   => "bool",
        Primitive::Byte   => "byte",
        Primitive::SByte  => "sbyte",
        Primitive::Short  => "i16",
        Primitive::UShort => "u16",
        Primitive::Int    => "i32",
        Primitive::UInt   => "u32",
        Primitive::Long   => "i64",
        Primitive::ULong  => "u64",
        Primitive::Float  => "f32",
        Primitive::Double => "f64",
        Primitive::String => "string",
        Primitive::Char   => "char",
    }
}

/// Rust type of one element, ignoring `?` and `[]`.
pub fn element_type(field: &FieldDefinition) -> String {
    match field.field_type {
        FieldType::Primitive(primitive) => rust_primitive(primitive).to_string(),
        FieldType::Enum | FieldType::Object => type_ident(&field.type_name),
    }
}

/// Rust type of the struct member.
pub fn rust_type(field: &FieldDefinition) -> String {
    let mut ty = element_type(field);
    if field.is_array {
        ty = format!("Vec<{}>", ty);
    }
    if field.is_optional {
        ty = format!("Option<{}>", ty);
    }
    ty
}

/// `size::*` constant for the payload width of one element, if fixed.
pub fn width_const(field: &FieldDefinition) -> Option<&'static str> {
    let width = match field.field_type {
        FieldType::Primitive(Primitive::Bool) => "size::BOOL_LEN",
        FieldType::Primitive(Primitive::Byte | Primitive::SByte) => "size::BYTE_LEN",
        FieldType::Primitive(Primitive::Short | Primitive::UShort) => "size::SHORT_LEN",
        FieldType::Primitive(Primitive::Char) => "size::CHAR_LEN",
        FieldType::Primitive(Primitive::Int | Primitive::UInt) => "size::INT_LEN",
        FieldType::Primitive(Primitive::Float) => "size::FLOAT_LEN",
        FieldType::Primitive(Primitive::Long | Primitive::ULong) => "size::LONG_LEN",
        FieldType::Primitive(Primitive::Double) => "size::DOUBLE_LEN",
        FieldType::Enum => "size::ENUM_LEN",
        FieldType::Primitive(Primitive::String) | FieldType::Object => return None,
    };
    Some(width)
}

/// Expression that encodes as many bytes as one element behind `reference`.
pub fn element_size(field: &FieldDefinition, reference: &str) -> String {
    match (width_const(field), field.field_type) {
        (Some(width), _) => width.to_string(),
        (None, FieldType::Object) => format!("size::ARRAY_HEADER_LEN + {}.total_size()", reference),
        (None, _) => format!("size::ARRAY_HEADER_LEN + utf16_len({}) * size::CHAR_LEN", reference),
    }
}

/// Expression for the bytes of the elements of the `Vec` behind `reference`,
/// without the count header.
pub fn elements_size(field: &FieldDefinition, reference: &str) -> String {
    match width_const(field) {
        Some(width) => format!("{}.len() * {}", reference, width),
        None => format!(
            "{}.iter().map(|item| {}).sum::<usize>()",
            reference,
            element_size(field, "item")
        ),
    }
}

/// Expression reading one element from `reader`.
pub fn read_element(field: &FieldDefinition, reader: &str) -> String {
    match field.field_type {
        FieldType::Primitive(primitive) => format!("{}.read_{}()", reader, codec_suffix(primitive)),
        FieldType::Enum => format!("{}.read_enum::<{}>()", reader, element_type(field)),
        FieldType::Object => format!("{}.read_message::<{}>()", reader, element_type(field)),
    }
}

/// Statement writing one element. `reference` is an expression of type
/// `&T`; copyable payloads are passed by value.
pub fn write_element(field: &FieldDefinition, reference: &str) -> String {
    match field.field_type {
        FieldType::Primitive(Primitive::String) => format!("writer.write_string({})?;", reference),
        FieldType::Primitive(primitive) => {
            format!("writer.write_{}({})?;", codec_suffix(primitive), by_value(reference))
        }
        FieldType::Enum => format!("writer.write_enum({})?;", by_value(reference)),
        FieldType::Object => format!("writer.write_message({})?;", reference),
    }
}

fn by_value(reference: &str) -> String {
    match reference.strip_prefix('&') {
        Some(place) => place.to_string(),
        None => format!("*{}", reference),
    }
}

/// `impl Name` wrapper shared by the message emitters.
pub(crate) fn impl_block<F>(definition: &TypeDefinition, body: F) -> CodeWriter
where
    F: FnOnce(&mut CodeWriter),
{
    let mut w = CodeWriter::new();
    w.block(format!("impl {}", type_ident(&definition.name)), body);
    w
}

pub(crate) fn is_message(definition: &TypeDefinition) -> bool {
    definition.keyword() == crate::types::Keyword::Message
}
