use crate::{
    error::NsdError,
    types::{FieldDefinition, FieldType, TypeDefinition},
    writer::CodeWriter,
};

use super::{field_const, field_ident, impl_block, is_message, read_element, read_flag, TypeEmitter};

/// `deserialize`, `unpack` and the private `read_fields` loop.
///
/// The loop is keyed by the field id read from the wire, not by declaration
/// order. It stops once every field has been read or too few bytes remain for
/// another record. A repeated id is decoded and dropped so the first
/// occurrence wins; an unknown id is an error because its payload length
/// cannot be known.
pub struct DeserializeEmitter;

impl TypeEmitter for DeserializeEmitter {
    fn name(&self) -> &'static str {
        "deserialize"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let fields = definition.fields();

        Ok(impl_block(definition, |w| {
            w.line("/// Decodes a new value from `length` bytes of `buffer` at `offset`.");
            w.block(
                "pub fn deserialize(buffer: &[u8], offset: usize, length: usize) -> Result<Self, DecodeError>",
                |w| {
                    w.line("let mut message = Self::default();");
                    w.line("message.unpack(buffer, offset, length)?;");
                    w.line("Ok(message)");
                },
            );
            w.blank();

            w.line("/// Decodes into `self`, leaving fields absent from the input untouched.");
            w.line("/// Returns the number of bytes consumed.");
            w.block(
                "pub fn unpack(&mut self, buffer: &[u8], offset: usize, length: usize) -> Result<usize, DecodeError>",
                |w| {
                    w.line("let mut reader = ByteBuffer::bounded(buffer, offset, length)?;");
                    w.line("self.read_fields(&mut reader)?;");
                    w.line("Ok(reader.index())");
                },
            );
            w.blank();

            w.block(
                "fn read_fields(&mut self, reader: &mut ByteBuffer<'_>) -> Result<(), DecodeError>",
                |w| {
                    if fields.is_empty() {
                        w.line("let _ = reader;");
                    } else {
                        read_loop(w, fields);
                    }
                    w.line("Ok(())");
                },
            );
        }))
    }
}

fn read_loop(w: &mut CodeWriter, fields: &[FieldDefinition]) {
    for field in fields {
        w.line(format!("let mut {} = false;", read_flag(field)));
    }
    w.line("let mut reads_completed = 0;");
    w.block(
        "while reads_completed < Self::FIELD_COUNT && reader.remaining() > size::FIELD_HEADER_LEN",
        |w| {
            w.line("let position = reader.index();");
            w.block("match reader.read_field_id()?", |w| {
                for field in fields {
                    w.block(format!("Self::{} =>", field_const(field, "ID")), |w| {
                        let flag = read_flag(field);
                        w.open(format!("if {}", flag));
                        w.line(skip_statement(field));
                        w.reopen("else");
                        w.line(populate_statement(field));
                        w.line(format!("{} = true;", flag));
                        w.line("reads_completed += 1;");
                        w.close();
                    });
                }
                w.line("id => return Err(DecodeError::UnknownField { id, position }),");
            });
        },
    );
}

/// Expression reading a field's value, presence byte excluded, from `reader`.
fn read_value(field: &FieldDefinition, reader: &str) -> String {
    if field.is_array {
        format!("{}.read_array(|r| {})", reader, read_element(field, "r"))
    } else {
        read_element(field, reader)
    }
}

/// `?`-terminated expression decoding the whole payload of a field.
fn read_payload(field: &FieldDefinition) -> String {
    if field.is_optional {
        format!("reader.read_optional(|r| {})?", read_value(field, "r"))
    } else {
        format!("{}?", read_value(field, "reader"))
    }
}

fn populate_statement(field: &FieldDefinition) -> String {
    let place = format!("self.{}", field_ident(field));
    match (field.field_type, field.is_array, field.is_optional) {
        (FieldType::Object, false, false) => format!("reader.read_message_into(&mut {})?;", place),
        (FieldType::Object, false, true) => format!("reader.read_optional_message_into(&mut {})?;", place),
        _ => format!("{} = {};", place, read_payload(field)),
    }
}

fn skip_statement(field: &FieldDefinition) -> String {
    match (field.field_type, field.is_array, field.is_optional) {
        (FieldType::Object, false, false) => "reader.skip_message()?;".to_string(),
        (FieldType::Object, false, true) => "let _ = reader.read_optional(|r| r.skip_message())?;".to_string(),
        _ => format!("let _ = {};", read_payload(field)),
    }
}
