use crate::{
    error::NsdError,
    types::{FieldDefinition, TypeDefinition},
    writer::CodeWriter,
};

use super::{field_const, field_ident, impl_block, is_message, write_element, TypeEmitter};

/// `serialize`, `serialize_into` and the private `write_fields` they share
/// with nested framing.
pub struct SerializeEmitter;

impl TypeEmitter for SerializeEmitter {
    fn name(&self) -> &'static str {
        "serialize"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let fields = definition.fields();

        Ok(impl_block(definition, |w| {
            w.line("/// Encodes into a new buffer of exactly `total_size()` bytes.");
            w.block("pub fn serialize(&self) -> Result<Vec<u8>, EncodeError>", |w| {
                w.line("let mut buffer = vec![0u8; self.total_size()];");
                w.line("self.serialize_into(&mut buffer, 0)?;");
                w.line("Ok(buffer)");
            });
            w.blank();

            w.line("/// Encodes into `buffer` at `offset` and returns the number of bytes written.");
            w.block(
                "pub fn serialize_into(&self, buffer: &mut [u8], offset: usize) -> Result<usize, EncodeError>",
                |w| {
                    w.line("let mut writer = ByteBufferMut::new(buffer, offset, self.total_size())?;");
                    w.line("self.write_fields(&mut writer)?;");
                    w.line("writer.finish()");
                },
            );
            w.blank();

            w.block(
                "fn write_fields(&self, writer: &mut ByteBufferMut<'_>) -> Result<(), EncodeError>",
                |w| {
                    if fields.is_empty() {
                        w.line("let _ = writer;");
                    }
                    for field in fields {
                        write_field(w, field);
                    }
                    w.line("Ok(())");
                },
            );
        }))
    }
}

fn write_field(w: &mut CodeWriter, field: &FieldDefinition) {
    let id = format!("writer.write_field_id(Self::{})?;", field_const(field, "ID"));
    let place = format!("&self.{}", field_ident(field));

    if field.is_optional {
        w.block(format!("if let Some(value) = {}", place), |w| {
            w.line(id);
            w.line("writer.write_presence()?;");
            write_payload(w, field, "value");
        });
    } else {
        w.line(id);
        write_payload(w, field, &place);
    }
}

fn write_payload(w: &mut CodeWriter, field: &FieldDefinition, reference: &str) {
    if field.is_array {
        w.line(format!("writer.write_length({}.len())?;", reference.trim_start_matches('&')));
        w.block(format!("for item in {}", reference), |w| {
            w.line(write_element(field, "item"));
        });
    } else {
        w.line(write_element(field, reference));
    }
}
