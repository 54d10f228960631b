use crate::{error::NsdError, types::TypeDefinition, writer::CodeWriter};

use super::{is_message, type_ident, TypeEmitter};

/// `impl Message`, which lets the runtime frame the type as a nested field.
pub struct MessageBindingEmitter;

impl TypeEmitter for MessageBindingEmitter {
    fn name(&self) -> &'static str {
        "binding"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let mut w = CodeWriter::new();
        w.block(format!("impl Message for {}", type_ident(&definition.name)), |w| {
            w.block("fn wire_size(&self) -> usize", |w| {
                w.line("self.total_size()");
            });
            w.blank();
            w.block(
                "fn write_to(&self, writer: &mut ByteBufferMut<'_>) -> Result<(), EncodeError>",
                |w| {
                    w.line("self.write_fields(writer)");
                },
            );
            w.blank();
            w.block(
                "fn read_from(&mut self, reader: &mut ByteBuffer<'_>) -> Result<(), DecodeError>",
                |w| {
                    w.line("self.read_fields(reader)");
                },
            );
        });
        Ok(w)
    }
}
