use crate::{error::NsdError, types::TypeDefinition, writer::CodeWriter};

use super::{field_ident, impl_block, is_message, rust_type, TypeEmitter};

/// `new(..)` taking every field in declaration order.
pub struct ConstructorEmitter;

impl TypeEmitter for ConstructorEmitter {
    fn name(&self) -> &'static str {
        "constructor"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let fields = definition.fields();
        let arguments: Vec<String> = fields
            .iter()
            .map(|field| format!("{}: {}", field_ident(field), rust_type(field)))
            .collect();

        Ok(impl_block(definition, |w| {
            if fields.len() > 7 {
                w.line("#[allow(clippy::too_many_arguments)]");
            }
            w.block(format!("pub fn new({}) -> Self", arguments.join(", ")), |w| {
                if fields.is_empty() {
                    w.line("Self {}");
                    return;
                }
                w.block("Self", |w| {
                    for field in fields {
                        w.line(format!("{},", field_ident(field)));
                    }
                });
            });
        }))
    }
}
