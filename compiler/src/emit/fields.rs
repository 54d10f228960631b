use crate::{error::NsdError, types::TypeDefinition, writer::CodeWriter};

use super::{field_const, field_ident, impl_block, is_message, rust_type, type_ident, TypeEmitter};

/// The struct declaration plus `FIELD_COUNT` and one `<FIELD>_ID` per field.
pub struct FieldsEmitter;

impl TypeEmitter for FieldsEmitter {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let fields = definition.fields();
        let mut w = CodeWriter::new();

        w.line("#[derive(Debug, Clone, PartialEq, Default)]");
        w.block(format!("pub struct {}", type_ident(&definition.name)), |w| {
            for field in fields {
                w.line(format!("pub {}: {},", field_ident(field), rust_type(field)));
            }
        });
        w.blank();
        w.append(&impl_block(definition, |w| {
            w.line(format!("pub const FIELD_COUNT: usize = {};", fields.len()));
            for field in fields {
                w.line(format!("pub const {}: u16 = {};", field_const(field, "ID"), field.id));
            }
        }));

        Ok(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::tests::definition;

    #[test]
    fn test_fields_fragment() {
        let def = definition("message M { int x = 0; string? note = 1; int[] ys = 2; }", "M");
        let code = FieldsEmitter.compile(&def).unwrap().render();
        assert_eq!(
            code,
            "\
#[derive(Debug, Clone, PartialEq, Default)]
pub struct M {
    pub x: i32,
    pub note: Option<String>,
    pub ys: Vec<i32>,
}

impl M {
    pub const FIELD_COUNT: usize = 3;
    pub const X_ID: u16 = 0;
    pub const NOTE_ID: u16 = 1;
    pub const YS_ID: u16 = 2;
}
"
        );
    }

    #[test]
    fn test_only_messages() {
        let def = definition("enum E { A; }", "E");
        assert!(!FieldsEmitter.can_compile(&def));
    }
}
