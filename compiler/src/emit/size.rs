use crate::{
    error::NsdError,
    types::{FieldDefinition, FieldType, TypeDefinition},
    writer::CodeWriter,
};

use super::{element_size, elements_size, field_const, field_ident, impl_block, is_message, width_const, TypeEmitter};

/// `MIN_SIZE` and `total_size()`.
///
/// Every required field contributes a constant `<FIELD>_MIN_LEN`: its id plus
/// either its fixed payload width or the `u16` count of a string or array.
/// Optional fields contribute nothing to the constant. Whatever cannot be
/// known at compile time is added by `total_size` at runtime.
pub struct SizeEmitter;

impl TypeEmitter for SizeEmitter {
    fn name(&self) -> &'static str {
        "size"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        is_message(definition)
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let fields = definition.fields();
        let required: Vec<&FieldDefinition> = fields.iter().filter(|field| !field.is_optional).collect();

        let dynamic: Vec<CodeWriter> = fields.iter().filter_map(dynamic_size).collect();

        Ok(impl_block(definition, |w| {
            for field in &required {
                w.line(format!(
                    "const {}: usize = {};",
                    field_const(field, "MIN_LEN"),
                    min_len(field)
                ));
            }
            if required.is_empty() {
                w.line("pub const MIN_SIZE: usize = 0;");
            } else {
                let terms: Vec<String> = required
                    .iter()
                    .map(|field| format!("Self::{}", field_const(field, "MIN_LEN")))
                    .collect();
                w.line(format!("pub const MIN_SIZE: usize = {};", terms.join(" + ")));
            }
            w.blank();

            w.line("/// Exact number of bytes `serialize` produces.");
            w.block("pub fn total_size(&self) -> usize", |w| {
                if dynamic.is_empty() {
                    w.line("Self::MIN_SIZE");
                    return;
                }
                w.line("let mut length = Self::MIN_SIZE;");
                for part in &dynamic {
                    w.append(part);
                }
                w.line("length");
            });
        }))
    }
}

/// Compile-time part of a required field.
fn min_len(field: &FieldDefinition) -> String {
    let payload = if field.is_array || field.is_string() {
        Some("size::ARRAY_HEADER_LEN")
    } else {
        // A nested message's length prefix is counted with its body.
        width_const(field)
    };
    match payload {
        Some(payload) => format!("size::FIELD_HEADER_LEN + {}", payload),
        None => "size::FIELD_HEADER_LEN".to_string(),
    }
}

/// Runtime part of a field, if it has one.
fn dynamic_size(field: &FieldDefinition) -> Option<CodeWriter> {
    let place = format!("self.{}", field_ident(field));
    let mut w = CodeWriter::new();

    if field.is_optional {
        let fixed_scalar = !field.is_array && width_const(field).is_some();
        if fixed_scalar {
            w.block(format!("if {}.is_some()", place), |w| {
                w.line(format!("length += size::OPTIONAL_FIELD_LEN + {};", element_size(field, "value")));
            });
            return Some(w);
        }
        let payload = if field.is_array {
            format!("size::ARRAY_HEADER_LEN + {}", elements_size(field, "value"))
        } else {
            element_size(field, "value")
        };
        w.block(format!("if let Some(value) = &{}", place), |w| {
            w.line(format!("length += size::OPTIONAL_FIELD_LEN + {};", payload));
        });
        return Some(w);
    }

    let runtime = if field.is_array {
        elements_size(field, &place)
    } else {
        match field.field_type {
            FieldType::Object => format!("size::ARRAY_HEADER_LEN + {}.total_size()", place),
            _ if field.is_string() => format!("utf16_len(&{}) * size::CHAR_LEN", place),
            _ => return None,
        }
    };
    w.line(format!("length += {};", runtime));
    Some(w)
}
