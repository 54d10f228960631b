use crate::{
    error::NsdError,
    types::{Keyword, TypeDefinition},
    utils::quote,
    writer::CodeWriter,
};

use super::{type_ident, TypeEmitter};

/// A `#[repr(i32)]` enum plus its conversions to and from the wire value.
/// The first entry is the default.
pub struct EnumEmitter;

impl TypeEmitter for EnumEmitter {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn can_compile(&self, definition: &TypeDefinition) -> bool {
        definition.keyword() == Keyword::Enum
    }

    fn compile(&self, definition: &TypeDefinition) -> Result<CodeWriter, NsdError> {
        let values = definition.enum_values();
        if values.is_empty() {
            return Err(NsdError::UnsupportedType {
                type_name: definition.name.clone(),
                reason:    "an enum needs at least one entry".to_string(),
            });
        }

        let name = type_ident(&definition.name);
        let variants: Vec<(String, i32)> = values
            .iter()
            .map(|entry| (variant_ident(&entry.name), entry.value))
            .collect();

        let mut w = CodeWriter::new();
        w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]");
        w.line("#[repr(i32)]");
        w.block(format!("pub enum {}", name), |w| {
            for (index, (variant, value)) in variants.iter().enumerate() {
                if index == 0 {
                    w.line("#[default]");
                }
                w.line(format!("{} = {},", variant, value));
            }
        });
        w.blank();

        w.block(format!("impl From<{}> for i32", name), |w| {
            w.block(format!("fn from(value: {}) -> Self", name), |w| {
                w.line("value as i32");
            });
        });
        w.blank();

        w.block(format!("impl TryFrom<i32> for {}", name), |w| {
            w.line("type Error = DecodeError;");
            w.blank();
            w.block("fn try_from(value: i32) -> Result<Self, Self::Error>", |w| {
                w.block("match value", |w| {
                    for (variant, value) in &variants {
                        w.line(format!("{} => Ok({}::{}),", value, name, variant));
                    }
                    w.line(format!(
                        "_ => Err(DecodeError::UnknownEnumValue {{ type_name: {}, value }}),",
                        quote(&name)
                    ));
                });
            });
        });

        Ok(w)
    }
}

/// Enum entries follow the same casing as type names.
pub fn variant_ident(name: &str) -> String {
    type_ident(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::tests::definition;
    use crate::types::{EnumValue, TypeBody};

    #[test]
    fn test_enum_fragment() {
        let def = definition("enum Color { RED = 1; green = -2; Blue_Sky; }", "Color");
        assert_eq!(
            EnumEmitter.compile(&def).unwrap().render(),
            "\
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Color {
    #[default]
    Red = 1,
    Green = -2,
    BlueSky = 2,
}

impl From<Color> for i32 {
    fn from(value: Color) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for Color {
    type Error = DecodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Color::Red),
            -2 => Ok(Color::Green),
            2 => Ok(Color::BlueSky),
            _ => Err(DecodeError::UnknownEnumValue { type_name: \"Color\", value }),
        }
    }
}
"
        );
    }

    #[test]
    fn test_empty_enum_is_unsupported() {
        let def = TypeDefinition {
            name:   "Nothing".into(),
            line:   1,
            column: 1,
            body:   TypeBody::Enum(Vec::<EnumValue>::new()),
        };
        assert!(matches!(EnumEmitter.compile(&def), Err(NsdError::UnsupportedType { .. })));
    }
}
