use std::fmt;

use serde::Serialize;

/// A parsed nsd document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nsd {
    pub defines:          Vec<Define>,
    pub type_definitions: Vec<TypeDefinition>,
}

impl Nsd {
    /// Value of the first define with `key`.
    pub fn define(&self, key: &str) -> Option<&str> {
        self.defines
            .iter()
            .find(|define| define.key == key)
            .map(|define| define.value.as_str())
    }

    /// The output namespace, if one was defined and is not blank.
    pub fn namespace(&self) -> Option<&str> {
        self.define("namespace").filter(|value| !value.trim().is_empty())
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions.iter().find(|def| def.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    pub key:   String,
    pub value: String,
}

/// Ordering puts enums before messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Keyword {
    Enum    = 0,
    Message = 1,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    pub name:   String,
    pub line:   usize,
    pub column: usize,
    pub body:   TypeBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeBody {
    Message(Vec<FieldDefinition>),
    Enum(Vec<EnumValue>),
}

impl TypeDefinition {
    pub fn keyword(&self) -> Keyword {
        match self.body {
            TypeBody::Message(_) => Keyword::Message,
            TypeBody::Enum(_) => Keyword::Enum,
        }
    }

    /// Field definitions of a message; empty for an enum.
    pub fn fields(&self) -> &[FieldDefinition] {
        match &self.body {
            TypeBody::Message(fields) => fields,
            TypeBody::Enum(_) => &[],
        }
    }

    /// Entries of an enum; empty for a message.
    pub fn enum_values(&self) -> &[EnumValue] {
        match &self.body {
            TypeBody::Enum(values) => values,
            TypeBody::Message(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name:   String,
    pub value:  i32,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Primitive {
    Bool,
    Byte,
    SByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    String,
    Char,
}

impl Primitive {
    pub const ALL: [Primitive; 13] = [
        Primitive::Bool,
        Primitive::Byte,
        Primitive::SByte,
        Primitive::Short,
        Primitive::UShort,
        Primitive::Int,
        Primitive::UInt,
        Primitive::Long,
        Primitive::ULong,
        Primitive::Float,
        Primitive::Double,
        Primitive::String,
        Primitive::Char,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Bool   => "bool",
            Primitive::Byte   => "byte",
            Primitive::SByte  => "sbyte",
            Primitive::Short  => "short",
            Primitive::UShort => "ushort",
            Primitive::Int    => "int",
            Primitive::UInt   => "uint",
            Primitive::Long   => "long",
            Primitive::ULong  => "ulong",
            Primitive::Float  => "float",
            Primitive::Double => "double",
            Primitive::String => "string",
            Primitive::Char   => "char",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Primitive> {
        Primitive::ALL.iter().copied().find(|p| p.keyword() == text)
    }

    /// Fixed payload width on the wire; `None` for strings.
    pub fn wire_width(self) -> Option<usize> {
        match self {
            Primitive::Bool | Primitive::Byte | Primitive::SByte => Some(1),
            Primitive::Short | Primitive::UShort | Primitive::Char => Some(2),
            Primitive::Int | Primitive::UInt | Primitive::Float => Some(4),
            Primitive::Long | Primitive::ULong | Primitive::Double => Some(8),
            Primitive::String => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    Primitive(Primitive),
    Enum,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub field_type:  FieldType,
    pub type_name:   String,
    pub name:        String,
    pub id:          u16,
    pub is_optional: bool,
    pub is_array:    bool,
    pub line:        usize,
    pub column:      usize,
}

impl FieldDefinition {
    pub fn is_string(&self) -> bool {
        self.field_type == FieldType::Primitive(Primitive::String)
    }

    /// Payload width of one element when it is statically known.
    pub fn element_width(&self) -> Option<usize> {
        match self.field_type {
            FieldType::Primitive(primitive) => primitive.wire_width(),
            FieldType::Enum => Some(4),
            FieldType::Object => None,
        }
    }

    /// The type as written in schema source, e.g. `int[]?`.
    pub fn qualified_type(&self) -> String {
        let mut text = self.type_name.clone();
        if self.is_array {
            text.push_str("[]");
        }
        if self.is_optional {
            text.push('?');
        }
        text
    }
}

impl fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {}", self.qualified_type(), self.name, self.id)
    }
}
