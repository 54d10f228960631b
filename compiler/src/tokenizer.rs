use lazy_static::lazy_static;
use regex::Regex;

use crate::error::NsdError;
use crate::types::Primitive;
use crate::utils::quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Define,
    Number,
    Terminate,
    Array,
    Optional,
    Equals,
    OpenBrace,
    CloseBrace,
    Message,
    Enum,
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
    StringValue,
    Identifier,
    Eof,
}

impl TokenKind {
    /// Whitespace and comments never reach the parser.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn primitive(self) -> Option<Primitive> {
        let primitive = match self {
            TokenKind::Bool   => Primitive::Bool,
            TokenKind::Byte   => Primitive::Byte,
            TokenKind::SByte  => Primitive::SByte,
            TokenKind::Short  => Primitive::Short,
            TokenKind::UShort => Primitive::UShort,
            TokenKind::Int    => Primitive::Int,
            TokenKind::UInt   => Primitive::UInt,
            TokenKind::Long   => Primitive::Long,
            TokenKind::ULong  => Primitive::ULong,
            TokenKind::Float  => Primitive::Float,
            TokenKind::Double => Primitive::Double,
            TokenKind::String => Primitive::String,
            TokenKind::Char   => Primitive::Char,
            _ => return None,
        };
        Some(primitive)
    }
}

lazy_static! {
    /// Matchers in priority order. At each offset the first one that matches
    /// wins, so keywords must stay ahead of `Identifier`.
    static ref MATCHERS: Vec<(TokenKind, Regex)> = [
        (TokenKind::Whitespace,  r"^[\s\x00]+"),
        (TokenKind::Comment,     r"^//[^\n]*"),
        (TokenKind::Define,      r"^#"),
        (TokenKind::Number,      r"^[+-]?\d*\.?\d+"),
        (TokenKind::Terminate,   r"^;"),
        (TokenKind::Array,       r"^\[\]"),
        (TokenKind::Optional,    r"^\?"),
        (TokenKind::Equals,      r"^="),
        (TokenKind::OpenBrace,   r"^\{"),
        (TokenKind::CloseBrace,  r"^\}"),
        (TokenKind::Message,     r"^message\b"),
        (TokenKind::Enum,        r"^enum\b"),
        (TokenKind::String,      r"^string\b"),
        (TokenKind::Int,         r"^int\b"),
        (TokenKind::Float,       r"^float\b"),
        (TokenKind::Double,      r"^double\b"),
        (TokenKind::Long,        r"^long\b"),
        (TokenKind::UInt,        r"^uint\b"),
        (TokenKind::Bool,        r"^bool\b"),
        (TokenKind::Byte,        r"^byte\b"),
        (TokenKind::SByte,       r"^sbyte\b"),
        (TokenKind::ULong,       r"^ulong\b"),
        (TokenKind::Short,       r"^short\b"),
        (TokenKind::UShort,      r"^ushort\b"),
        (TokenKind::Char,        r"^char\b"),
        (TokenKind::StringValue, r#"^"[^"]*""#),
        (TokenKind::Identifier,  r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:     TokenKind,
    pub text:     String,
    pub position: usize,
    pub line:     usize,
    pub column:   usize,
}

/// Splits `text` into every token, whitespace and comments included.
/// Fails at the first offset where no matcher applies.
pub fn lex(text: &str) -> Result<Vec<Token>, NsdError> {
    let mut tokens = Vec::new();
    let mut position = 0;
    let mut line = 1;
    let mut column = 1;

    while position < text.len() {
        let rest = &text[position..];
        let matched = MATCHERS
            .iter()
            .find_map(|(kind, regex)| regex.find(rest).map(|mat| (*kind, mat.as_str())));

        let (kind, part) = match matched {
            Some((kind, part)) if !part.is_empty() => (kind, part),
            _ => {
                let unexpected: String = rest.chars().take_while(|c| !c.is_whitespace()).take(16).collect();
                return Err(NsdError::Lex {
                    position,
                    line,
                    column,
                    text: quote(&unexpected),
                });
            }
        };

        tokens.push(Token {
            kind,
            text: part.to_string(),
            position,
            line,
            column,
        });

        // Update line/column
        match part.rfind('\n') {
            Some(last_newline) => {
                line += part.matches('\n').count();
                column = part[last_newline + 1..].chars().count() + 1;
            }
            None => column += part.chars().count(),
        }
        position += part.len();
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        text: String::new(),
        position,
        line,
        column,
    });
    Ok(tokens)
}

/// Tokens the parser consumes: everything but trivia, closed by an `Eof` token.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, NsdError> {
    let tokens: Vec<Token> = lex(text)?.into_iter().filter(|token| !token.kind.is_trivia()).collect();
    tracing::trace!(count = tokens.len(), "tokenized schema");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize_schema(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let input = "int x = 10;";
        let expected = vec![
            Token { kind: TokenKind::Int,        text: "int".into(), position: 0,  line: 1, column: 1 },
            Token { kind: TokenKind::Identifier, text: "x".into(),   position: 4,  line: 1, column: 5 },
            Token { kind: TokenKind::Equals,     text: "=".into(),   position: 6,  line: 1, column: 7 },
            Token { kind: TokenKind::Number,     text: "10".into(),  position: 8,  line: 1, column: 9 },
            Token { kind: TokenKind::Terminate,  text: ";".into(),   position: 10, line: 1, column: 11 },
            Token { kind: TokenKind::Eof,        text: "".into(),    position: 11, line: 1, column: 12 },
        ];
        assert_eq!(tokenize_schema(input).unwrap(), expected);
    }

    #[test]
    fn test_whitespace_is_produced_then_filtered() {
        let all = lex("enum  E").unwrap();
        assert_eq!(
            all.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Enum, TokenKind::Whitespace, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(kinds("enum  E"), vec![TokenKind::Enum, TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(
            kinds("message enum string int uint ushort sbyte char"),
            vec![
                TokenKind::Message,
                TokenKind::Enum,
                TokenKind::String,
                TokenKind::Int,
                TokenKind::UInt,
                TokenKind::UShort,
                TokenKind::SByte,
                TokenKind::Char,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_an_identifier() {
        let tokens = tokenize_schema("integer int_value messages").unwrap();
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[0].text, "integer");
    }

    #[test]
    fn test_field_modifiers() {
        assert_eq!(
            kinds("string?[] names = 2;"),
            vec![
                TokenKind::String,
                TokenKind::Optional,
                TokenKind::Array,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::Terminate,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_define_with_dotted_value() {
        let tokens = tokenize_schema("#namespace = Game.Net;").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Define);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].text, "Game.Net");
    }

    #[test]
    fn test_comments_and_string_values() {
        let tokens = tokenize_schema("// header\n#author = \"A. Person\";").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Define);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[3].kind, TokenKind::StringValue);
        assert_eq!(tokens[3].text, "\"A. Person\"");
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = tokenize_schema("message A {\n    int x;\n}").unwrap();
        let x = tokens.iter().find(|t| t.text == "x").unwrap();
        assert_eq!((x.line, x.column), (2, 9));
        let close = tokens.iter().find(|t| t.kind == TokenKind::CloseBrace).unwrap();
        assert_eq!((close.line, close.column), (3, 1));
    }

    #[test]
    fn test_signed_and_fractional_numbers() {
        let tokens = tokenize_schema("-3 +4 1.5").unwrap();
        assert_eq!(tokens[0].text, "-3");
        assert_eq!(tokens[1].text, "+4");
        assert_eq!(tokens[2].text, "1.5");
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let input = "message A { int? a; string[] b = 4; }";
        assert_eq!(tokenize_schema(input).unwrap(), tokenize_schema(input).unwrap());
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let err = tokenize_schema("int x = 10 @").unwrap_err();
        match err {
            NsdError::Lex { position, line, column, text } => {
                assert_eq!(position, 11);
                assert_eq!((line, column), (1, 12));
                assert_eq!(text, "\"@\"");
            }
            other => panic!("expected a Lex error but got {:?}", other),
        }
    }
}
