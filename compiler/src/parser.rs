use std::collections::HashMap;

use crate::{
    error::{IssueKind, SchemaError, SchemaIssue},
    tokenizer::{Token, TokenKind},
    types::{Define, EnumValue, FieldDefinition, FieldType, Keyword, Nsd, TypeBody, TypeDefinition},
    utils::quote,
    verifier::verify_schema,
};

/// Parses a token stream into an [`Nsd`].
///
/// The whole stream is always consumed. Syntax problems are recorded and the
/// parser resynchronizes at the next `;`, `}` or top-level keyword, so one
/// call reports every structural and semantic problem at once.
pub fn parse_schema(tokens: &[Token]) -> Result<Nsd, SchemaError> {
    let mut parser = Parser {
        tokens,
        index: 0,
        issues: Vec::new(),
    };
    let mut nsd = parser.parse_document();
    let mut issues = parser.issues;

    issues.extend(resolve_types(&mut nsd));
    issues.extend(verify_schema(&nsd));

    if issues.is_empty() {
        return Ok(nsd);
    }

    issues.sort_by_key(|issue| (issue.line, issue.column));
    for issue in &issues {
        tracing::debug!(kind = ?issue.kind, "{}", issue);
    }
    Err(SchemaError { causes: issues })
}

struct Parser<'a> {
    tokens: &'a [Token],
    index:  usize,
    issues: Vec<SchemaIssue>,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn kind(&self) -> TokenKind {
        self.current().map(|token| token.kind).unwrap_or(TokenKind::Eof)
    }

    fn describe_current(&self) -> String {
        match self.current() {
            Some(token) if token.kind != TokenKind::Eof => quote(&token.text),
            _ => "end of input".to_string(),
        }
    }

    /// Line and column of the current token, or of the end of the last one.
    fn location(&self) -> (usize, usize) {
        if let Some(token) = self.current() {
            return (token.line, token.column);
        }
        match self.tokens.last() {
            Some(last) => (last.line, last.column + last.text.chars().count()),
            None => (1, 1),
        }
    }

    fn issue_here(&self, kind: IssueKind, message: String) -> SchemaIssue {
        let (line, column) = self.location();
        SchemaIssue::new(kind, message, line, column)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        match self.current() {
            Some(token) if token.kind == kind => {
                self.index += 1;
                Some(token)
            }
            _ => None,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, SchemaIssue> {
        self.eat(kind).ok_or_else(|| {
            self.issue_here(
                IssueKind::UnexpectedToken,
                format!("Expected {} but found {}", expected, self.describe_current()),
            )
        })
    }

    /// A missing `;` is reported but nothing is consumed, so parsing continues
    /// with whatever follows.
    fn expect_terminator(&mut self, after: &str) {
        if self.eat(TokenKind::Terminate).is_none() {
            let issue = self.issue_here(
                IssueKind::MissingTerminator,
                format!("Expected \";\" after {} but found {}", after, self.describe_current()),
            );
            self.issues.push(issue);
        }
    }

    fn check_plain_name(&mut self, token: &Token, what: &str) {
        if token.text.contains('.') {
            self.issues.push(SchemaIssue::new(
                IssueKind::InvalidName,
                format!("The {} {} cannot contain \".\"", what, quote(&token.text)),
                token.line,
                token.column,
            ));
        }
    }

    fn recover_top_level(&mut self) {
        while !matches!(
            self.kind(),
            TokenKind::Eof | TokenKind::Define | TokenKind::Message | TokenKind::Enum
        ) {
            self.index += 1;
        }
    }

    fn recover_in_block(&mut self) {
        loop {
            match self.kind() {
                TokenKind::Terminate => {
                    self.index += 1;
                    break;
                }
                TokenKind::CloseBrace
                | TokenKind::Eof
                | TokenKind::Define
                | TokenKind::Message
                | TokenKind::Enum => break,
                _ => self.index += 1,
            }
        }
    }

    fn parse_document(&mut self) -> Nsd {
        let mut nsd = Nsd::default();

        loop {
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Define => match self.parse_define() {
                    Ok(define) => nsd.defines.push(define),
                    Err(issue) => {
                        self.issues.push(issue);
                        self.recover_top_level();
                    }
                },
                TokenKind::Message | TokenKind::Enum => match self.parse_type_definition() {
                    Ok(definition) => nsd.type_definitions.push(definition),
                    Err(issue) => {
                        self.issues.push(issue);
                        self.recover_top_level();
                    }
                },
                _ => {
                    let issue = self.issue_here(
                        IssueKind::UnexpectedToken,
                        format!("Unexpected token {}", self.describe_current()),
                    );
                    self.issues.push(issue);
                    self.index += 1;
                    self.recover_top_level();
                }
            }
        }

        nsd
    }

    // '#' ['define'] key '=' value ';'
    fn parse_define(&mut self) -> Result<Define, SchemaIssue> {
        self.expect(TokenKind::Define, "\"#\"")?;

        let spelled_out = matches!(
            (self.current(), self.tokens.get(self.index + 1)),
            (Some(first), Some(next))
                if first.kind == TokenKind::Identifier
                    && first.text == "define"
                    && next.kind == TokenKind::Identifier
        );
        if spelled_out {
            self.index += 1;
        }

        let key = self.expect(TokenKind::Identifier, "a define key")?;
        self.expect(TokenKind::Equals, "\"=\"")?;

        let value = match self.kind() {
            TokenKind::Identifier | TokenKind::Number => self.current().map(|t| t.text.clone()),
            TokenKind::StringValue => self.current().map(|t| t.text.trim_matches('"').to_string()),
            _ => None,
        };
        let value = match value {
            Some(value) => {
                self.index += 1;
                value
            }
            None => {
                return Err(self.issue_here(
                    IssueKind::UnexpectedToken,
                    format!("Expected a define value but found {}", self.describe_current()),
                ))
            }
        };

        self.expect_terminator(&format!("define {}", quote(&key.text)));

        Ok(Define {
            key: key.text.clone(),
            value,
        })
    }

    fn parse_type_definition(&mut self) -> Result<TypeDefinition, SchemaIssue> {
        let keyword = if self.eat(TokenKind::Enum).is_some() {
            Keyword::Enum
        } else {
            self.expect(TokenKind::Message, "\"message\" or \"enum\"")?;
            Keyword::Message
        };

        let name = self.expect(TokenKind::Identifier, "a type name")?;
        self.check_plain_name(name, "type name");
        self.expect(TokenKind::OpenBrace, "\"{\"")?;

        let mut fields = Vec::new();
        let mut values = Vec::new();

        loop {
            match self.kind() {
                TokenKind::CloseBrace => {
                    self.index += 1;
                    break;
                }
                TokenKind::Eof | TokenKind::Define | TokenKind::Message | TokenKind::Enum => {
                    let issue = self.issue_here(
                        IssueKind::UnexpectedToken,
                        format!(
                            "Expected \"}}\" to close {} but found {}",
                            quote(&name.text),
                            self.describe_current()
                        ),
                    );
                    self.issues.push(issue);
                    break;
                }
                _ => {}
            }

            let entry = match keyword {
                Keyword::Message => self.parse_field(fields.len()).map(|field| fields.push(field)),
                Keyword::Enum => self.parse_enum_value(values.len()).map(|value| values.push(value)),
            };
            if let Err(issue) = entry {
                self.issues.push(issue);
                self.recover_in_block();
            }
        }

        let body = match keyword {
            Keyword::Message => TypeBody::Message(fields),
            Keyword::Enum => TypeBody::Enum(values),
        };

        Ok(TypeDefinition {
            name: name.text.clone(),
            line: name.line,
            column: name.column,
            body,
        })
    }

    // Type ['?'] ['[]'] name ['=' id] ';'
    fn parse_field(&mut self, declaration_index: usize) -> Result<FieldDefinition, SchemaIssue> {
        let type_token = match self.current() {
            Some(token) if token.kind == TokenKind::Identifier || token.kind.primitive().is_some() => {
                self.index += 1;
                token
            }
            _ => {
                return Err(self.issue_here(
                    IssueKind::UnexpectedToken,
                    format!("Expected a field type but found {}", self.describe_current()),
                ))
            }
        };
        if type_token.kind == TokenKind::Identifier {
            self.check_plain_name(type_token, "type name");
        }
        // Named types are resolved once the whole document is known.
        let field_type = type_token
            .kind
            .primitive()
            .map(FieldType::Primitive)
            .unwrap_or(FieldType::Object);

        let mut is_optional = false;
        let mut is_array = false;
        loop {
            let seen = match self.kind() {
                TokenKind::Optional => std::mem::replace(&mut is_optional, true),
                TokenKind::Array => std::mem::replace(&mut is_array, true),
                _ => break,
            };
            if seen {
                let issue = self.issue_here(
                    IssueKind::UnexpectedToken,
                    format!("Repeated modifier {}", self.describe_current()),
                );
                self.issues.push(issue);
            }
            self.index += 1;
        }

        let name = self.expect(TokenKind::Identifier, "a field name")?;
        self.check_plain_name(name, "field name");

        let id = if self.eat(TokenKind::Equals).is_some() {
            let number = self.expect(TokenKind::Number, "a field id")?;
            match number.text.parse::<u16>() {
                Ok(id) => id,
                Err(_) => {
                    self.issues.push(SchemaIssue::new(
                        IssueKind::MalformedNumber,
                        format!(
                            "The id {} of field {} is not an integer between 0 and 65535",
                            quote(&number.text),
                            quote(&name.text)
                        ),
                        number.line,
                        number.column,
                    ));
                    auto_id(declaration_index)
                }
            }
        } else {
            auto_id(declaration_index)
        };

        self.expect_terminator(&format!("field {}", quote(&name.text)));

        Ok(FieldDefinition {
            field_type,
            type_name: type_token.text.clone(),
            name: name.text.clone(),
            id,
            is_optional,
            is_array,
            line: type_token.line,
            column: type_token.column,
        })
    }

    // name ['=' value] ';'
    fn parse_enum_value(&mut self, declaration_index: usize) -> Result<EnumValue, SchemaIssue> {
        let name = self.expect(TokenKind::Identifier, "an enum entry name")?;
        self.check_plain_name(name, "enum entry");

        let value = if self.eat(TokenKind::Equals).is_some() {
            let number = self.expect(TokenKind::Number, "an enum value")?;
            match number.text.parse::<i32>() {
                Ok(value) => value,
                Err(_) => {
                    self.issues.push(SchemaIssue::new(
                        IssueKind::MalformedNumber,
                        format!(
                            "The value {} of enum entry {} is not a 32-bit integer",
                            quote(&number.text),
                            quote(&name.text)
                        ),
                        number.line,
                        number.column,
                    ));
                    declaration_index as i32
                }
            }
        } else {
            i32::try_from(declaration_index).unwrap_or(i32::MAX)
        };

        self.expect_terminator(&format!("enum entry {}", quote(&name.text)));

        Ok(EnumValue {
            name: name.text.clone(),
            value,
            line: name.line,
            column: name.column,
        })
    }
}

fn auto_id(declaration_index: usize) -> u16 {
    u16::try_from(declaration_index).unwrap_or(u16::MAX)
}

/// Binds every named field type to the enum or message declared with that
/// name. Unknown names are reported and left as objects.
fn resolve_types(nsd: &mut Nsd) -> Vec<SchemaIssue> {
    let mut keywords: HashMap<String, Keyword> = HashMap::new();
    for definition in &nsd.type_definitions {
        keywords.entry(definition.name.clone()).or_insert_with(|| definition.keyword());
    }

    let mut issues = Vec::new();
    for definition in &mut nsd.type_definitions {
        let TypeBody::Message(fields) = &mut definition.body else {
            continue;
        };
        for field in fields.iter_mut() {
            if let FieldType::Primitive(_) = field.field_type {
                continue;
            }
            match keywords.get(&field.type_name) {
                Some(Keyword::Enum) => field.field_type = FieldType::Enum,
                Some(Keyword::Message) => field.field_type = FieldType::Object,
                None => issues.push(SchemaIssue::new(
                    IssueKind::UnresolvedType,
                    format!(
                        "The type {} of field {} is not defined",
                        quote(&field.type_name),
                        quote(&field.name)
                    ),
                    field.line,
                    field.column,
                )),
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_schema;
    use crate::types::Primitive;

    fn parse(text: &str) -> Result<Nsd, SchemaError> {
        parse_schema(&tokenize_schema(text).unwrap())
    }

    fn issue_kinds(text: &str) -> Vec<IssueKind> {
        parse(text).unwrap_err().causes.into_iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_parse_message_and_enum() {
        let nsd = parse(
            "#namespace = Game.Net;
             enum Color { Red = 1; Green = 2; }
             message Player {
                 string name = 0;
                 int? score = 1;
                 Color[] colors = 2;
                 Player[]? friends = 3;
             }",
        )
        .unwrap();

        assert_eq!(nsd.namespace(), Some("Game.Net"));
        assert_eq!(nsd.type_definitions.len(), 2);

        let color = &nsd.type_definitions[0];
        assert_eq!(color.keyword(), Keyword::Enum);
        assert_eq!(
            color.enum_values().iter().map(|v| (v.name.as_str(), v.value)).collect::<Vec<_>>(),
            vec![("Red", 1), ("Green", 2)]
        );

        let fields = nsd.type_definitions[1].fields();
        assert_eq!(fields[0].field_type, FieldType::Primitive(Primitive::String));
        assert!(fields[1].is_optional && !fields[1].is_array);
        assert_eq!(fields[2].field_type, FieldType::Enum);
        assert!(fields[2].is_array);
        assert_eq!(fields[3].field_type, FieldType::Object);
        assert!(fields[3].is_optional && fields[3].is_array);
    }

    #[test]
    fn test_auto_ids_follow_declaration_order() {
        let nsd = parse("message M { int a; int b; int c; } enum E { X; Y; }").unwrap();
        let ids: Vec<u16> = nsd.type_definitions[0].fields().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        let values: Vec<i32> = nsd.type_definitions[1].enum_values().iter().map(|v| v.value).collect();
        assert_eq!(values, vec![0, 1]);
    }

    #[test]
    fn test_modifiers_in_either_order() {
        let nsd = parse("message M { int[]? a = 0; int?[] b = 1; }").unwrap();
        for field in nsd.type_definitions[0].fields() {
            assert!(field.is_optional && field.is_array, "{}", field);
        }
    }

    #[test]
    fn test_define_forms() {
        let nsd = parse("#define namespace = Outer; #author = \"Some One\"; #version = 3;").unwrap();
        assert_eq!(nsd.define("namespace"), Some("Outer"));
        assert_eq!(nsd.define("author"), Some("Some One"));
        assert_eq!(nsd.define("version"), Some("3"));
    }

    #[test]
    fn test_duplicate_id_is_reported() {
        let err = parse("message M { int a = 1; int b = 1; }").unwrap_err();
        assert!(err.has(IssueKind::DuplicateFieldId));
    }

    #[test]
    fn test_independent_errors_are_aggregated() {
        let err = parse("message M { int a = 1; int b = 1; Missing c = 2; }").unwrap_err();
        assert!(err.has(IssueKind::DuplicateFieldId));
        assert!(err.has(IssueKind::UnresolvedType));
        assert_eq!(err.causes.len(), 2);
    }

    #[test]
    fn test_syntax_errors_are_aggregated() {
        let kinds = issue_kinds(
            "message A { int a = 1 int b = 2; }
             message B { int x = abc; long y = 1.5; }
             } message C { string s; }",
        );
        assert_eq!(
            kinds,
            vec![
                IssueKind::MissingTerminator,
                IssueKind::UnexpectedToken,
                IssueKind::MalformedNumber,
                IssueKind::UnexpectedToken,
            ]
        );
    }

    #[test]
    fn test_causes_carry_positions() {
        let err = parse("message M {\n  int a = 0;\n  int a = 1;\n}").unwrap_err();
        let cause = &err.causes[0];
        assert_eq!(cause.kind, IssueKind::DuplicateFieldName);
        assert_eq!((cause.line, cause.column), (3, 3));
    }

    #[test]
    fn test_missing_close_brace() {
        let err = parse("message M { int a;").unwrap_err();
        assert_eq!(err.causes.len(), 1);
        assert!(err.causes[0].message.contains("end of input"));
    }

    #[test]
    fn test_field_id_out_of_range() {
        assert_eq!(issue_kinds("message M { int a = 70000; }"), vec![IssueKind::MalformedNumber]);
        assert_eq!(issue_kinds("message M { int a = -1; }"), vec![IssueKind::MalformedNumber]);
        assert_eq!(issue_kinds("message M { int a = 65535; }"), vec![IssueKind::ReservedFieldId]);
    }

    #[test]
    fn test_dotted_names_are_rejected() {
        let kinds = issue_kinds("message A.B { int x.y; }");
        assert_eq!(kinds, vec![IssueKind::InvalidName, IssueKind::InvalidName]);
    }

    #[test]
    fn test_empty_input() {
        let nsd = parse("").unwrap();
        assert!(nsd.type_definitions.is_empty());
        assert!(parse_schema(&[]).unwrap().defines.is_empty());
    }
}
