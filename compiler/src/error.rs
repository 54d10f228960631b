use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NsdError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error at line {line}, column {column}: unexpected {text}")]
    Lex {
        position: usize,
        line:     usize,
        column:   usize,
        text:     String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Unsupported type {type_name}: {reason}")]
    UnsupportedType {
        type_name: String,
        reason:    String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What went wrong in one schema cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    UnexpectedToken,
    MissingTerminator,
    MalformedNumber,
    InvalidName,
    DuplicateTypeName,
    DuplicateFieldId,
    DuplicateFieldName,
    ReservedFieldId,
    UnresolvedType,
    DuplicateEnumName,
    DuplicateEnumValue,
    EmptyEnum,
    RecursiveMessage,
}

/// One structural or semantic problem found while parsing a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub kind:    IssueKind,
    pub message: String,
    pub line:    usize,
    pub column:  usize,
}

impl SchemaIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        SchemaIssue {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

/// Every problem found in one parse, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SchemaError {
    pub causes: Vec<SchemaIssue>,
}

impl SchemaError {
    pub fn has(&self, kind: IssueKind) -> bool {
        self.causes.iter().any(|cause| cause.kind == kind)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema has {} error(s)", self.causes.len())?;
        for cause in &self.causes {
            write!(f, "\n  {}", cause)?;
        }
        Ok(())
    }
}
