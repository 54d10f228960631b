use crate::{
    compiler::DocumentCompiler,
    error::NsdError,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::Nsd,
};

/// A named schema text, e.g. the contents of one `.nsd` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name:    String,
    pub content: String,
}

impl Source {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Source {
            name:    name.into(),
            content: content.into(),
        }
    }
}

/// Schema text in, generated Rust out.
///
/// The emitter holds no per-call state: the token matchers are compiled once
/// for the whole process and every compile gets its own parser, so one
/// `Emitter` can be shared between threads without locking.
#[derive(Default)]
pub struct Emitter {
    compiler: DocumentCompiler,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compiler(compiler: DocumentCompiler) -> Self {
        Emitter { compiler }
    }

    /// Tokenizes and parses `source` without generating code.
    pub fn parse(&self, source: &str) -> Result<Nsd, NsdError> {
        let tokens = tokenize_schema(source)?;
        Ok(parse_schema(&tokens)?)
    }

    /// Compiles one schema. `name` is recorded in the document header.
    pub fn compile(&self, name: &str, source: &str) -> Result<String, NsdError> {
        let tokens = tokenize_schema(source)?;
        let nsd = parse_schema(&tokens)?;
        tracing::debug!(
            source = name,
            tokens = tokens.len(),
            types = nsd.type_definitions.len(),
            "compiling schema"
        );
        self.compiler.compile(&nsd, Some(name))
    }

    /// Compiles every source in order, stopping at the first failure.
    pub fn compile_all(&self, sources: &[Source]) -> Result<Vec<String>, NsdError> {
        sources
            .iter()
            .map(|source| self.compile(&source.name, &source.content))
            .collect()
    }
}
