//! Token model
//!
//! Tokens are produced by a [`Tokenizer`](crate::shared::ports::Tokenizer) and form the
//! vocabulary every later stage works on. Only [`TokenType`] takes part in matching;
//! file, line and column exist for attribution and printing.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Opaque token kind chosen by the tokenizer
///
/// Two tokens match during tiling iff their types are equal. `FileEnd` is the
/// boundary marker every tokenizer appends once per file; it never matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    /// End-of-file boundary marker
    FileEnd,

    /// Tokenizer-defined symbol (e.g. `METHOD_BEGIN`, `ASSIGN`)
    Symbol(Arc<str>),
}

impl TokenType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        TokenType::Symbol(name.into())
    }

    pub fn file_end() -> Self {
        TokenType::FileEnd
    }

    pub fn is_file_end(&self) -> bool {
        matches!(self, TokenType::FileEnd)
    }

    pub fn name(&self) -> &str {
        match self {
            TokenType::FileEnd => "<EOF>",
            TokenType::Symbol(name) => name,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variable identity used by normalization annotations
pub type Variable = Arc<str>;

/// How strongly a statement is pinned to its position relative to its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PositionSignificance {
    /// Free to move within data dependencies
    #[default]
    None,

    /// Keeps its order relative to other partially significant statements (calls, I/O)
    Partial,

    /// Acts as a barrier: nothing moves across it (return, break, block boundaries)
    Full,
}

/// Normalization annotations attached by a tokenizer
///
/// A statement's semantics is the [`join`](CodeSemantics::join) of the semantics of its
/// tokens. Tokenizers that do not annotate leave [`Token::semantics`] empty, which makes
/// their streams unsupported by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeSemantics {
    keep: bool,
    position_significance: PositionSignificance,
    loop_begin: bool,
    loop_end: bool,
    reads: BTreeSet<Variable>,
    writes: BTreeSet<Variable>,
}

impl CodeSemantics {
    /// No observable effect on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Observable effect without ordering constraints
    pub fn keep() -> Self {
        Self {
            keep: true,
            ..Self::default()
        }
    }

    /// Observable effect ordered against other critical statements (calls, I/O)
    pub fn critical() -> Self {
        Self {
            keep: true,
            position_significance: PositionSignificance::Partial,
            ..Self::default()
        }
    }

    /// Control flow: observable and a full ordering barrier
    pub fn control() -> Self {
        Self {
            keep: true,
            position_significance: PositionSignificance::Full,
            ..Self::default()
        }
    }

    pub fn loop_begin() -> Self {
        Self {
            loop_begin: true,
            ..Self::control()
        }
    }

    pub fn loop_end() -> Self {
        Self {
            loop_end: true,
            ..Self::control()
        }
    }

    pub fn with_read(mut self, variable: impl Into<Variable>) -> Self {
        self.add_read(variable);
        self
    }

    pub fn with_write(mut self, variable: impl Into<Variable>) -> Self {
        self.add_write(variable);
        self
    }

    pub fn add_read(&mut self, variable: impl Into<Variable>) {
        self.reads.insert(variable.into());
    }

    pub fn add_write(&mut self, variable: impl Into<Variable>) {
        self.writes.insert(variable.into());
    }

    pub fn is_keep(&self) -> bool {
        self.keep
    }

    pub fn position_significance(&self) -> PositionSignificance {
        self.position_significance
    }

    pub fn is_loop_begin(&self) -> bool {
        self.loop_begin
    }

    pub fn is_loop_end(&self) -> bool {
        self.loop_end
    }

    pub fn reads(&self) -> &BTreeSet<Variable> {
        &self.reads
    }

    pub fn writes(&self) -> &BTreeSet<Variable> {
        &self.writes
    }

    /// Variables read or written
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.reads.iter().chain(self.writes.iter())
    }

    /// Combine the semantics of several tokens into one statement-level semantics
    pub fn join<'a>(parts: impl IntoIterator<Item = &'a CodeSemantics>) -> Self {
        let mut joined = Self::default();
        for part in parts {
            joined.keep |= part.keep;
            joined.position_significance = joined
                .position_significance
                .max(part.position_significance);
            joined.loop_begin |= part.loop_begin;
            joined.loop_end |= part.loop_end;
            joined.reads.extend(part.reads.iter().cloned());
            joined.writes.extend(part.writes.iter().cloned());
        }
        joined
    }
}

/// One lexical/structural unit of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,

    /// File the token was read from
    pub file: Arc<Path>,

    /// 1-based source line (0 for synthetic tokens)
    pub line: u32,

    /// 1-based source column (0 when unknown)
    pub column: u32,

    /// Length in characters (0 when unknown)
    pub length: u32,

    pub semantics: Option<CodeSemantics>,
}

impl Token {
    pub fn new(token_type: TokenType, file: Arc<Path>, line: u32, column: u32, length: u32) -> Self {
        Self {
            token_type,
            file,
            line,
            column,
            length,
            semantics: None,
        }
    }

    /// Boundary marker closing `file`
    pub fn file_end(file: Arc<Path>) -> Self {
        Self::new(TokenType::FileEnd, file, 0, 0, 0)
    }

    pub fn with_semantics(mut self, semantics: CodeSemantics) -> Self {
        self.semantics = Some(semantics);
        self
    }

    pub fn is_file_end(&self) -> bool {
        self.token_type.is_file_end()
    }

    /// Source line this token is attributed to
    pub fn source_line(&self) -> SourceLine {
        SourceLine {
            file: Arc::clone(&self.file),
            line: self.line,
        }
    }
}

/// A line of a specific file, used to report normalization effects
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLine {
    pub file: Arc<Path>,
    pub line: u32,
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
