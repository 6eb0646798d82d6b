//! Test fixtures
//!
//! An in-memory tokenizer whose "files" are token-type scripts, plus token helpers.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use codesim_core::shared::models::{CodeSemantics, Token, TokenType};
use codesim_core::shared::ports::{TokenizationError, Tokenizer};

#[derive(Debug, Clone)]
pub struct FixtureToken {
    pub name: String,
    pub line: u32,
    pub semantics: Option<CodeSemantics>,
}

/// Tokenizer serving pre-registered token scripts by file path
#[derive(Debug, Clone)]
pub struct InMemoryTokenizer {
    files: HashMap<PathBuf, Vec<FixtureToken>>,
    failing: HashSet<PathBuf>,
    annotated: bool,
    file_ends: bool,
    minimum_tile_length: usize,
}

impl Default for InMemoryTokenizer {
    fn default() -> Self {
        Self {
            files: HashMap::new(),
            failing: HashSet::new(),
            annotated: false,
            file_ends: true,
            minimum_tile_length: 3,
        }
    }
}

impl InMemoryTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file of whitespace-separated token types, one token per line
    pub fn with_file(mut self, path: &str, script: &str) -> Self {
        let tokens = script
            .split_whitespace()
            .enumerate()
            .map(|(i, name)| FixtureToken {
                name: name.to_string(),
                line: i as u32 + 1,
                semantics: None,
            })
            .collect();
        self.files.insert(PathBuf::from(path), tokens);
        self
    }

    /// Register a file of annotated statements, one statement per line
    pub fn with_statements(mut self, path: &str, statements: Vec<(&str, CodeSemantics)>) -> Self {
        let mut tokens = Vec::new();
        for (i, (script, semantics)) in statements.into_iter().enumerate() {
            for name in script.split_whitespace() {
                tokens.push(FixtureToken {
                    name: name.to_string(),
                    line: i as u32 + 1,
                    semantics: Some(semantics.clone()),
                });
            }
        }
        self.files.insert(PathBuf::from(path), tokens);
        self.annotated = true;
        self
    }

    pub fn with_failing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn with_minimum_tile_length(mut self, length: usize) -> Self {
        self.minimum_tile_length = length;
        self
    }

    /// Do not append file-end tokens
    pub fn without_file_ends(mut self) -> Self {
        self.file_ends = false;
        self
    }

    pub fn into_arc(self) -> Arc<dyn Tokenizer> {
        Arc::new(self)
    }
}

impl Tokenizer for InMemoryTokenizer {
    fn identifier(&self) -> &str {
        "in-memory"
    }

    fn minimum_tile_length(&self) -> usize {
        self.minimum_tile_length
    }

    fn supports_normalization(&self) -> bool {
        self.annotated
    }

    fn parse(&self, files: &BTreeSet<PathBuf>) -> Result<Vec<Token>, TokenizationError> {
        let mut tokens = Vec::new();
        for file in files {
            if self.failing.contains(file) {
                return Err(TokenizationError::in_file(
                    format!("unexpected token in {}", file.display()),
                    file,
                ));
            }
            let script = self.files.get(file).ok_or_else(|| {
                TokenizationError::in_file(format!("unknown file {}", file.display()), file)
            })?;

            let path: Arc<Path> = Arc::from(file.as_path());
            for (i, fixture) in script.iter().enumerate() {
                let token = Token::new(
                    TokenType::new(fixture.name.as_str()),
                    Arc::clone(&path),
                    fixture.line,
                    i as u32 + 1,
                    1,
                );
                tokens.push(match &fixture.semantics {
                    Some(semantics) => token.with_semantics(semantics.clone()),
                    None => token,
                });
            }
            if self.file_ends {
                tokens.push(Token::file_end(path));
            }
        }
        Ok(tokens)
    }
}

/// Tokens of a single file from a whitespace-separated script, with a trailing file end
pub fn tokens(script: &str) -> Vec<Token> {
    let file: Arc<Path> = Arc::from(Path::new("fixture.txt"));
    let mut tokens: Vec<Token> = script
        .split_whitespace()
        .enumerate()
        .map(|(i, name)| Token::new(TokenType::new(name), Arc::clone(&file), i as u32 + 1, 1, 1))
        .collect();
    tokens.push(Token::file_end(file));
    tokens
}

/// Token type names of a stream
pub fn type_names(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(|t| t.token_type.to_string()).collect()
}
