//! Statement groups
//!
//! A statement is the unit normalization moves or drops: a maximal run of
//! consecutive tokens sharing file and line. File-end tokens always form a
//! statement of their own.

use std::ops::Range;

use super::error::NormalizationError;
use crate::shared::models::{CodeSemantics, SourceLine, Token, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Position among all statements, in original order
    index: usize,

    /// Token positions in the original stream
    tokens: Range<usize>,

    types: Vec<TokenType>,
    semantics: CodeSemantics,
    line: SourceLine,
}

impl Statement {
    /// Split a stream into statements
    ///
    /// Every non-file-end token must carry semantics. File ends are treated as
    /// control statements so files never interleave.
    pub fn group(tokens: &[Token]) -> Result<Vec<Statement>, NormalizationError> {
        let mut statements = Vec::new();
        let mut start = 0;

        while start < tokens.len() {
            let first = &tokens[start];
            let mut end = start + 1;
            if !first.is_file_end() {
                while end < tokens.len()
                    && !tokens[end].is_file_end()
                    && tokens[end].line == first.line
                    && tokens[end].file == first.file
                {
                    end += 1;
                }
            }

            let semantics = if first.is_file_end() {
                CodeSemantics::control()
            } else {
                let mut parts = Vec::with_capacity(end - start);
                for (offset, token) in tokens[start..end].iter().enumerate() {
                    match &token.semantics {
                        Some(semantics) => parts.push(semantics),
                        None => {
                            return Err(NormalizationError::MissingSemantics {
                                index: start + offset,
                            })
                        }
                    }
                }
                CodeSemantics::join(parts)
            };

            statements.push(Statement {
                index: statements.len(),
                tokens: start..end,
                types: tokens[start..end]
                    .iter()
                    .map(|t| t.token_type.clone())
                    .collect(),
                semantics,
                line: first.source_line(),
            });
            start = end;
        }

        Ok(statements)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn token_range(&self) -> Range<usize> {
        self.tokens.clone()
    }

    pub fn types(&self) -> &[TokenType] {
        &self.types
    }

    pub fn semantics(&self) -> &CodeSemantics {
        &self.semantics
    }

    pub fn line(&self) -> &SourceLine {
        &self.line
    }

    pub fn is_file_end(&self) -> bool {
        self.types.len() == 1 && self.types[0].is_file_end()
    }

    /// Ordering used among statements that are free to move relative to each other
    ///
    /// Compares token types first so that reordered independent statements land in
    /// the same place; original position only separates identical statements.
    pub fn canonical_key(&self) -> CanonicalKey<'_> {
        CanonicalKey {
            types: &self.types,
            index: self.index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CanonicalKey<'a> {
    types: &'a [TokenType],
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    fn token(name: &str, line: u32) -> Token {
        Token::new(TokenType::new(name), Arc::from(Path::new("A.java")), line, 1, 1)
            .with_semantics(CodeSemantics::new())
    }

    #[test]
    fn test_groups_by_line() {
        let tokens = vec![
            token("VARDEF", 1),
            token("ASSIGN", 1),
            token("APPLY", 2),
            Token::file_end(Arc::from(Path::new("A.java"))),
        ];

        let statements = Statement::group(&tokens).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].token_range(), 0..2);
        assert_eq!(statements[1].token_range(), 2..3);
        assert!(statements[2].is_file_end());
        assert!(statements[2].semantics().is_keep());
    }

    #[test]
    fn test_same_line_different_file_splits() {
        let tokens = vec![
            token("VARDEF", 1),
            Token::new(TokenType::new("VARDEF"), Arc::from(Path::new("B.java")), 1, 1, 1)
                .with_semantics(CodeSemantics::new()),
        ];

        assert_eq!(Statement::group(&tokens).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_semantics_reported() {
        let mut tokens = vec![token("VARDEF", 1), token("ASSIGN", 1)];
        tokens[1].semantics = None;

        assert_eq!(
            Statement::group(&tokens),
            Err(NormalizationError::MissingSemantics { index: 1 })
        );
    }

    #[test]
    fn test_canonical_key_prefers_types() {
        let tokens = vec![token("B", 1), token("A", 2)];
        let statements = Statement::group(&tokens).unwrap();
        assert!(statements[1].canonical_key() < statements[0].canonical_key());
    }
}
