//! Tree-sitter tokenizer
//!
//! This is where the tree-sitter dependency lives. Each structural node kind of
//! interest becomes one token (blocks get a begin and an end token); identifiers,
//! literals and layout never become tokens, so renaming and reformatting do not
//! change the stream.
//!
//! Tokens carry no [`CodeSemantics`](crate::shared::models::CodeSemantics), so
//! `supports_normalization` is false and submissions tokenized here skip
//! normalization. Dead-code and reordering invariance needs a tokenizer that
//! annotates reads, writes and position significance.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use tree_sitter::{Node, Parser as TSParser};

use crate::shared::models::{Token, TokenType};
use crate::shared::ports::{TokenizationError, Tokenizer};

/// Supported tree-sitter languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Python,
    Java,
}

impl SourceLanguage {
    fn ts_language(&self) -> tree_sitter::Language {
        match self {
            SourceLanguage::Python => tree_sitter_python::language(),
            SourceLanguage::Java => tree_sitter_java::language(),
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
            SourceLanguage::Java => "java",
        }
    }

    /// Default minimum tile length
    pub fn minimum_tile_length(&self) -> usize {
        match self {
            SourceLanguage::Python => 12,
            SourceLanguage::Java => 9,
        }
    }

    /// Token type(s) for a node kind: the opening token and, for blocks, the closing one
    fn map_node_kind(&self, kind: &str) -> Option<(&'static str, Option<&'static str>)> {
        match self {
            SourceLanguage::Python => python_token(kind),
            SourceLanguage::Java => java_token(kind),
        }
    }
}

fn python_token(kind: &str) -> Option<(&'static str, Option<&'static str>)> {
    let mapped = match kind {
        // Blocks
        "function_definition" => ("DEF_BEGIN", Some("DEF_END")),
        "class_definition" => ("CLASS_BEGIN", Some("CLASS_END")),
        "if_statement" => ("IF_BEGIN", Some("IF_END")),
        "for_statement" => ("FOR_BEGIN", Some("FOR_END")),
        "while_statement" => ("WHILE_BEGIN", Some("WHILE_END")),
        "try_statement" => ("TRY_BEGIN", Some("TRY_END")),
        "with_statement" => ("WITH_BEGIN", Some("WITH_END")),

        // Clauses
        "elif_clause" => ("ELIF", None),
        "else_clause" => ("ELSE", None),
        "except_clause" => ("EXCEPT", None),
        "finally_clause" => ("FINALLY", None),

        // Statements
        "assignment" | "augmented_assignment" => ("ASSIGN", None),
        "return_statement" => ("RETURN", None),
        "break_statement" => ("BREAK", None),
        "continue_statement" => ("CONTINUE", None),
        "raise_statement" => ("RAISE", None),
        "pass_statement" => ("PASS", None),
        "assert_statement" => ("ASSERT", None),
        "delete_statement" => ("DEL", None),
        "global_statement" | "nonlocal_statement" => ("GLOBAL", None),
        "import_statement" | "import_from_statement" => ("IMPORT", None),

        // Expressions
        "call" => ("APPLY", None),
        "lambda" => ("LAMBDA", None),
        "yield" => ("YIELD", None),
        "await" => ("AWAIT", None),
        "decorator" => ("DECORATOR", None),
        "list_comprehension"
        | "set_comprehension"
        | "dictionary_comprehension"
        | "generator_expression" => ("COMPREHENSION", None),

        _ => return None,
    };
    Some(mapped)
}

fn java_token(kind: &str) -> Option<(&'static str, Option<&'static str>)> {
    let mapped = match kind {
        // Declarations
        "class_declaration" | "record_declaration" => ("CLASS_BEGIN", Some("CLASS_END")),
        "interface_declaration" => ("INTERFACE_BEGIN", Some("INTERFACE_END")),
        "enum_declaration" => ("ENUM_BEGIN", Some("ENUM_END")),
        "method_declaration" => ("METHOD_BEGIN", Some("METHOD_END")),
        "constructor_declaration" => ("CONSTRUCTOR_BEGIN", Some("CONSTRUCTOR_END")),
        "field_declaration" => ("FIELD", None),
        "local_variable_declaration" => ("VARDEF", None),
        "import_declaration" => ("IMPORT", None),
        "package_declaration" => ("PACKAGE", None),

        // Blocks
        "if_statement" => ("IF_BEGIN", Some("IF_END")),
        "for_statement" | "enhanced_for_statement" => ("FOR_BEGIN", Some("FOR_END")),
        "while_statement" => ("WHILE_BEGIN", Some("WHILE_END")),
        "do_statement" => ("DO_BEGIN", Some("DO_END")),
        "try_statement" | "try_with_resources_statement" => ("TRY_BEGIN", Some("TRY_END")),
        "switch_expression" => ("SWITCH_BEGIN", Some("SWITCH_END")),
        "catch_clause" => ("CATCH", None),
        "finally_clause" => ("FINALLY", None),
        "switch_label" => ("CASE", None),

        // Statements
        "return_statement" => ("RETURN", None),
        "break_statement" => ("BREAK", None),
        "continue_statement" => ("CONTINUE", None),
        "throw_statement" => ("THROW", None),

        // Expressions
        "assignment_expression" => ("ASSIGN", None),
        "method_invocation" => ("APPLY", None),
        "object_creation_expression" => ("NEW", None),
        "array_creation_expression" => ("NEWARRAY", None),
        "lambda_expression" => ("LAMBDA", None),
        "ternary_expression" => ("COND", None),

        _ => return None,
    };
    Some(mapped)
}

/// Tree-sitter based tokenizer
#[derive(Debug, Clone, Copy)]
pub struct TreeSitterTokenizer {
    language: SourceLanguage,
}

impl TreeSitterTokenizer {
    pub fn new(language: SourceLanguage) -> Self {
        Self { language }
    }

    pub fn python() -> Self {
        Self::new(SourceLanguage::Python)
    }

    pub fn java() -> Self {
        Self::new(SourceLanguage::Java)
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Tokenize one file's source, appending to `tokens`
    fn tokenize_file(
        &self,
        parser: &mut TSParser,
        file: &Path,
        source: &str,
        tokens: &mut Vec<Token>,
    ) -> Result<(), TokenizationError> {
        let tree = parser.parse(source, None).ok_or_else(|| {
            TokenizationError::in_file(format!("failed to parse {}", file.display()), file)
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error(root).map_or(0, |n| n.start_position().row + 1);
            return Err(TokenizationError::in_file(
                format!("syntax error in {} at line {}", file.display(), line),
                file,
            ));
        }

        let file: Arc<Path> = Arc::from(file);
        let start = tokens.len();

        enum Visit<'t> {
            Enter(Node<'t>),
            Exit(Node<'t>, &'static str),
        }

        let mut stack = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node) => {
                    if node.is_extra() {
                        continue;
                    }
                    if let Some((begin, end)) = self.language.map_node_kind(node.kind()) {
                        tokens.push(node_token(begin, &file, node));
                        if let Some(end) = end {
                            stack.push(Visit::Exit(node, end));
                        }
                    }
                    // Reverse so children pop in source order
                    for i in (0..node.child_count()).rev() {
                        if let Some(child) = node.child(i) {
                            stack.push(Visit::Enter(child));
                        }
                    }
                }
                Visit::Exit(node, end) => {
                    let position = node.end_position();
                    tokens.push(Token::new(
                        TokenType::new(end),
                        Arc::clone(&file),
                        position.row as u32 + 1,
                        position.column as u32 + 1,
                        0,
                    ));
                }
            }
        }

        tokens.push(Token::file_end(Arc::clone(&file)));
        debug!(
            file = %file.display(),
            tokens = tokens.len() - start,
            language = self.language.identifier(),
            "tokenized file"
        );
        Ok(())
    }
}

impl Tokenizer for TreeSitterTokenizer {
    fn identifier(&self) -> &str {
        self.language.identifier()
    }

    fn minimum_tile_length(&self) -> usize {
        self.language.minimum_tile_length()
    }

    fn parse(&self, files: &BTreeSet<PathBuf>) -> Result<Vec<Token>, TokenizationError> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.language.ts_language())
            .map_err(|e| TokenizationError::new(format!("failed to set language: {}", e)))?;

        let mut tokens = Vec::new();
        for file in files {
            let source = std::fs::read_to_string(file).map_err(|e| {
                TokenizationError::in_file(format!("cannot read {}: {}", file.display(), e), file)
            })?;
            self.tokenize_file(&mut parser, file, &source, &mut tokens)?;
        }
        Ok(tokens)
    }
}

fn node_token(name: &'static str, file: &Arc<Path>, node: Node<'_>) -> Token {
    let start = node.start_position();
    let end = node.end_position();
    let length = if start.row == end.row {
        (end.column - start.column) as u32
    } else {
        0
    };
    Token::new(
        TokenType::new(name),
        Arc::clone(file),
        start.row as u32 + 1,
        start.column as u32 + 1,
        length,
    )
}

/// First error or missing node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(tokenizer: &TreeSitterTokenizer, name: &str, source: &str) -> Vec<String> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tokenizer.language.ts_language())
            .unwrap();
        let mut tokens = Vec::new();
        tokenizer
            .tokenize_file(&mut parser, Path::new(name), source, &mut tokens)
            .unwrap();
        tokens.iter().map(|t| t.token_type.to_string()).collect()
    }

    #[test]
    fn test_python_function() {
        let types = types(
            &TreeSitterTokenizer::python(),
            "a.py",
            "def f(x):\n    y = x + 1\n    return y\n",
        );
        assert_eq!(types, vec!["DEF_BEGIN", "ASSIGN", "RETURN", "DEF_END", "<EOF>"]);
    }

    #[test]
    fn test_java_method() {
        let types = types(
            &TreeSitterTokenizer::java(),
            "Main.java",
            "class Main {\n  void run() {\n    int x = 1;\n    print(x);\n  }\n}\n",
        );
        assert_eq!(
            types,
            vec![
                "CLASS_BEGIN",
                "METHOD_BEGIN",
                "VARDEF",
                "APPLY",
                "METHOD_END",
                "CLASS_END",
                "<EOF>"
            ]
        );
    }

    #[test]
    fn test_renaming_does_not_change_stream() {
        let tokenizer = TreeSitterTokenizer::python();
        assert_eq!(
            types(&tokenizer, "a.py", "total = compute(a)\n"),
            types(&tokenizer, "b.py", "s = f(b)\n")
        );
    }

    #[test]
    fn test_syntax_error_reported() {
        let tokenizer = TreeSitterTokenizer::python();
        let mut parser = TSParser::new();
        parser
            .set_language(&tokenizer.language.ts_language())
            .unwrap();

        let err = tokenizer
            .tokenize_file(&mut parser, Path::new("bad.py"), "def f(:\n", &mut Vec::new())
            .unwrap_err();
        assert!(err.message.contains("syntax error"));
        assert_eq!(err.file, Some(PathBuf::from("bad.py")));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TreeSitterTokenizer::java().minimum_tile_length(), 9);
        assert_eq!(TreeSitterTokenizer::python().identifier(), "python");
        assert!(!TreeSitterTokenizer::python().supports_normalization());
    }
}
