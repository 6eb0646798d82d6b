//! Line-annotated token printer
//!
//! ```text
//! === Main.java ===
//!    1 | class Main {
//!      | |CLASS_BEGIN
//!    2 |     int x = 1;
//!      |     |VARDEF
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::shared::models::Token;
use crate::shared::ports::TokenPrinter;

#[derive(Debug, Clone, Copy, Default)]
pub struct LineAnnotatedPrinter;

impl LineAnnotatedPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl TokenPrinter for LineAnnotatedPrinter {
    fn print(&self, tokens: &[Token], root: &Path) -> String {
        let mut output = String::new();
        for (file, file_tokens) in group_by_file(tokens) {
            let path = resolve(file, root);
            output.push_str(&format!("=== {} ===\n", file.display()));

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    output.push_str(&format!("(unreadable: {})\n", e));
                    continue;
                }
            };

            let mut by_line: BTreeMap<u32, Vec<&Token>> = BTreeMap::new();
            for token in file_tokens {
                by_line.entry(token.line).or_default().push(token);
            }

            let lines: Vec<&str> = source.lines().collect();
            let last_line = by_line
                .keys()
                .next_back()
                .copied()
                .unwrap_or(0)
                .max(lines.len() as u32);

            for number in 1..=last_line {
                let text = lines.get(number as usize - 1).copied().unwrap_or("");
                output.push_str(&format!("{:>4} | {}\n", number, text));
                if let Some(line_tokens) = by_line.get_mut(&number) {
                    output.push_str(&format!("     | {}\n", marker_line(line_tokens)));
                }
            }
        }
        output
    }
}

/// Tokens per file in order of first appearance, file ends and synthetic tokens dropped
fn group_by_file(tokens: &[Token]) -> Vec<(&Path, Vec<&Token>)> {
    let mut groups: Vec<(&Path, Vec<&Token>)> = Vec::new();
    for token in tokens.iter().filter(|t| !t.is_file_end() && t.line > 0) {
        match groups.iter_mut().find(|(file, _)| *file == &*token.file) {
            Some((_, group)) => group.push(token),
            None => groups.push((&*token.file, vec![token])),
        }
    }
    groups
}

/// `|TYPE` at each token's column; tokens sharing a column are laid out one after another
fn marker_line(tokens: &mut [&Token]) -> String {
    tokens.sort_by_key(|t| t.column);
    let mut line = String::new();
    for token in tokens.iter() {
        let target = token.column.saturating_sub(1) as usize;
        let width = line.chars().count();
        if width < target {
            line.push_str(&" ".repeat(target - width));
        } else if width > 0 {
            line.push(' ');
        }
        line.push('|');
        line.push_str(token.token_type.name());
    }
    line
}

/// Path a token file resolves to when printed relative to `root`
pub fn resolve(file: &Path, root: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::TokenType;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_marks_token_columns() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Main.java"), "class Main {\n    int x = 1;\n}\n").unwrap();

        let file: Arc<Path> = Arc::from(Path::new("Main.java"));
        let tokens = vec![
            Token::new(TokenType::new("CLASS_BEGIN"), Arc::clone(&file), 1, 1, 5),
            Token::new(TokenType::new("VARDEF"), Arc::clone(&file), 2, 5, 3),
            Token::new(TokenType::new("CLASS_END"), Arc::clone(&file), 3, 1, 1),
            Token::file_end(file),
        ];

        let printed = LineAnnotatedPrinter::new().print(&tokens, dir.path());
        assert_eq!(
            printed,
            "=== Main.java ===\n\
             \x20  1 | class Main {\n\
             \x20    | |CLASS_BEGIN\n\
             \x20  2 |     int x = 1;\n\
             \x20    |     |VARDEF\n\
             \x20  3 | }\n\
             \x20    | |CLASS_END\n"
        );
    }

    #[test]
    fn test_unreadable_file_noted() {
        let dir = TempDir::new().unwrap();
        let tokens = vec![Token::new(
            TokenType::new("APPLY"),
            Arc::from(Path::new("missing.py")),
            1,
            1,
            1,
        )];

        let printed = LineAnnotatedPrinter::new().print(&tokens, dir.path());
        assert!(printed.starts_with("=== missing.py ===\n(unreadable:"));
    }

    #[test]
    fn test_same_column_tokens_separated() {
        let file: Arc<Path> = Arc::from(Path::new("a.py"));
        let a = Token::new(TokenType::new("A"), Arc::clone(&file), 1, 3, 1);
        let b = Token::new(TokenType::new("B"), file, 1, 3, 1);
        assert_eq!(marker_line(&mut [&a, &b]), "  |A |B");
    }

    #[test]
    fn test_resolve_relative_to_root() {
        assert_eq!(
            resolve(Path::new("a.py"), Path::new("/sub")),
            PathBuf::from("/sub/a.py")
        );
        assert_eq!(
            resolve(Path::new("/abs/a.py"), Path::new("/sub")),
            PathBuf::from("/abs/a.py")
        );
    }
}
