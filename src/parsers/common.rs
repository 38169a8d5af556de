use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    /// Parse `source`, rejecting trees that contain syntax errors.
    ///
    /// tree-sitter recovers from errors by inserting `ERROR`/missing nodes, so a
    /// returned tree alone does not mean the input was valid.
    pub fn parse_source(&mut self, source: &str, file_path: &Path) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("Failed to parse file: {}", file_path.display()))?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error_position(&root)
                .map(|(row, column)| format!(" at line {}, column {}", row + 1, column + 1))
                .unwrap_or_default();
            anyhow::bail!("Syntax error in {}{}", file_path.display(), position);
        }
        Ok(tree)
    }

    /// Read a UTF-8 source file; the handle is released before returning.
    pub fn read_source(file_path: &Path) -> Result<String> {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let file_size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

        let mut reader = BufReader::with_capacity(file_size.clamp(1, 8192), file);
        let mut content = String::with_capacity(file_size);
        reader
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to read {} as UTF-8", file_path.display()))?;
        Ok(content)
    }
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn field_text<'a>(node: &TSNode, field: &str, source: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)
        .map(|child| extract_text(&child, source))
        .filter(|text| !text.is_empty())
}

fn first_error_position(root: &TSNode) -> Option<(usize, usize)> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let point = node.start_position();
            return Some((point.row, point.column));
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
