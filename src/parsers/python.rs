use anyhow::Result;
use log::debug;
use std::collections::BTreeSet;
use std::path::Path;
use tree_sitter::{Node as TSNode, Tree};

use super::common::{extract_text, field_text, TreeSitterParser};
use super::{FunctionRecord, LanguageParser, ModuleInfo};

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Fail early if the grammar and the runtime disagree on ABI version.
        TreeSitterParser::new(tree_sitter_python::language())?;
        Ok(Self)
    }

    /// Extract imports and functions from an already parsed tree.
    pub fn extract(tree: &Tree, source: &str, file_path: &Path, module: &str) -> ModuleInfo {
        let mut walker = ScopeWalker::new(module, file_path, source.as_bytes());
        walker.walk(tree.root_node());
        ModuleInfo {
            module: module.to_string(),
            path: file_path.to_path_buf(),
            imports: walker.imports,
            functions: walker.functions,
        }
    }
}

impl LanguageParser for PythonParser {
    fn parse_file(&self, file_path: &Path, module: &str) -> Result<ModuleInfo> {
        let source = TreeSitterParser::read_source(file_path)?;
        // Parsers are not Sync; each call (and so each rayon worker) builds its own.
        let mut parser = TreeSitterParser::new(tree_sitter_python::language())?;
        let tree = parser.parse_source(&source, file_path)?;

        let info = Self::extract(&tree, &source, file_path, module);
        debug!(
            "{}: {} imports, {} functions",
            module,
            info.imports.len(),
            info.functions.len()
        );
        Ok(info)
    }

    fn language_name(&self) -> &str {
        "python"
    }
}

/// Bookkeeping for one open `def` or `class` scope.
struct Frame {
    node_id: usize,
    /// Function that was current before this scope was entered.
    previous: Option<usize>,
}

/// Depth-first walk over the syntax tree with an explicit scope stack.
struct ScopeWalker<'a> {
    module: &'a str,
    file_path: &'a Path,
    source: &'a [u8],
    scopes: Vec<String>,
    frames: Vec<Frame>,
    current: Option<usize>,
    /// `function_definition` already opened by its `decorated_definition`.
    opened_definition: Option<usize>,
    functions: Vec<FunctionRecord>,
    imports: BTreeSet<String>,
}

impl<'a> ScopeWalker<'a> {
    fn new(module: &'a str, file_path: &'a Path, source: &'a [u8]) -> Self {
        Self {
            module,
            file_path,
            source,
            scopes: Vec::new(),
            frames: Vec::new(),
            current: None,
            opened_definition: None,
            functions: Vec::new(),
            imports: BTreeSet::new(),
        }
    }

    fn walk(&mut self, root: TSNode) {
        let mut cursor = root.walk();
        loop {
            self.enter(cursor.node());
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                self.exit(cursor.node());
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    fn enter(&mut self, node: TSNode) {
        match node.kind() {
            "decorated_definition" => self.enter_decorated(node),
            "function_definition" => {
                if self.opened_definition == Some(node.id()) {
                    self.opened_definition = None;
                } else {
                    self.enter_function(node, node);
                }
            }
            "class_definition" => {
                if let Some(name) = field_text(&node, "name", self.source) {
                    self.push_scope(node, name.to_string());
                }
            }
            "call" => self.record_call(node),
            "import_statement" => self.record_import(node),
            "import_from_statement" => self.record_import_from(node),
            "future_import_statement" => {
                self.imports.insert("__future__".to_string());
            }
            _ => {}
        }
    }

    fn exit(&mut self, node: TSNode) {
        if self.frames.last().map(|frame| frame.node_id) == Some(node.id()) {
            if let Some(frame) = self.frames.pop() {
                self.scopes.pop();
                self.current = frame.previous;
            }
        }
    }

    fn push_scope(&mut self, node: TSNode, name: String) {
        self.frames.push(Frame {
            node_id: node.id(),
            previous: self.current,
        });
        self.scopes.push(name);
    }

    /// Decorators of a function are calls made on behalf of that function, so
    /// its frame spans the whole `decorated_definition`. Class decorators stay
    /// with the enclosing scope.
    fn enter_decorated(&mut self, node: TSNode) {
        let Some(definition) = node.child_by_field_name("definition") else {
            return;
        };
        if definition.kind() == "function_definition" && self.enter_function(node, definition) {
            self.opened_definition = Some(definition.id());
        }
    }

    /// Open a function frame on `frame_node` for `definition`; false if unnamed.
    fn enter_function(&mut self, frame_node: TSNode, definition: TSNode) -> bool {
        let Some(name) = field_text(&definition, "name", self.source) else {
            return false;
        };
        let name = name.to_string();
        self.push_scope(frame_node, name.clone());

        let qualname = format!("{}.{}", self.module, self.scopes.join("."));
        self.functions.push(FunctionRecord::new(
            name,
            qualname,
            self.file_path.to_path_buf(),
            definition.start_position().row + 1,
        ));
        self.current = Some(self.functions.len() - 1);
        true
    }

    fn record_call(&mut self, node: TSNode) {
        let Some(index) = self.current else {
            return;
        };
        let Some(callee) = node.child_by_field_name("function") else {
            return;
        };

        let name = match callee.kind() {
            "identifier" => Some(extract_text(&callee, self.source)),
            "attribute" => field_text(&callee, "attribute", self.source),
            _ => None,
        };
        if let Some(name) = name.filter(|name| !name.is_empty()) {
            self.functions[index].calls.insert(name.to_string());
        }
    }

    /// `import a.b, c as d` records `a` and `c`.
    fn record_import(&mut self, node: TSNode) {
        let mut cursor = node.walk();
        let names: Vec<TSNode> = node.children_by_field_name("name", &mut cursor).collect();
        for name in names {
            let dotted = match name.kind() {
                "aliased_import" => name.child_by_field_name("name"),
                _ => Some(name),
            };
            if let Some(dotted) = dotted {
                self.insert_top_level(dotted);
            }
        }
    }

    /// `from a.b import x` records `a`; `from .pkg import x` records `pkg`.
    fn record_import_from(&mut self, node: TSNode) {
        let Some(module) = node.child_by_field_name("module_name") else {
            return;
        };
        match module.kind() {
            "dotted_name" => self.insert_top_level(module),
            "relative_import" => {
                let mut cursor = module.walk();
                let dotted = module
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "dotted_name");
                if let Some(dotted) = dotted {
                    self.insert_top_level(dotted);
                }
            }
            _ => {}
        }
    }

    fn insert_top_level(&mut self, dotted: TSNode) {
        let head = match dotted.kind() {
            "dotted_name" => dotted.named_child(0).unwrap_or(dotted),
            _ => dotted,
        };
        let text = extract_text(&head, self.source).trim();
        if !text.is_empty() {
            self.imports.insert(text.to_string());
        }
    }
}
