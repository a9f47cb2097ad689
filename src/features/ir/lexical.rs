//! L1 Lexical IR (§4.4)
//!
//! Walks the normalized AST (C3) and emits File/Module/Class/Function
//! nodes with spans, Contains/Defines edges, and import statement tokens.
//! Nothing here resolves an import to a concrete target — that's L9's
//! stub and, ultimately, C5's job.

use crate::features::parsing::{ParsedTree, SyntaxKind, SyntaxNode};
use crate::shared::models::{Edge, EdgeKind, IRDocument, Node, NodeKind, Occurrence};

/// One raw import statement, carried through to L9 unresolved.
#[derive(Debug, Clone)]
pub struct ImportToken {
    pub raw_text: String,
    pub span: crate::shared::models::Span,
}

pub struct LexicalBuilder;

impl LexicalBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds L1 for one file, returning the raw import tokens L9 needs.
    /// Failure semantics: a `ParsedTree` with only syntax errors still
    /// produces a `File` node — the builder degrades, it never aborts.
    pub fn run(&self, tree: &ParsedTree, doc: &mut IRDocument) -> Vec<ImportToken> {
        let file_fqn = tree.file_path.clone();
        let file_node = Node::new(
            NodeKind::File,
            file_fqn.clone(),
            tree.file_path.clone(),
            tree.file_path.clone(),
            tree.root.span,
        );
        let file_id = file_node.id.clone();
        doc.add_node(file_node);

        let module_name = module_name_from_path(&tree.file_path);
        let module_node = Node::new(
            NodeKind::Module,
            module_name.clone(),
            module_name,
            tree.file_path.clone(),
            tree.root.span,
        )
        .with_parent(file_id.clone());
        let module_id = module_node.id.clone();
        doc.add_node(module_node);
        doc.add_edge(Edge::new(file_id, module_id.clone(), EdgeKind::Contains));

        let mut imports = Vec::new();
        let mut scope = Scope {
            fqn_prefix: Vec::new(),
            parent_id: module_id,
        };
        self.walk(&tree.root, tree, doc, &mut scope, &mut imports);
        imports
    }

    fn walk(
        &self,
        node: &SyntaxNode,
        tree: &ParsedTree,
        doc: &mut IRDocument,
        scope: &mut Scope,
        imports: &mut Vec<ImportToken>,
    ) {
        match &node.kind {
            SyntaxKind::FunctionDef | SyntaxKind::MethodDef => {
                self.emit_definition(node, tree, doc, scope, imports, false);
                return;
            }
            SyntaxKind::ClassDef => {
                self.emit_definition(node, tree, doc, scope, imports, true);
                return;
            }
            SyntaxKind::ImportDecl => {
                imports.push(ImportToken {
                    raw_text: node.text().to_string(),
                    span: node.span,
                });
                return;
            }
            _ => {}
        }

        for child in &node.children {
            self.walk(child, tree, doc, scope, imports);
        }
    }

    fn emit_definition(
        &self,
        node: &SyntaxNode,
        tree: &ParsedTree,
        doc: &mut IRDocument,
        scope: &mut Scope,
        imports: &mut Vec<ImportToken>,
        is_class: bool,
    ) {
        let name = definition_name(node).unwrap_or_else(|| "<anonymous>".to_string());
        let fqn = if scope.fqn_prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", scope.fqn_prefix.join("."), name)
        };

        let kind = if is_class {
            NodeKind::Class
        } else if scope.fqn_prefix.iter().any(|s| is_class_scope(s)) {
            NodeKind::Method
        } else {
            NodeKind::Function
        };

        let def_node = Node::new(kind, fqn.clone(), name.clone(), tree.file_path.clone(), node.span)
            .with_parent(scope.parent_id.clone());
        let def_id = def_node.id.clone();
        doc.add_node(def_node.clone());
        doc.add_edge(Edge::new(
            scope.parent_id.clone(),
            def_id.clone(),
            EdgeKind::Defines,
        ));

        if let Some(occ) = Occurrence::definition_for(&def_node) {
            doc.occurrence_index.insert(occ);
        }

        let mut child_scope = Scope {
            fqn_prefix: {
                let mut prefix = scope.fqn_prefix.clone();
                prefix.push(name);
                prefix
            },
            parent_id: def_id,
        };

        for child in &node.children {
            self.walk(child, tree, doc, &mut child_scope, imports);
        }
    }
}

impl Default for LexicalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Scope {
    fqn_prefix: Vec<String>,
    parent_id: String,
}

fn is_class_scope(name: &str) -> bool {
    name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

fn definition_name(node: &SyntaxNode) -> Option<String> {
    node.find_child(&SyntaxKind::NameExpr)
        .map(|n| n.text().to_string())
        .filter(|s| !s.is_empty())
}

fn module_name_from_path(file_path: &str) -> String {
    let without_ext = file_path.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file_path);
    without_ext.replace(['/', '\\'], ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Span;

    fn leaf(kind: SyntaxKind, raw: &'static str, text: &str) -> SyntaxNode {
        SyntaxNode::new(kind, Span::zero(), raw).with_text(text)
    }

    #[test]
    fn module_name_strips_extension_and_slashes() {
        assert_eq!(module_name_from_path("pkg/sub/mod.py"), "pkg.sub.mod");
    }

    #[test]
    fn builds_file_and_module_nodes() {
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module");
        let tree = ParsedTree::new(
            root,
            String::new(),
            "a/b.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("a/b.py".to_string(), tree.language, "hash".to_string());
        LexicalBuilder::new().run(&tree, &mut doc);

        assert!(doc.nodes().any(|n| n.kind == NodeKind::File));
        assert!(doc.nodes().any(|n| n.kind == NodeKind::Module));
    }

    #[test]
    fn extracts_function_definition_with_defines_edge() {
        let func_name = leaf(SyntaxKind::NameExpr, "identifier", "hello");
        let func_node = SyntaxNode::new(SyntaxKind::FunctionDef, Span::new(1, 0, 2, 0), "function_definition")
            .with_children(vec![func_name]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![func_node]);

        let tree = ParsedTree::new(
            root,
            "def hello(): pass".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py".to_string(), tree.language, "hash".to_string());
        LexicalBuilder::new().run(&tree, &mut doc);

        let func = doc.nodes().find(|n| n.kind == NodeKind::Function).unwrap();
        assert_eq!(func.name, "hello");
        assert!(doc
            .edges()
            .any(|e| e.kind == EdgeKind::Defines && e.target_id == func.id));
    }

    #[test]
    fn nested_function_inside_class_is_a_method() {
        let class_name = leaf(SyntaxKind::NameExpr, "identifier", "Foo");
        let method_name = leaf(SyntaxKind::NameExpr, "identifier", "bar");
        let method = SyntaxNode::new(SyntaxKind::FunctionDef, Span::new(2, 0, 3, 0), "function_definition")
            .with_children(vec![method_name]);
        let class_node = SyntaxNode::new(SyntaxKind::ClassDef, Span::new(1, 0, 3, 0), "class_definition")
            .with_children(vec![class_name, method]);
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![class_node]);

        let tree = ParsedTree::new(
            root,
            "class Foo:\n    def bar(self): pass".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py".to_string(), tree.language, "hash".to_string());
        LexicalBuilder::new().run(&tree, &mut doc);

        let method_node = doc.nodes().find(|n| n.kind == NodeKind::Method).unwrap();
        assert_eq!(method_node.fqn, "Foo.bar");
    }

    #[test]
    fn import_statement_is_captured_as_a_token_not_resolved() {
        let import_node = SyntaxNode::new(SyntaxKind::ImportDecl, Span::new(1, 0, 1, 9), "import_statement")
            .with_text("import os");
        let root = SyntaxNode::new(SyntaxKind::Module, Span::zero(), "module")
            .with_children(vec![import_node]);
        let tree = ParsedTree::new(
            root,
            "import os".to_string(),
            "t.py".to_string(),
            crate::shared::ports::language::Language::Python,
            Vec::new(),
        );
        let mut doc = IRDocument::new("t.py".to_string(), tree.language, "hash".to_string());
        let imports = LexicalBuilder::new().run(&tree, &mut doc);

        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].raw_text, "import os");
        assert!(!doc.nodes().any(|n| n.kind == NodeKind::Import));
    }
}
