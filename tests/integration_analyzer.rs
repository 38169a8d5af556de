use code_graph::core::{AnalysisConfig, CodebaseAnalyzer};
use std::fs;
use std::path::Path;

fn write<P: AsRef<Path>>(path: P, contents: &str) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn pairs(edges: &std::collections::BTreeSet<(String, String)>) -> Vec<(&str, &str)> {
    edges.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect()
}

fn analyzer(root: &Path) -> CodebaseAnalyzer {
    CodebaseAnalyzer::new(AnalysisConfig::new(root)).unwrap()
}

#[test]
fn analyzer_end_to_end_on_two_modules() {
    let dir = tempfile::TempDir::new().unwrap();
    write(dir.path().join("a.py"), "import b\n\ndef foo():\n    return helper()\n");
    write(dir.path().join("b.py"), "def helper():\n    return 1\n");

    let analysis = analyzer(dir.path()).analyze();

    let modules: Vec<_> = analysis.module_graph.nodes.iter().map(String::as_str).collect();
    assert_eq!(modules, vec!["a", "b"]);
    assert_eq!(pairs(&analysis.module_graph.edges), vec![("a", "b")]);

    let functions: Vec<_> = analysis.call_graph.nodes.iter().map(String::as_str).collect();
    assert_eq!(functions, vec!["a.foo", "b.helper"]);
    assert_eq!(pairs(&analysis.call_graph.edges), vec![("a.foo", "b.helper")]);
    assert!(analysis.skipped.is_empty());
}

#[test]
fn packages_are_named_after_their_directories() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root.join("sub/__init__.py"), "from sub.mod import run\n");
    write(root.join("sub/mod.py"), "def run():\n    pass\n");
    write(root.join("app.py"), "import sub\n\ndef main():\n    sub.run()\n");

    let analysis = analyzer(root).analyze();

    let modules: Vec<_> = analysis.modules.keys().map(String::as_str).collect();
    assert_eq!(modules, vec!["app", "sub", "sub.mod"]);
    assert_eq!(pairs(&analysis.module_graph.edges), vec![("app", "sub")]);
    assert_eq!(pairs(&analysis.call_graph.edges), vec![("app.main", "sub.mod.run")]);
}

#[test]
fn invalid_files_do_not_disturb_other_results() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root.join("a.py"), "import b\n\ndef foo():\n    return helper()\n");
    write(root.join("b.py"), "def helper():\n    return 1\n");
    let baseline = analyzer(root).analyze();

    write(root.join("broken.py"), "import a\ndef oops(:\n");
    let with_broken = analyzer(root).analyze();

    assert_eq!(with_broken.module_graph, baseline.module_graph);
    assert_eq!(with_broken.call_graph, baseline.call_graph);
    assert_eq!(with_broken.skipped.len(), 1);
    assert!(with_broken.skipped[0].ends_with("broken.py"));
}

#[test]
fn excluded_directories_never_produce_nodes() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(root.join("a.py"), "def foo():\n    helper()\n");
    write(root.join("build/b.py"), "def helper():\n    pass\n");
    write(root.join("node_modules/c.py"), "def helper():\n    pass\n");

    let analysis = analyzer(root).analyze();
    let modules: Vec<_> = analysis.module_graph.nodes.iter().map(String::as_str).collect();
    assert_eq!(modules, vec!["a"]);
    assert!(analysis.call_graph.is_empty());
}

#[test]
fn reruns_are_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    for i in 0..8 {
        write(
            root.join(format!("m{}.py", i)),
            &format!(
                "import m{next}\n\ndef f{i}():\n    return f{next}() + shared()\n\ndef shared():\n    pass\n",
                i = i,
                next = (i + 1) % 8
            ),
        );
    }

    let first = analyzer(root).analyze();
    let second = analyzer(root).analyze();
    assert_eq!(first.module_graph, second.module_graph);
    assert_eq!(first.call_graph, second.call_graph);
    assert_eq!(first.module_graph.edge_count(), 8);
    assert_eq!(first.module_graph.cycles().len(), 1);
    // Each f_i reaches f_{i+1} and the seven foreign `shared` functions.
    assert_eq!(first.call_graph.edge_count(), 8 * 8);
}

#[test]
fn empty_and_missing_roots_give_empty_graphs() {
    let dir = tempfile::TempDir::new().unwrap();
    let empty = analyzer(dir.path()).analyze();
    assert!(empty.module_graph.is_empty());
    assert!(empty.call_graph.is_empty());

    let missing = analyzer(&dir.path().join("missing")).analyze();
    assert!(missing.root.is_none());
    assert!(missing.module_graph.is_empty());
}

#[test]
fn decorator_calls_link_the_decorated_function() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    write(
        root.join("app.py"),
        "from web import route\n\n@route('/')\ndef index():\n    return 1\n",
    );
    write(root.join("web.py"), "def route(path):\n    return path\n");

    let analysis = analyzer(root).analyze();

    let index = &analysis.modules["app"].functions[0];
    assert_eq!(index.qualname, "app.index");
    assert!(index.calls.contains("route"));
    assert!(analysis.call_graph.contains_edge("app.index", "web.route"));
    assert_eq!(pairs(&analysis.module_graph.edges), vec![("app", "web")]);
}
