use code_graph::core::{AnalysisConfig, CodebaseAnalyzer};
use code_graph::formatters::JsonCompactFormatter;
use serde_json::Value;
use std::fs;

#[test]
fn json_summary_lists_both_graphs_and_cycles() {
    let dir = tempfile::TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.py"), "import b\n\ndef foo():\n    return helper()\n").unwrap();
    fs::write(src.join("b.py"), "import a\n\ndef helper():\n    return 1\n").unwrap();
    fs::write(src.join("c.py"), "def bad(:\n").unwrap();

    let analysis = CodebaseAnalyzer::new(AnalysisConfig::new(&src))
        .unwrap()
        .analyze();

    let out = dir.path().join("out/graphs.json");
    JsonCompactFormatter::new()
        .format_to_file(&analysis, &out)
        .unwrap();
    let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();

    assert_eq!(value["modules"]["nodes"], serde_json::json!(["a", "b"]));
    assert_eq!(
        value["modules"]["edges"],
        serde_json::json!([["a", "b"], ["b", "a"]])
    );
    assert_eq!(
        value["calls"]["edges"],
        serde_json::json!([["a.foo", "b.helper"]])
    );
    assert_eq!(value["import_cycles"], serde_json::json!([["a", "b"]]));
    assert_eq!(value["skipped"].as_array().unwrap().len(), 1);

    let compact = JsonCompactFormatter::new()
        .compact()
        .format_analysis(&analysis)
        .unwrap();
    assert!(!compact.contains('\n'));
}
