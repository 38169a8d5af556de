use code_graph::core::resolver::{FunctionResolver, ResolvedCall};
use code_graph::parsers::{FunctionRecord, ModuleInfo};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn info(module: &str, functions: Vec<FunctionRecord>) -> ModuleInfo {
    ModuleInfo {
        module: module.to_string(),
        path: PathBuf::from(format!("/tmp/{}.py", module)),
        imports: BTreeSet::new(),
        functions,
    }
}

fn func(module: &str, name: &str, calls: &[&str]) -> FunctionRecord {
    let mut record = FunctionRecord::new(
        name.to_string(),
        format!("{}.{}", module, name),
        PathBuf::from(format!("/tmp/{}.py", module)),
        1,
    );
    record.calls = calls.iter().map(|c| c.to_string()).collect();
    record
}

#[test]
fn resolver_indexes_every_qualified_name_per_simple_name() {
    let modules = vec![
        info("x", vec![func("x", "load", &[])]),
        info("y", vec![func("y", "load", &[]), func("y", "dump", &[])]),
    ];

    let mut resolver = FunctionResolver::new();
    resolver.build_indexes(&modules);

    assert_eq!(resolver.indexed_names(), 2);
    assert_eq!(
        resolver.candidates("load").collect::<Vec<_>>(),
        vec!["x.load", "y.load"]
    );
    assert_eq!(resolver.candidates("missing").count(), 0);
}

#[test]
fn resolver_drops_same_top_level_targets() {
    let modules = vec![
        info("pkg.a", vec![func("pkg.a", "main", &["load", "print"])]),
        info("pkg.b", vec![func("pkg.b", "load", &[])]),
        info("other", vec![func("other", "load", &[])]),
    ];

    let mut resolver = FunctionResolver::new();
    resolver.build_indexes(&modules);

    let calls = resolver.resolve_calls(&modules[0]);
    assert_eq!(
        calls,
        vec![ResolvedCall {
            caller: "pkg.a.main".to_string(),
            callee: "other.load".to_string(),
        }]
    );
}
