use std::collections::{BTreeMap, BTreeSet};

use super::module_name::top_level_segment;
use crate::parsers::ModuleInfo;

/// Name-based call resolver: maps a simple function name to every qualified
/// name that shares it, across all modules.
///
/// There is no knowledge of scope, shadowing, types or imports. Two unrelated
/// functions with the same simple name are both candidates for a call.
#[derive(Debug, Clone, Default)]
pub struct FunctionResolver {
    function_index: BTreeMap<String, BTreeSet<String>>,
}

/// A call from `caller` that resolved to a function in another top-level module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedCall {
    pub caller: String,
    pub callee: String,
}

impl FunctionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_indexes<'a, I>(&mut self, modules: I)
    where
        I: IntoIterator<Item = &'a ModuleInfo>,
    {
        self.function_index.clear();
        for info in modules {
            for function in &info.functions {
                self.function_index
                    .entry(function.name.clone())
                    .or_default()
                    .insert(function.qualname.clone());
            }
        }
    }

    pub fn candidates(&self, call_name: &str) -> impl Iterator<Item = &str> {
        self.function_index
            .get(call_name)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Resolve every call of every function in `info` to the candidates that
    /// live outside the caller's top-level module.
    pub fn resolve_calls(&self, info: &ModuleInfo) -> Vec<ResolvedCall> {
        let caller_top = top_level_segment(&info.module);
        let mut resolved = Vec::new();

        for function in &info.functions {
            for call_name in &function.calls {
                for target in self.candidates(call_name) {
                    if top_level_segment(target) != caller_top {
                        resolved.push(ResolvedCall {
                            caller: function.qualname.clone(),
                            callee: target.to_string(),
                        });
                    }
                }
            }
        }

        resolved
    }

    pub fn indexed_names(&self) -> usize {
        self.function_index.len()
    }
}
