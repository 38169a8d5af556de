use std::path::{Component, Path};

use super::config::PACKAGE_INITIALIZER;

/// Derive the dotted module identifier of `file_path` relative to `root`.
///
/// A package initializer names its directory (`pkg/sub/__init__.py` -> `sub`
/// under root `pkg`); any other file drops its extension. Returns `None` when
/// the file does not live under `root`.
pub fn module_name_from_path(root: &Path, file_path: &Path) -> Option<String> {
    let relative = file_path.strip_prefix(root).ok()?;

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let last = parts.pop()?;
    if last != PACKAGE_INITIALIZER {
        let stem = Path::new(&last)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        parts.push(stem.unwrap_or(last));
    }

    Some(
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// First dotted segment of a module or qualified name.
pub fn top_level_segment(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_module_and_package() {
        let root = Path::new("/work/pkg");
        assert_eq!(
            module_name_from_path(root, Path::new("/work/pkg/sub/mod.py")).as_deref(),
            Some("sub.mod")
        );
        assert_eq!(
            module_name_from_path(root, Path::new("/work/pkg/sub/__init__.py")).as_deref(),
            Some("sub")
        );
    }

    #[test]
    fn root_initializer_has_empty_name() {
        let root = Path::new("/work/pkg");
        assert_eq!(
            module_name_from_path(root, Path::new("/work/pkg/__init__.py")).as_deref(),
            Some("")
        );
    }

    #[test]
    fn outside_root_is_rejected() {
        assert!(module_name_from_path(Path::new("/a"), Path::new("/b/c.py")).is_none());
    }

    #[test]
    fn top_level_segment_splits_on_first_dot() {
        assert_eq!(top_level_segment("a.b.c"), "a");
        assert_eq!(top_level_segment("solo"), "solo");
        assert_eq!(top_level_segment(".foo"), "");
    }
}
