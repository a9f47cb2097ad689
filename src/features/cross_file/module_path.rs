//! Language-specific import-text parsing and module resolution (§4.5).
//!
//! Each language gets a raw-text extractor (pull the dotted module or
//! literal path out of an unparsed import statement) and a resolver (turn
//! that path into one of the file set's actual file paths, or `None` to
//! fall through to "external"). The closed set is exactly {python, java,
//! typescript, javascript} — every other language is always external.

use std::collections::HashSet;

use crate::shared::ports::language::Language;

pub fn extract_module_path(language: Language, raw_text: &str) -> Option<String> {
    match language {
        Language::Python => extract_python(raw_text),
        Language::Java => extract_java(raw_text),
        Language::TypeScript | Language::JavaScript => extract_js(raw_text),
        _ => None,
    }
}

pub fn resolve_module_path(
    language: Language,
    module_path: &str,
    importer_file: &str,
    known_files: &HashSet<String>,
) -> Option<String> {
    match language {
        Language::Python => resolve_python(module_path, known_files),
        Language::Java => resolve_java(module_path, known_files),
        Language::TypeScript | Language::JavaScript => resolve_js(module_path, importer_file, known_files),
        _ => None,
    }
}

fn extract_python(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix("from ") {
        return Some(rest.split(" import").next()?.trim().to_string());
    }
    if let Some(rest) = raw.strip_prefix("import ") {
        let first = rest.split(',').next()?.trim();
        return Some(first.split_whitespace().next()?.to_string());
    }
    None
}

fn extract_java(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches(';').trim();
    let rest = raw.strip_prefix("import ")?;
    let rest = rest.strip_prefix("static ").unwrap_or(rest).trim();
    Some(rest.to_string())
}

fn extract_js(raw: &str) -> Option<String> {
    let start = raw.find(['\'', '"'])?;
    let quote = raw.as_bytes()[start] as char;
    let rest = &raw[start + 1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}

/// `a.b.c` → `a/b/c.py` or `a/b/c/__init__.py`; lexicographically smaller
/// candidate wins a tie.
fn resolve_python(module_path: &str, known_files: &HashSet<String>) -> Option<String> {
    let as_path = module_path.replace('.', "/");
    let mut candidates = vec![format!("{as_path}.py"), format!("{as_path}/__init__.py")];
    candidates.sort();
    candidates.into_iter().find(|c| known_files.contains(c))
}

/// `x.y.Z` tried under {src/main/java, src, java} as `x/y/Z.java`.
fn resolve_java(module_path: &str, known_files: &HashSet<String>) -> Option<String> {
    let as_path = module_path.replace('.', "/");
    let mut candidates: Vec<String> = ["src/main/java", "src", "java"]
        .iter()
        .map(|prefix| format!("{prefix}/{as_path}.java"))
        .collect();
    candidates.sort();
    candidates.into_iter().find(|c| known_files.contains(c))
}

/// Bare specifiers (`react`) and scoped packages (`@scope/pkg`) are always
/// external. Relative paths try {.ts, .tsx, .js, .jsx} and `/index.<ext>`.
fn resolve_js(module_path: &str, importer_file: &str, known_files: &HashSet<String>) -> Option<String> {
    if !(module_path.starts_with("./") || module_path.starts_with("../") || module_path.starts_with('/')) {
        return None;
    }

    let base = normalize_relative(importer_file, module_path);
    let extensions = ["ts", "tsx", "js", "jsx"];
    let mut candidates: Vec<String> = extensions.iter().map(|ext| format!("{base}.{ext}")).collect();
    candidates.extend(extensions.iter().map(|ext| format!("{base}/index.{ext}")));
    candidates.sort();
    candidates.into_iter().find(|c| known_files.contains(c))
}

fn normalize_relative(importer_file: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = importer_file
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();
    for part in relative.split('/') {
        match part {
            "." | "" => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_from_import_extracts_the_module_not_the_names() {
        assert_eq!(extract_python("from pkg.sub import thing"), Some("pkg.sub".to_string()));
    }

    #[test]
    fn python_plain_import_drops_the_as_alias() {
        assert_eq!(extract_python("import pkg.sub as ps"), Some("pkg.sub".to_string()));
    }

    #[test]
    fn java_import_strips_semicolon_and_static() {
        assert_eq!(extract_java("import static com.foo.Bar;"), Some("com.foo.Bar".to_string()));
    }

    #[test]
    fn js_import_pulls_the_quoted_specifier() {
        assert_eq!(extract_js("import { b } from \"./b\""), Some("./b".to_string()));
    }

    #[test]
    fn python_prefers_the_py_file_over_the_package_init() {
        let mut known = HashSet::new();
        known.insert("pkg/b.py".to_string());
        known.insert("pkg/b/__init__.py".to_string());
        assert_eq!(resolve_python("pkg.b", &known), Some("pkg/b.py".to_string()));
    }

    #[test]
    fn js_bare_specifier_never_resolves() {
        let known = HashSet::new();
        assert_eq!(resolve_js("react", "src/a.ts", &known), None);
    }

    #[test]
    fn js_parent_relative_import_walks_up_from_the_importer_directory() {
        let mut known = HashSet::new();
        known.insert("src/lib/shared.ts".to_string());
        assert_eq!(resolve_js("../lib/shared", "src/a/a.ts", &known), Some("src/lib/shared.ts".to_string()));
    }
}
