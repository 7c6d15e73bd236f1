//! Import resolution: raw import string to a file on disk.
//!
//! Fixed-priority candidate list, first existing regular file wins. When several
//! candidates exist (`root/x.py` and `root/src/x.py`) the earlier one is chosen
//! even if it is the wrong one; there is no ranking.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::parser::Language;

const RELATIVE_EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx", ".py"];
const MODULE_ROOT_DIRS: &[&str] = &["src", "lib", "app"];
const MODULE_ROOT_EXTENSIONS: &[&str] = &[".js", ".ts", ".py"];

/// Resolve `import` (as written in `from_file`) to an absolute, lexically
/// normalized file path, or `None` if no candidate exists.
pub fn resolve_import_path(from_file: &Path, import: &str, project_root: &Path) -> Option<PathBuf> {
    candidates(from_file, import, project_root)
        .into_iter()
        .find(|candidate| candidate.is_file())
        .map(|found| absolutize(&found))
}

/// The ordered candidate list tried by [`resolve_import_path`].
pub fn candidates(from_file: &Path, import: &str, project_root: &Path) -> Vec<PathBuf> {
    let from_dir = from_file.parent().unwrap_or_else(|| Path::new(""));

    if import.starts_with('.') {
        let base = from_dir.join(import);
        let mut out = vec![base.clone()];
        out.extend(RELATIVE_EXTENSIONS.iter().map(|ext| with_suffix(&base, ext)));
        out.push(base.join("index.js"));
        out.push(base.join("index.ts"));
        out.push(base.join("__init__.py"));
        return out;
    }

    // Same directory first: sibling Python modules are the common case.
    let mut out = vec![
        with_suffix(&from_dir.join(import), ".py"),
        from_dir.join(import).join("__init__.py"),
        project_root.join(import),
    ];
    out.extend(MODULE_ROOT_DIRS.iter().map(|dir| project_root.join(dir).join(import)));
    out.extend(
        MODULE_ROOT_EXTENSIONS
            .iter()
            .map(|ext| with_suffix(&project_root.join(import), ext)),
    );
    out.push(project_root.join("node_modules").join(import));

    if Language::from_path(from_file) == Language::Python {
        let module_path: PathBuf = import.split('.').collect();
        let src = project_root.join("src");
        out.push(with_suffix(&project_root.join(&module_path), ".py"));
        out.push(project_root.join(&module_path).join("__init__.py"));
        out.push(with_suffix(&src.join(&module_path), ".py"));
        out.push(src.join(&module_path).join("__init__.py"));
    }

    out
}

/// Append a literal suffix to the last path component (`a/b` + `.py` = `a/b.py`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Make a path absolute (against the current directory) and drop `.`/`..`
/// components without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize_lexically(&joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
