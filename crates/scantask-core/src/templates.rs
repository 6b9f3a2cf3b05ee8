use crate::error::TaskError;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Extensions the scanner understands.
const SUPPORTED_EXTENSIONS: &[&str] = &["tf", "json", "yaml", "yml", "template"];

/// Recursively find likely IaC template files under `root`.
///
/// Generic JSON/YAML files are filtered out with a naming heuristic so a
/// repository full of package manifests does not get shipped to the scanner.
pub fn find_templates(root: &Path) -> Result<Vec<PathBuf>, TaskError> {
    if !root.is_dir() {
        return Err(TaskError::PathNotFound(root.to_path_buf()));
    }

    let name_hint = Regex::new(r"(?i)(main|infra|template|cloudformation|terraform|cdk|stack)")
        .expect("valid regex");

    // Escape the root so a directory name carrying glob metacharacters
    // (brackets, stars) is matched literally.
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.display().to_string())
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name_hint.is_match(name))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    Ok(files)
}
