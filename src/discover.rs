/// Recursive file discovery under a category or plot root.
use std::path::{Path, PathBuf};

/// Collect every regular file under `root` (at any depth) whose name matches
/// the glob `name_pattern`, sorted by path so repeated runs see the same order.
///
/// Unreadable entries are logged and skipped. A missing root yields nothing.
pub fn find_files(root: &Path, name_pattern: &str) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/{}", base.trim_end_matches('/'), name_pattern);

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::warn!(error = %e, pattern = %pattern, "invalid discovery pattern");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}

/// Strip `.{extension}` from a file name, returning the base name.
///
/// Names that are nothing but the extension (e.g. `.time`) have no base name.
pub fn base_name<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|base| !base.is_empty())
}
