//! Buildable-folder discovery and target resolution.
//!
//! A buildable folder is any directory that directly contains a document
//! source file. Discovery is shallow (two levels below the root) and
//! re-runs on every invocation; nothing is persisted.

use crate::config::Config;
use crate::error::Error;
use anyhow::Result;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// What a `[path|all]` CLI argument resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Act on every discovered buildable folder.
    All,
    /// Act on one folder, already resolved and sandbox-checked.
    Folder(PathBuf),
}

/// Return the sorted, deduplicated set of directories under the root that
/// directly contain a source file, at most two levels deep. Zero matches
/// is not an error; callers decide whether that is fatal.
pub fn discover(config: &Config) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();

    let walker = WalkDir::new(&config.root)
        .min_depth(1)
        .max_depth(2)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|ext| ext == config.source_ext.as_str())
            && let Some(parent) = path.parent()
        {
            folders.push(parent.to_path_buf());
        }
    }

    folders.sort();
    folders.dedup();
    Ok(folders)
}

/// Resolve an optional `[path|all]` argument. `all` (or no argument) means
/// every buildable folder; anything else is resolved relative to the root
/// and rejected if it escapes the sandbox. The check runs before any
/// external process is spawned.
pub fn resolve_target(config: &Config, arg: Option<&str>) -> Result<Target, Error> {
    let raw = match arg {
        None | Some("all") => return Ok(Target::All),
        Some(raw) => raw,
    };

    let joined = if Path::new(raw).is_absolute() {
        PathBuf::from(raw)
    } else {
        config.root.join(raw)
    };

    // Canonicalize when possible so symlinks cannot dodge the check; fall
    // back to lexical normalization for paths that do not exist yet.
    let resolved = match joined.canonicalize() {
        Ok(canon) => canon,
        Err(_) => normalize(&joined),
    };

    if !resolved.starts_with(&config.root) {
        return Err(Error::OutsideRoot(resolved));
    }
    if !resolved.is_dir() {
        return Err(Error::FolderNotFound(resolved));
    }
    Ok(Target::Folder(resolved))
}

/// Lexical `..`/`.` resolution for paths that cannot be canonicalized.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(root: &Path) -> Config {
        Config::new(root.canonicalize().unwrap())
    }

    #[test]
    fn test_discover_sorted_and_under_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("b").join("main.tex"), "").unwrap();
        fs::write(dir.path().join("a").join("main.tex"), "").unwrap();

        let config = config_for(dir.path());
        let folders = discover(&config).unwrap();

        let expected: Vec<PathBuf> = vec![config.root.join("a"), config.root.join("b")];
        assert_eq!(folders, expected);
        assert!(folders.iter().all(|f| f.starts_with(&config.root)));
    }

    #[test]
    fn test_discover_dedupes_multi_source_folders() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join("main.tex"), "").unwrap();
        fs::write(dir.path().join("a").join("appendix.tex"), "").unwrap();

        let folders = discover(&config_for(dir.path())).unwrap();
        assert_eq!(folders.len(), 1);
    }

    #[test]
    fn test_discover_respects_depth_limit() {
        let dir = tempfile::tempdir().unwrap();
        let deep = dir.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("main.tex"), "").unwrap();

        let folders = discover(&config_for(dir.path())).unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn test_discover_skips_git_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("hook.tex"), "").unwrap();

        let folders = discover(&config_for(dir.path())).unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn test_discover_empty_root_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let folders = discover(&config_for(dir.path())).unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn test_resolve_all_token_and_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        assert_eq!(resolve_target(&config, None).unwrap(), Target::All);
        assert_eq!(resolve_target(&config, Some("all")).unwrap(), Target::All);
    }

    #[test]
    fn test_resolve_relative_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("thesis")).unwrap();
        let config = config_for(dir.path());

        match resolve_target(&config, Some("thesis")).unwrap() {
            Target::Folder(path) => assert_eq!(path, config.root.join("thesis")),
            other => panic!("unexpected target: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let err = resolve_target(&config, Some("../outside")).unwrap_err();
        assert!(matches!(err, Error::OutsideRoot(_)));

        let err = resolve_target(&config, Some("/")).unwrap_err();
        assert!(matches!(err, Error::OutsideRoot(_)));
    }

    #[test]
    fn test_resolve_missing_folder_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());

        let err = resolve_target(&config, Some("nope")).unwrap_err();
        assert!(matches!(err, Error::FolderNotFound(_)));
    }
}
