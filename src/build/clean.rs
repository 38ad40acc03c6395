//! Build artifact cleanup.
//!
//! `cli clean` deletes the generated files latexmk leaves next to the
//! source (aux, log, pdf, xdv, fdb_latexmk, fls, out by default). The
//! sweep is non-recursive and safe to repeat; a second run simply finds
//! nothing to remove.

use crate::config::Config;
use crate::discover;
use crate::error::Error;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

/// Delete every direct child of `dir` whose extension is in the artifact
/// list. Returns how many files were removed; zero is not an error.
pub fn clean_folder(config: &Config, dir: &Path) -> Result<usize, Error> {
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir.to_path_buf()));
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_artifact = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| config.artifact_exts.iter().any(|a| a.as_str() == ext));
        if is_artifact {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    let label = dir
        .strip_prefix(&config.root)
        .unwrap_or(dir)
        .to_string_lossy();
    if removed > 0 {
        println!(
            "{} Removed {} artifact(s) from {}",
            "🗑️".red(),
            removed,
            label.bold()
        );
    } else {
        println!("{} Nothing to clean in {}", "!".yellow(), label.bold());
    }
    Ok(removed)
}

/// Clean every discovered folder, continuing past per-folder failures.
pub fn clean_all(config: &Config) -> Result<bool> {
    let folders = discover::discover(config).context("Folder discovery failed")?;
    if folders.is_empty() {
        println!("{} No buildable folders found.", "!".yellow());
        return Ok(true);
    }

    let mut total = 0;
    let mut all_ok = true;
    for folder in &folders {
        match clean_folder(config, folder) {
            Ok(n) => total += n,
            Err(e) => {
                println!("{} {}", "x".red(), e);
                all_ok = false;
            }
        }
    }

    if total > 0 {
        println!("{} Clean complete ({} file(s) removed).", "✓".green(), total);
    } else {
        println!("{} Nothing removed.", "!".yellow());
    }
    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(root: &Path) -> Config {
        Config::new(root.canonicalize().unwrap())
    }

    #[test]
    fn test_clean_removes_artifacts_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.tex"), "").unwrap();
        fs::write(dir.path().join("main.aux"), "").unwrap();
        fs::write(dir.path().join("main.pdf"), "").unwrap();
        fs::write(dir.path().join("main.fdb_latexmk"), "").unwrap();

        let config = config_for(dir.path());
        let removed = clean_folder(&config, &config.root).unwrap();

        assert_eq!(removed, 3);
        assert!(config.root.join("main.tex").exists());
        assert!(!config.root.join("main.aux").exists());
        assert!(!config.root.join("main.pdf").exists());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.log"), "").unwrap();

        let config = config_for(dir.path());
        assert_eq!(clean_folder(&config, &config.root).unwrap(), 1);
        assert_eq!(clean_folder(&config, &config.root).unwrap(), 0);
    }

    #[test]
    fn test_clean_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("figures");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("plot.pdf"), "").unwrap();

        let config = config_for(dir.path());
        assert_eq!(clean_folder(&config, &config.root).unwrap(), 0);
        assert!(nested.join("plot.pdf").exists());
    }

    #[test]
    fn test_clean_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let err = clean_folder(&config, &config.root.join("gone")).unwrap_err();
        assert!(matches!(err, Error::FolderNotFound(_)));
    }

    #[test]
    fn test_clean_honours_configured_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.bbl"), "").unwrap();

        let mut config = config_for(dir.path());
        assert_eq!(clean_folder(&config, &config.root.clone()).unwrap(), 0);

        config.artifact_exts.push("bbl".to_string());
        assert_eq!(clean_folder(&config, &config.root.clone()).unwrap(), 1);
    }
}
