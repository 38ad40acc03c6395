use crate::config::Config;
use crate::discover;
use crate::docker;
use crate::error::Error;
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Per-folder result of a batch build, collected so the loop can keep
/// going and report everything at the end instead of aborting on the
/// first failure.
pub struct BatchOutcome {
    pub folder: PathBuf,
    pub result: Result<bool, Error>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, Ok(true))
    }
}

/// Locate the document source inside `dir`. With several candidates the
/// lexicographically first wins, so repeated runs pick the same file.
pub fn find_source(config: &Config, dir: &Path) -> Result<PathBuf, Error> {
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir.to_path_buf()));
    }

    let mut sources: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .is_some_and(|ext| ext == config.source_ext.as_str())
        })
        .collect();
    sources.sort();

    sources
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoSourceFile(dir.to_path_buf()))
}

fn suppressed(config: &Config, line: &str) -> bool {
    config
        .suppress_patterns
        .iter()
        .any(|pattern| line.contains(pattern))
}

/// Compile one folder inside the container.
///
/// Returns `Ok(true)` iff latexmk exited 0. A failed compile is a normal
/// outcome (`Ok(false)`), not an error, so batch and watch loops keep
/// going. The source-file check runs before the runtime is spawned.
pub fn build_folder(config: &Config, dir: &Path) -> Result<bool> {
    let source = find_source(config, dir)?;
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let label = dir
        .strip_prefix(&config.root)
        .unwrap_or(dir)
        .to_string_lossy()
        .to_string();
    let label = if label.is_empty() { ".".to_string() } else { label };

    println!("{} Building {} ({})", "🔨".cyan(), label.bold(), file_name);

    let mut child = docker::compile_command(config, dir, &file_name)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn '{}'", config.runtime))?;

    // Stdout and stderr are drained concurrently through the same filter;
    // suppression hides display only, never the exit status.
    let stderr = child.stderr.take();
    let stderr_config = config.clone();
    let stderr_thread = std::thread::spawn(move || {
        if let Some(stream) = stderr {
            for line in BufReader::new(stream).lines().map_while(|l| l.ok()) {
                if !suppressed(&stderr_config, &line) {
                    eprintln!("   {}", line);
                }
            }
        }
    });

    if let Some(stream) = child.stdout.take() {
        for line in BufReader::new(stream).lines().map_while(|l| l.ok()) {
            if !suppressed(config, &line) {
                println!("   {}", line);
            }
        }
    }
    let _ = stderr_thread.join();

    let status = child
        .wait()
        .context("Failed to wait for the compile container")?;

    if status.success() {
        println!("{} Built {}", "✓".green(), label.bold());
        Ok(true)
    } else {
        println!("{} Build failed for {}", "x".red(), label.bold());
        Ok(false)
    }
}

/// Compile every discovered folder, collecting one outcome per folder and
/// summarizing at the end. Returns `Ok(true)` only when all folders built.
pub fn build_all(config: &Config) -> Result<bool> {
    let folders = discover::discover(config)?;
    if folders.is_empty() {
        println!("{} No buildable folders found.", "!".yellow());
        return Ok(true);
    }

    let mut outcomes = Vec::new();
    for folder in folders {
        let result = match build_folder(config, &folder) {
            Ok(ok) => Ok(ok),
            Err(e) => match e.downcast::<Error>() {
                Ok(domain) => {
                    println!("{} {}", "x".red(), domain);
                    Err(domain)
                }
                Err(other) => return Err(other),
            },
        };
        outcomes.push(BatchOutcome { folder, result });
    }

    print_summary(config, &outcomes);
    Ok(outcomes.iter().all(BatchOutcome::succeeded))
}

fn print_summary(config: &Config, outcomes: &[BatchOutcome]) {
    let mut table = ui::Table::new(&["Folder", "Status"]);
    for outcome in outcomes {
        let label = outcome
            .folder
            .strip_prefix(&config.root)
            .unwrap_or(&outcome.folder)
            .to_string_lossy()
            .to_string();
        let status = match &outcome.result {
            Ok(true) => "✓ ok".green().to_string(),
            Ok(false) => "x failed".red().to_string(),
            Err(e) => format!("x {}", e).red().to_string(),
        };
        table.add_row(vec![label, status]);
    }
    table.print();

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed == 0 {
        println!("{} All {} folder(s) built.", "✓".green(), outcomes.len());
    } else {
        println!(
            "{} {} of {} folder(s) failed.",
            "x".red(),
            failed,
            outcomes.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_for(root: &Path) -> Config {
        Config::new(root.canonicalize().unwrap())
    }

    #[test]
    fn test_find_source_picks_lexicographically_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zeta.tex"), "").unwrap();
        fs::write(dir.path().join("alpha.tex"), "").unwrap();

        let config = config_for(dir.path());
        let source = find_source(&config, &config.root).unwrap();
        assert_eq!(source.file_name().unwrap(), "alpha.tex");
    }

    #[test]
    fn test_find_source_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.aux"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let config = config_for(dir.path());
        let err = find_source(&config, &config.root).unwrap_err();
        assert!(matches!(err, Error::NoSourceFile(_)));
    }

    #[test]
    fn test_find_source_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let err = find_source(&config, &config.root.join("gone")).unwrap_err();
        assert!(matches!(err, Error::FolderNotFound(_)));
    }

    #[test]
    fn test_build_without_source_never_spawns_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path());
        // A runtime that cannot exist; build must fail before reaching it.
        config.runtime = "/nonexistent/texcell-runtime".to_string();

        let err = build_folder(&config, &config.root).unwrap_err();
        let domain = err.downcast::<Error>().unwrap();
        assert!(matches!(domain, Error::NoSourceFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_success_mirrors_child_exit_status() {
        // Substitute plain `true`/`false` binaries for the runtime; the
        // extra docker-style arguments are ignored by both.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.tex"), "\\documentclass{article}").unwrap();

        let mut config = config_for(dir.path());
        config.runtime = "true".to_string();
        assert!(build_folder(&config, &config.root.clone()).unwrap());

        config.runtime = "false".to_string();
        assert!(!build_folder(&config, &config.root.clone()).unwrap());
    }

    #[test]
    fn test_suppression_is_substring_based() {
        let mut config = Config::new(PathBuf::from("/proj"));
        config.suppress_patterns = vec!["known-benign".to_string()];

        assert!(suppressed(&config, "warning: known-benign glyph issue"));
        assert!(!suppressed(&config, "error: something real"));
    }

    #[test]
    fn test_suppression_with_empty_filter_list() {
        let mut config = Config::new(PathBuf::from("/proj"));
        config.suppress_patterns.clear();
        assert!(!suppressed(&config, "anything at all"));
    }
}
