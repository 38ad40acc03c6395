//! Change-triggered rebuilds.
//!
//! Watching is a capability with interchangeable providers: the external
//! `inotifywait` and `fswatch` utilities (one changed path per stdout
//! line) and a native fallback built on the `notify` crate. Providers are
//! probed in that order at startup; the first available one wins.
//!
//! Events funnel through one filter (source extension, not under `.git`)
//! and trigger a sequential rebuild of the affected folder. Bursts of
//! saves are processed one event at a time; rapid duplicates are drained
//! where the provider's transport allows it, nothing more.

use super::core;
use crate::config::Config;
use crate::error::Error;
use anyhow::{Context, Result};
use colored::*;
use notify::{RecursiveMode, Watcher};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::channel;
use std::time::Duration;

/// A source of filesystem change events.
///
/// `watch` blocks until the event stream ends or the process is
/// interrupted, invoking the callback once per changed path.
pub trait WatchProvider {
    fn name(&self) -> &'static str;
    fn available(&self) -> bool;
    fn watch(&self, dirs: &[PathBuf], on_change: &mut dyn FnMut(&Path)) -> Result<()>;
}

/// `inotifywait -m` (inotify-tools, Linux).
pub struct Inotifywait;

/// `fswatch` (macOS / BSD).
pub struct Fswatch;

/// Native watcher built on the `notify` crate; always available.
pub struct NativeWatcher;

fn command_available(bin: &str) -> bool {
    Command::new(bin)
        .arg("--help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn an external watch utility and feed its stdout lines, one changed
/// path each, into the callback. Runs until the child exits.
fn watch_command_output(
    mut cmd: Command,
    bin: &str,
    on_change: &mut dyn FnMut(&Path),
) -> Result<()> {
    let mut child = cmd
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {}", bin))?;

    if let Some(stream) = child.stdout.take() {
        for line in BufReader::new(stream).lines().map_while(|l| l.ok()) {
            let line = line.trim();
            if !line.is_empty() {
                on_change(Path::new(line));
            }
        }
    }

    let _ = child.wait();
    Ok(())
}

impl WatchProvider for Inotifywait {
    fn name(&self) -> &'static str {
        "inotifywait"
    }

    fn available(&self) -> bool {
        command_available("inotifywait")
    }

    fn watch(&self, dirs: &[PathBuf], on_change: &mut dyn FnMut(&Path)) -> Result<()> {
        let mut cmd = Command::new("inotifywait");
        cmd.args(["-m", "-r", "-q", "-e", "close_write,moved_to,create"])
            .args(["--format", "%w%f"])
            .args(dirs);
        watch_command_output(cmd, "inotifywait", on_change)
    }
}

impl WatchProvider for Fswatch {
    fn name(&self) -> &'static str {
        "fswatch"
    }

    fn available(&self) -> bool {
        command_available("fswatch")
    }

    fn watch(&self, dirs: &[PathBuf], on_change: &mut dyn FnMut(&Path)) -> Result<()> {
        let mut cmd = Command::new("fswatch");
        cmd.arg("-r").args(dirs);
        watch_command_output(cmd, "fswatch", on_change)
    }
}

impl WatchProvider for NativeWatcher {
    fn name(&self) -> &'static str {
        "notify"
    }

    fn available(&self) -> bool {
        true
    }

    fn watch(&self, dirs: &[PathBuf], on_change: &mut dyn FnMut(&Path)) -> Result<()> {
        let (tx, rx) = channel();
        let notify_config =
            notify::Config::default().with_poll_interval(Duration::from_secs(1));
        let mut watcher = notify::RecommendedWatcher::new(tx, notify_config)
            .context("Failed to start native watcher")?;

        for dir in dirs {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
        }

        while let Ok(event) = rx.recv() {
            let mut paths = match event {
                Ok(ev) => ev.paths,
                Err(_) => continue,
            };
            // Drain immediately-queued duplicates from the same burst.
            while let Ok(Ok(ev)) = rx.try_recv() {
                paths.extend(ev.paths);
            }
            paths.sort();
            paths.dedup();
            for path in paths {
                on_change(&path);
            }
        }
        Ok(())
    }
}

/// Providers in probe order.
pub fn default_providers() -> Vec<Box<dyn WatchProvider>> {
    vec![Box::new(Inotifywait), Box::new(Fswatch), Box::new(NativeWatcher)]
}

/// Pick the first available provider, or fail before watching anything.
pub fn select_provider(
    providers: &[Box<dyn WatchProvider>],
) -> Result<&dyn WatchProvider, Error> {
    providers
        .iter()
        .find(|p| p.available())
        .map(|p| p.as_ref())
        .ok_or(Error::MissingWatchTool)
}

/// Whether a change event concerns a document source. Artifacts that the
/// container writes back (pdf, log, ...) must not retrigger the build.
fn relevant(config: &Config, path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == config.source_ext.as_str())
        && !path.components().any(|c| c.as_os_str() == ".git")
}

/// Build the given folders once, then rebuild the affected folder on
/// every source change. Runs until the process is interrupted.
pub fn watch(config: &Config, dirs: Vec<PathBuf>) -> Result<()> {
    for dir in &dirs {
        if let Err(e) = core::build_folder(config, dir) {
            println!("{} {}", "x".red(), e);
        }
    }

    let providers = default_providers();
    let provider = select_provider(&providers)?;
    println!(
        "{} Watching {} folder(s) via {}... (Ctrl-C to stop)",
        "👀".cyan(),
        dirs.len(),
        provider.name().bold()
    );

    let mut on_change = |path: &Path| {
        if !relevant(config, path) {
            return;
        }
        let Some(folder) = path.parent() else {
            return;
        };
        if !dirs.iter().any(|d| d == folder) {
            return;
        }
        println!("{} {} changed. Rebuilding...", "🔄".yellow(), path.display());
        if let Err(e) = core::build_folder(config, folder) {
            println!("{} {}", "x".red(), e);
        }
    };

    provider.watch(&dirs, &mut on_change)
}
