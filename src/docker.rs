//! Container runtime integration.
//!
//! Compilation never touches the host TeX installation: every build runs
//! `latexmk` inside a container whose image is produced by `cli init` from
//! the packaged build description below. The only contract with the
//! runtime is "mount a folder, run a command, report the exit status".

use crate::config::Config;
use anyhow::{Context, Result, bail};
use colored::*;
use std::fs;
use std::process::Command;

/// Packaged build description for the toolchain image.
const DOCKERFILE: &str = r#"FROM texlive/texlive:latest-minimal

RUN tlmgr update --self \
    && tlmgr install latexmk xetex fontspec \
    && tlmgr path add

WORKDIR /workdir
"#;

/// Whether the configured container runtime responds at all.
pub fn runtime_available(config: &Config) -> bool {
    Command::new(&config.runtime)
        .arg("--version")
        .output()
        .is_ok()
}

/// `cli init`: build the toolchain image from the packaged Dockerfile.
///
/// The Dockerfile is written to a throwaway build context so the project
/// tree is never shipped to the daemon.
pub fn init_image(config: &Config) -> Result<()> {
    if !runtime_available(config) {
        bail!(
            "Container runtime '{}' not found. Install Docker (or set 'runtime' in texcell.toml).",
            config.runtime
        );
    }

    println!(
        "{} Building toolchain image {}...",
        "🐳".blue(),
        config.image.bold()
    );

    let context_dir = tempfile::tempdir().context("Failed to create image build context")?;
    fs::write(context_dir.path().join("Dockerfile"), DOCKERFILE)
        .context("Failed to write packaged Dockerfile")?;

    let status = Command::new(&config.runtime)
        .arg("build")
        .arg("-t")
        .arg(&config.image)
        .arg(context_dir.path())
        .status()
        .with_context(|| format!("Failed to execute '{} build'", config.runtime))?;

    if !status.success() {
        bail!("Image build failed (see output above)");
    }

    println!("{} Image {} ready.", "✓".green(), config.image.bold());
    Ok(())
}

/// Compose the containerized compile invocation for one source file.
///
/// Kept in one place so the build loop and the tests agree on the exact
/// command line: mount the folder read-write at /workdir and run latexmk
/// against the given file name.
pub fn compile_command(config: &Config, dir: &std::path::Path, source_file: &str) -> Command {
    let mut cmd = Command::new(&config.runtime);
    cmd.arg("run")
        .arg("--rm")
        .arg("-v")
        .arg(format!("{}:/workdir", dir.display()))
        .arg("-w")
        .arg("/workdir")
        .arg(&config.image)
        .arg("latexmk")
        .arg("-xelatex")
        .arg("-interaction=nonstopmode")
        .arg(source_file);
    cmd
}
