//! # texcell CLI Entry Point
//!
//! The `cli` binary routes subcommands to the library:
//!
//! - `init` - build the containerized LaTeX toolchain image
//! - `build [path|all]` - compile one or all buildable folders
//! - `watch [path|all]` - build, then rebuild on source changes
//! - `clean [path|all]` - delete generated artifacts
//!
//! Exit code is 0 on success and 1 on any validation failure, missing
//! dependency, failed folder, or unknown command.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;

use texcell::build;
use texcell::config::Config;
use texcell::discover::{self, Target};
use texcell::docker;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Containerized LaTeX build orchestrator", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the LaTeX toolchain image from the packaged Dockerfile
    Init,
    /// Compile one or all buildable folders
    Build {
        /// Folder to build, or "all" (default: all)
        target: Option<String>,
    },
    /// Build, then watch for source changes and rebuild
    Watch {
        /// Folder to watch, or "all" (default: all)
        target: Option<String>,
    },
    /// Delete generated artifacts (aux, log, pdf, ...)
    Clean {
        /// Folder to clean, or "all" (default: all)
        target: Option<String>,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() {
    // Help and version keep clap's exit 0; any argument error (including
    // unknown subcommands) prints usage and exits 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = Config::load(std::env::current_dir()?)?;

    match &cli.command {
        Commands::Init => {
            docker::init_image(&config)?;
            Ok(true)
        }

        Commands::Build { target } => match discover::resolve_target(&config, target.as_deref())? {
            Target::All => build::build_all(&config),
            Target::Folder(dir) => build::build_folder(&config, &dir),
        },

        Commands::Watch { target } => {
            let dirs = match discover::resolve_target(&config, target.as_deref())? {
                Target::All => discover::discover(&config)?,
                Target::Folder(dir) => vec![dir],
            };
            if dirs.is_empty() {
                println!("{} No buildable folders to watch.", "!".yellow());
                return Ok(true);
            }
            build::watch(&config, dirs)?;
            Ok(true)
        }

        Commands::Clean { target } => match discover::resolve_target(&config, target.as_deref())? {
            Target::All => build::clean_all(&config),
            Target::Folder(dir) => {
                build::clean_folder(&config, &dir)?;
                Ok(true)
            }
        },

        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(true)
        }
    }
}
