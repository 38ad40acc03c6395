use std::path::PathBuf;

/// Error conditions shared by the build, watch and clean commands.
///
/// Command handlers compose these with `anyhow`; the enum exists so call
/// sites (and tests) can tell a missing folder from a sandbox violation
/// without string matching.
#[derive(Debug)]
pub enum Error {
    /// The requested folder does not exist.
    FolderNotFound(PathBuf),
    /// The folder holds no document source file.
    NoSourceFile(PathBuf),
    /// The resolved path escapes the project root.
    OutsideRoot(PathBuf),
    /// No filesystem watch provider is available.
    MissingWatchTool,
    IoError(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::FolderNotFound(path) => write!(f, "folder not found: {}", path.display()),
            Error::NoSourceFile(path) => {
                write!(f, "no .tex source file in {}", path.display())
            }
            Error::OutsideRoot(path) => {
                write!(f, "path escapes the project root: {}", path.display())
            }
            Error::MissingWatchTool => write!(
                f,
                "no watch provider available (install inotifywait or fswatch)"
            ),
            Error::IoError(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}
