use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("failed to launch XSLT engine '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("XSLT engine '{program}' failed ({status}): {stderr}")]
    Engine {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Single-file transform capability.
///
/// The engine is an external collaborator; this seam is what tests swap out.
pub trait XsltEngine {
    /// Transform `source` with the configured stylesheet, writing the
    /// result document to `output`. Blocks until the engine exits.
    fn transform(&self, source: &Path, output: &Path) -> Result<(), TransformError>;
}

/// Runs an engine process with Saxon-style `-s:`/`-xsl:`/`-o:` arguments.
pub struct EngineCommand {
    program: PathBuf,
    stylesheet: PathBuf,
}

impl EngineCommand {
    pub fn new(program: impl Into<PathBuf>, stylesheet: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            stylesheet: stylesheet.into(),
        }
    }
}

impl XsltEngine for EngineCommand {
    fn transform(&self, source: &Path, output: &Path) -> Result<(), TransformError> {
        let result = Command::new(&self.program)
            .arg(prefixed_arg("-s:", source))
            .arg(prefixed_arg("-xsl:", &self.stylesheet))
            .arg(prefixed_arg("-o:", output))
            .output()
            .map_err(|source| TransformError::Launch {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(TransformError::Engine {
                program: self.program.display().to_string(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

fn prefixed_arg(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path.as_os_str());
    arg
}
