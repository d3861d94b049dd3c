//! Error types for vitae-compiler.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single PDF compilation attempt.
///
/// [`CompileError::is_compiler_failure`] separates failures of the external
/// compiler itself (recovered with the source fallback) from local I/O
/// failures around it.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to create compile directory: {0}")]
    TempDir(#[source] std::io::Error),

    #[error("failed to write source file {path}: {source}")]
    WriteSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch compiler {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for compiler: {0}")]
    Wait(#[source] std::io::Error),

    #[error("compiler exited with status {code:?}")]
    Exit { code: Option<i32> },

    #[error("compiler timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("compiler produced no output at {path}")]
    MissingOutput { path: PathBuf },

    #[error("failed to read compiled output {path}: {source}")]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// `true` when the external compiler could not run, failed, hung, or left
    /// no output file.
    pub fn is_compiler_failure(&self) -> bool {
        matches!(
            self,
            CompileError::Spawn { .. }
                | CompileError::Wait(_)
                | CompileError::Exit { .. }
                | CompileError::Timeout { .. }
                | CompileError::MissingOutput { .. }
        )
    }
}

/// The only failures a render call surfaces to its caller.
#[derive(Debug, Error)]
pub enum RenderFailure {
    /// Unknown template id.
    #[error("template not found: {id}")]
    NotFound { id: String },

    /// Anything else. The message stays generic; the cause is kept for logs.
    #[error("internal render failure")]
    Unexpected {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RenderFailure {
    pub(crate) fn unexpected(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        RenderFailure::Unexpected {
            source: Box::new(err),
        }
    }
}

/// Errors writing an artifact to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`WriteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.into(),
        source,
    }
}
