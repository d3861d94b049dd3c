//! External compiler invocation inside a per-call scratch directory.
//!
//! Every call gets its own [`CompileWorkspace`]; nothing here is shared between
//! concurrent renders.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use vitae_core::config::CompilerSettings;

use crate::error::CompileError;

const WORKSPACE_PREFIX: &str = "vitae-";
const LOG_FILE: &str = "compiler.log";
const POLL_INTERVAL: Duration = Duration::from_millis(25);
const LOG_TAIL_LINES: usize = 20;

// ---------------------------------------------------------------------------
// CompilerConfig
// ---------------------------------------------------------------------------

/// Which compiler to run and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub program: PathBuf,
    pub timeout: Duration,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self::from(&CompilerSettings::default())
    }
}

impl From<&CompilerSettings> for CompilerConfig {
    fn from(settings: &CompilerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

// ---------------------------------------------------------------------------
// CompileWorkspace
// ---------------------------------------------------------------------------

/// Exclusively owned scratch directory, removed when dropped.
///
/// Removal failures are logged and never replace the result of the compile.
#[derive(Debug)]
pub struct CompileWorkspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl CompileWorkspace {
    pub fn create() -> Result<Self, CompileError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(CompileError::TempDir)?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_path(&self) -> PathBuf {
        self.path.join(LOG_FILE)
    }
}

impl Drop for CompileWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove compile directory"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// compile_pdf
// ---------------------------------------------------------------------------

/// Compile `source` to PDF bytes.
///
/// `stem` names both the written `<stem>.tex` and the expected `<stem>.pdf`.
/// The scratch directory is gone by the time this returns, whatever the outcome.
pub fn compile_pdf(
    config: &CompilerConfig,
    stem: &str,
    source: &str,
) -> Result<Vec<u8>, CompileError> {
    let workspace = CompileWorkspace::create()?;
    let result = compile_in(config, &workspace, stem, source);
    if let Err(e) = &result {
        if e.is_compiler_failure() {
            tracing::warn!(
                program = %config.program.display(),
                error = %e,
                log = %log_tail(&workspace.log_path()),
                "compiler failed"
            );
        }
    }
    result
}

fn compile_in(
    config: &CompilerConfig,
    workspace: &CompileWorkspace,
    stem: &str,
    source: &str,
) -> Result<Vec<u8>, CompileError> {
    let dir = workspace.path();
    let tex_path = dir.join(format!("{stem}.tex"));
    fs::write(&tex_path, source).map_err(|e| CompileError::WriteSource {
        path: tex_path.clone(),
        source: e,
    })?;

    let log_path = workspace.log_path();
    let log = File::create(&log_path).map_err(|e| CompileError::WriteSource {
        path: log_path.clone(),
        source: e,
    })?;
    let log_err = log.try_clone().map_err(|e| CompileError::WriteSource {
        path: log_path.clone(),
        source: e,
    })?;

    tracing::debug!(
        program = %config.program.display(),
        dir = %dir.display(),
        "spawning compiler"
    );
    let child = Command::new(&config.program)
        .arg("-interaction=nonstopmode")
        .arg("-halt-on-error")
        .arg(format!("-output-directory={}", dir.display()))
        .arg(&tex_path)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .spawn()
        .map_err(|e| CompileError::Spawn {
            program: config.program.clone(),
            source: e,
        })?;

    let status = wait_with_timeout(child, config.timeout)?;
    if !status.success() {
        return Err(CompileError::Exit {
            code: status.code(),
        });
    }

    let pdf_path = dir.join(format!("{stem}.pdf"));
    if !pdf_path.is_file() {
        return Err(CompileError::MissingOutput { path: pdf_path });
    }
    fs::read(&pdf_path).map_err(|e| CompileError::ReadOutput {
        path: pdf_path,
        source: e,
    })
}

/// Poll the child until it exits or `timeout` elapses. On expiry, or when the
/// child can no longer be polled, it is killed and reaped before returning so
/// nothing keeps writing into the workspace.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<ExitStatus, CompileError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(CompileError::Wait(e));
            }
        }
        if Instant::now() >= deadline {
            kill_and_reap(&mut child);
            return Err(CompileError::Timeout {
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::warn!(pid = child.id(), error = %e, "failed to kill compiler");
    }
    if let Err(e) = child.wait() {
        tracing::warn!(pid = child.id(), error = %e, "failed to reap compiler");
    }
}

/// Last few lines of the compiler log, or an empty string if unreadable.
fn log_tail(path: &Path) -> String {
    let Ok(bytes) = fs::read(path) else {
        return String::new();
    };
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    lines[start..].join("\n")
}
