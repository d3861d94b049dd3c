//! # vitae-compiler
//!
//! Turns a template id and a raw submission into a downloadable artifact.
//!
//! Call [`ArtifactCompiler::render`] with a [`Format`]: `source` returns the
//! expanded LaTeX, `summary` the plain-text rendition, and `pdf` runs the
//! external compiler in a private scratch directory, falling back to the
//! source artifact when the compiler fails. [`write_artifact`] stores the
//! result on disk atomically.

pub mod artifact;
pub mod compile;
pub mod error;
pub mod pipeline;
pub mod writer;

pub use artifact::{Artifact, Format};
pub use compile::{compile_pdf, CompileWorkspace, CompilerConfig};
pub use error::{CompileError, RenderFailure, WriteError};
pub use pipeline::ArtifactCompiler;
pub use writer::{write_artifact, WriteResult};
