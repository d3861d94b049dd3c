//! # vitae-renderer
//!
//! Turns a loosely-typed field submission into rendered document text:
//!
//! 1. [`model`]: normalize the submission into a [`CanonicalDataModel`]
//! 2. [`sanitize`]: escape every leaf string for LaTeX
//! 3. [`engine`]: expand `{{ var }}` / `{{#each}}` templates against the sanitized model
//! 4. [`summary`]: independent plain-text rendition of the unsanitized model
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use vitae_renderer::{expand, summarize, CanonicalDataModel, SanitizedModel};
//!
//! let model = CanonicalDataModel::build(&json!({ "full_name": "R&D Team" }));
//! let sanitized = SanitizedModel::from_model(&model).unwrap();
//! assert_eq!(expand("{{ full_name }}", &sanitized), r"R\&D Team");
//! assert!(summarize(&model).starts_with("R&D Team\n"));
//! ```

pub mod engine;
pub mod error;
pub mod model;
pub mod sanitize;
pub mod summary;

pub use engine::{expand, CompiledTemplate, Node};
pub use error::RenderError;
pub use model::{CanonicalDataModel, EducationEntry, ExperienceEntry, ProjectEntry};
pub use sanitize::{escape, sanitize, SanitizedModel};
pub use summary::summarize;
