#![deny(missing_docs)]
//! stepcast core: turns annotated markdown into an ordered slide script.
//!
//! Each fenced block is a segment; blocks sharing an `@stepN` annotation form
//! one slide. The resulting [`Script`] is plain data for a renderer to play.

/// Fence header lexing.
pub mod annotation;
/// Slide assembly.
pub mod assemble;
/// Parallel assembly of independent documents.
pub mod batch;
/// Code fence detection utilities.
pub mod code_fence;
/// Core error and diagnostic types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// Assembly options.
pub mod options;
/// Renderer seam.
pub mod render;
/// Output data model.
pub mod script;

pub use annotation::{AnnotationSet, LexError, LexErrorKind, LexedHeader, Morph, lex};
pub use assemble::{Assembly, assemble, assemble_with_options};
pub use batch::{BatchInput, BatchOptions, BatchReport, BatchResult, BatchStats, assemble_batch};
pub use code_fence::{FenceLine, FencePhase, FenceState, LineParseOutcome, advance_fence_state};
pub use error::{Diagnostics, ParseWarning, SourceLocation, StepcastError};
pub use frontmatter::{FrontmatterError, FrontmatterExtraction, SceneSettings, extract_frontmatter};
pub use options::{AssembleOptions, DEFAULT_WAIT};
pub use render::SlideRenderer;
pub use script::{Script, Segment, Slide, TransitionMode};
