use thiserror::Error;

use crate::annotation::LexError;
use crate::frontmatter::FrontmatterError;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of the start of a line
    pub fn line(line: usize) -> Self {
        Self::new(line, 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Fatal errors that abort slide assembly.
#[derive(Debug, Error)]
pub enum StepcastError {
    /// A fenced block carries no usable `@stepN` annotation.
    #[error("block at line {} has no step annotation", .location.line)]
    MissingStep {
        /// Location of the opening fence
        location: SourceLocation,
    },
    /// End of document reached inside a fenced block.
    #[error("code fence opened at line {} is never closed", .location.line)]
    UnterminatedFence {
        /// Location of the opening fence
        location: SourceLocation,
    },
    /// Assembly options out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),
    /// The YAML frontmatter could not be read.
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
}

impl StepcastError {
    /// Create a missing step error for the block opened at `line`
    pub fn missing_step(line: usize) -> Self {
        Self::MissingStep {
            location: SourceLocation::line(line),
        }
    }

    /// Create an unterminated fence error for the block opened at `line`
    pub fn unterminated_fence(line: usize) -> Self {
        Self::UnterminatedFence {
            location: SourceLocation::line(line),
        }
    }

    /// Get the location of this error, when it has one
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            StepcastError::MissingStep { location } => Some(location),
            StepcastError::UnterminatedFence { location } => Some(location),
            StepcastError::InvalidOption(_) | StepcastError::Frontmatter(_) => None,
        }
    }
}

/// Non-fatal problems recorded while assembling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// An annotation was dropped; its default applies
    MalformedAnnotation {
        /// Source location of the offending token
        location: SourceLocation,
        /// The lexer's complaint
        error: LexError,
    },
    /// A slide's segments declare different languages; the first one is kept
    LanguageConflict {
        /// Opening fence of the conflicting segment
        location: SourceLocation,
        /// Step of the affected slide
        step: u32,
        /// Language the slide already uses
        expected: String,
        /// Language declared by the conflicting segment
        found: String,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::MalformedAnnotation { location, .. } => location,
            ParseWarning::LanguageConflict { location, .. } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::MalformedAnnotation { location, error } => {
                write!(f, "{}: {}", location, error)
            }
            ParseWarning::LanguageConflict {
                location,
                step,
                expected,
                found,
            } => write!(
                f,
                "{}: step {} already renders as `{}`, ignoring language `{}`",
                location, step, expected, found
            ),
        }
    }
}

/// Warnings collected alongside a successful assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// List of non-fatal warnings, in document order
    pub warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over the warnings in document order
    pub fn iter(&self) -> std::slice::Iter<'_, ParseWarning> {
        self.warnings.iter()
    }
}
