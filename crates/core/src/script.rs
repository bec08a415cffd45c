//! The assembled animation script handed to a renderer.
//!
//! Two tiers: each [`Segment`] keeps the annotations of the block it came
//! from, while the owning [`Slide`] carries the values resolved across all of
//! its segments (transition, wait and language).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationSet;

/// Transition a renderer plays when a slide comes on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Typed reveal.
    Write,
    /// Morph from the previous slide.
    Transform,
    /// Fade out, fade in.
    #[default]
    Crossfade,
}

impl TransitionMode {
    /// Lowercase name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionMode::Write => "write",
            TransitionMode::Transform => "transform",
            TransitionMode::Crossfade => "crossfade",
        }
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source block inside a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Line of the opening fence (1-indexed).
    pub line: usize,
    /// Language tag as written; empty for plain text.
    pub language: String,
    /// Block body with surrounding blank lines removed.
    pub body: String,
    /// Declared `@fontsize`, else the document default. `None` defers to the
    /// renderer.
    pub font_size: Option<u32>,
    /// Annotations exactly as declared on this block.
    pub annotations: AnnotationSet,
}

/// Unit of playback: every block sharing one step number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Step number shared by all segments.
    pub step: u32,
    /// First non-empty segment language; empty for a text slide.
    pub language: String,
    /// Effective transition across all segments.
    pub transition: TransitionMode,
    /// Effective wait in seconds.
    pub wait: f64,
    /// Segments in source order.
    pub segments: Vec<Segment>,
}

impl Slide {
    /// Whether the renderer should syntax highlight this slide.
    pub fn is_code(&self) -> bool {
        !self.language.is_empty()
    }

    /// Segment bodies joined by newlines.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.body.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.step)?;
        if self.is_code() {
            write!(f, "code({})", self.language)?;
        } else {
            f.write_str("text")?;
        }
        write!(
            f,
            " {} wait={}s segments={}",
            self.transition,
            self.wait,
            self.segments.len()
        )
    }
}

/// Title plus slides in playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Scene title; empty when the document has none.
    pub title: String,
    /// Slides ordered by first appearance of their step.
    pub slides: Vec<Slide>,
}

impl Script {
    /// Whether there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Look up a slide by step number.
    pub fn slide(&self, step: u32) -> Option<&Slide> {
        self.slides.iter().find(|slide| slide.step == step)
    }
}

/// One line per slide, preceded by the title when there is one.
impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.title.is_empty() {
            writeln!(f, "# {}", self.title)?;
        }
        for slide in &self.slides {
            writeln!(f, "{slide}")?;
        }
        Ok(())
    }
}
