//! Slide assembly: one pass over the document, fenced blocks folded into
//! slides keyed by step number.
//!
//! Slides keep the order in which their step first appears, not numeric
//! order. A block re-declaring an earlier step is appended to that slide.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::annotation;
use crate::code_fence::{FenceLine, FenceState, advance_fence_state};
use crate::error::{Diagnostics, ParseWarning, SourceLocation, StepcastError};
use crate::frontmatter::{SceneSettings, extract_frontmatter};
use crate::options::AssembleOptions;
use crate::script::{Script, Segment, Slide, TransitionMode};

/// A successfully assembled script together with its recoverable warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Title and slides for the renderer.
    pub script: Script,
    /// Dropped annotations and other non-fatal findings.
    pub diagnostics: Diagnostics,
}

/// Assemble a document with default options.
pub fn assemble(document: &str) -> Result<Assembly, StepcastError> {
    assemble_with_options(document, &AssembleOptions::default())
}

/// Assemble a document into a [`Script`].
///
/// Fails on out-of-range options, on the first block without a step and on an
/// unclosed fence.
/// Malformed annotations only produce warnings.
pub fn assemble_with_options(
    document: &str,
    options: &AssembleOptions,
) -> Result<Assembly, StepcastError> {
    options.validate()?;
    let (settings, body_start, lines_before_body) = if options.frontmatter {
        let extraction = extract_frontmatter(document)?;
        let settings = SceneSettings::from_value(&extraction.value)?;
        let lines_before_body = extraction.lines_before_body(document);
        (settings, extraction.body_start, lines_before_body)
    } else {
        (SceneSettings::default(), 0, 0)
    };
    let options = options.with_settings(&settings);

    let mut assembler = Assembler::new(options);
    let mut state = FenceState::default();
    let mut open: Option<OpenBlock<'_>> = None;
    let mut title: Option<String> = None;

    for (index, line) in document[body_start..].lines().enumerate() {
        let line_number = lines_before_body + index + 1;
        let outcome = advance_fence_state(line, state);
        state = outcome.next_state;

        match outcome.kind {
            FenceLine::Outside => {
                if title.is_none() {
                    title = scene_title(line);
                }
            }
            FenceLine::Open {
                header,
                header_offset,
            } => {
                open = Some(OpenBlock {
                    line: line_number,
                    header,
                    header_offset,
                    lines: Vec::new(),
                });
            }
            FenceLine::Body => {
                if let Some(block) = open.as_mut() {
                    block.lines.push(line);
                }
            }
            FenceLine::Close => {
                if let Some(block) = open.take() {
                    assembler.push(block)?;
                }
            }
        }
    }

    if let Some(block) = open {
        return Err(StepcastError::unterminated_fence(block.line));
    }

    let title = title
        .filter(|title| !title.is_empty())
        .or(settings.title)
        .unwrap_or_default();
    Ok(assembler.finish(title))
}

/// Text of a `# ` heading, if the line is one. A blank heading still claims
/// the title.
fn scene_title(line: &str) -> Option<String> {
    let title = line.trim_start_matches('\u{feff}').strip_prefix("# ")?;
    Some(title.trim().to_string())
}

/// A fenced block whose closing fence has not been seen yet.
struct OpenBlock<'a> {
    line: usize,
    header: &'a str,
    header_offset: usize,
    lines: Vec<&'a str>,
}

impl OpenBlock<'_> {
    /// Body lines joined verbatim, minus leading and trailing blank lines.
    fn body(&self) -> String {
        let lines = &self.lines;
        let start = lines
            .iter()
            .position(|line| !line.trim().is_empty())
            .unwrap_or(lines.len());
        let end = lines
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(start, |last| last + 1);
        lines[start..end].join("\n")
    }
}

struct SlideBuilder {
    step: u32,
    segments: Vec<Segment>,
}

struct Assembler {
    options: AssembleOptions,
    slides: Vec<SlideBuilder>,
    index_by_step: HashMap<u32, usize>,
    diagnostics: Diagnostics,
}

impl Assembler {
    fn new(options: AssembleOptions) -> Self {
        Self {
            options,
            slides: Vec::new(),
            index_by_step: HashMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn push(&mut self, block: OpenBlock<'_>) -> Result<(), StepcastError> {
        let lexed = annotation::lex(block.header);

        for error in lexed.errors {
            let location =
                SourceLocation::new(block.line, block.header_offset + error.offset + 1);
            log::warn!("{location}: {error}");
            self.diagnostics
                .add_warning(ParseWarning::MalformedAnnotation { location, error });
        }

        let Some(step) = lexed.annotations.step else {
            return Err(StepcastError::missing_step(block.line));
        };

        let segment = Segment {
            line: block.line,
            body: block.body(),
            font_size: lexed
                .annotations
                .font_size
                .or(self.options.default_font_size),
            language: lexed.language,
            annotations: lexed.annotations,
        };

        let index = match self.index_by_step.entry(step) {
            Entry::Occupied(entry) => {
                log::debug!(
                    "block at line {} joins step {} declared earlier",
                    block.line,
                    step
                );
                *entry.get()
            }
            Entry::Vacant(entry) => {
                self.slides.push(SlideBuilder {
                    step,
                    segments: Vec::new(),
                });
                *entry.insert(self.slides.len() - 1)
            }
        };
        self.slides[index].segments.push(segment);
        Ok(())
    }

    fn finish(self, title: String) -> Assembly {
        let Assembler {
            options,
            slides,
            mut diagnostics,
            ..
        } = self;

        let slides = slides
            .into_iter()
            .map(|builder| builder.resolve(&options, &mut diagnostics))
            .collect();

        Assembly {
            script: Script { title, slides },
            diagnostics,
        }
    }
}

impl SlideBuilder {
    fn resolve(self, options: &AssembleOptions, diagnostics: &mut Diagnostics) -> Slide {
        let transition = if self.segments.iter().any(|s| s.annotations.write) {
            TransitionMode::Write
        } else if self.segments.iter().any(|s| s.annotations.transform) {
            TransitionMode::Transform
        } else {
            TransitionMode::Crossfade
        };

        let wait = self
            .segments
            .iter()
            .filter_map(|s| s.annotations.wait)
            .reduce(f64::max)
            .unwrap_or(options.default_wait);

        let mut language = String::new();
        for segment in self.segments.iter().filter(|s| !s.language.is_empty()) {
            if language.is_empty() {
                language = segment.language.clone();
            } else if segment.language != language {
                log::warn!(
                    "step {} mixes languages `{}` and `{}`",
                    self.step,
                    language,
                    segment.language
                );
                diagnostics.add_warning(ParseWarning::LanguageConflict {
                    location: SourceLocation::line(segment.line),
                    step: self.step,
                    expected: language.clone(),
                    found: segment.language.clone(),
                });
            }
        }

        Slide {
            step: self.step,
            language,
            transition,
            wait,
            segments: self.segments,
        }
    }
}
