//! Fence header lexing.
//!
//! A header is the text after the opening backticks, e.g.
//! `csharp @step2 @write @wait[3.0] @fontsize[20]`. The first token is the
//! language tag unless it starts with `@`. Steps are written with their number
//! glued to the name (`@step3`); every other valued annotation takes its
//! argument in brackets (`@wait[2.5]`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Explicit `from -> to` pairing requested by `@transform[from->to]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morph {
    /// Fragment in the previous slide.
    pub from: String,
    /// Fragment it becomes in this slide.
    pub to: String,
}

/// Annotations recognised on a single fence header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSet {
    /// `@stepN`: the slide this block belongs to.
    pub step: Option<u32>,
    /// `@wait[seconds]`.
    pub wait: Option<f64>,
    /// `@write`: type the segment out.
    pub write: bool,
    /// `@transform` or `@transform[a->b]`: morph from the previous slide.
    pub transform: bool,
    /// `@fontsize[n]`.
    pub font_size: Option<u32>,
    /// `@highlight[a,b]`: fragments to emphasise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    /// `@isolate[a,b]`: fragments kept as separate glyph groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub isolate: Vec<String>,
    /// Explicit morph pairs from `@transform[...]`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub morphs: Vec<Morph>,
}

/// A malformed annotation token. The annotation is dropped, the block is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed annotation `{token}`: {kind}")]
pub struct LexError {
    /// The offending token as written.
    pub token: String,
    /// Byte offset of the token within the header.
    pub offset: usize,
    /// What was wrong with it.
    pub kind: LexErrorKind,
}

/// Reasons an annotation token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// `@step` with missing, zero or unparsable digits.
    #[error("expected a positive step number, as in `@step3`")]
    InvalidStep,
    /// `@step[3]` instead of `@step3`.
    #[error("step numbers are written without brackets, as in `@step{0}`")]
    BracketedStep(String),
    /// A valued annotation written bare.
    #[error("`@{0}` expects an argument in brackets")]
    MissingArgument(&'static str),
    /// A flag written with a bracketed argument.
    #[error("`@{0}` does not take an argument")]
    UnexpectedArgument(&'static str),
    /// `[` without a closing `]` at the end of the token.
    #[error("unclosed `[` in argument")]
    UnclosedBracket,
    /// `@wait` argument is not a finite, non-negative number.
    #[error("`{0}` is not a non-negative number of seconds")]
    InvalidWait(String),
    /// `@fontsize` argument is not a positive integer.
    #[error("`{0}` is not a positive integer font size")]
    InvalidFontSize(String),
    /// `@transform` pair without `->` or with an empty side.
    #[error("morph pair `{0}` must be written as `from->to`")]
    InvalidMorph(String),
}

/// Result of lexing one fence header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexedHeader {
    /// Language tag; empty for plain text.
    pub language: String,
    /// Recognised annotations.
    pub annotations: AnnotationSet,
    /// Annotations that were dropped, in header order.
    pub errors: Vec<LexError>,
}

/// Argument part of an `@name[...]` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Argument<'a> {
    None,
    Some(&'a str),
    Unclosed,
}

/// Lex a fence header into its language tag and annotations.
pub fn lex(header: &str) -> LexedHeader {
    let mut lexed = LexedHeader::default();
    let mut tokens = tokenize(header).into_iter().peekable();

    if let Some((_, first)) = tokens.peek()
        && !first.starts_with('@')
    {
        lexed.language = first.to_string();
        tokens.next();
    }

    for (offset, token) in tokens {
        let Some(body) = token.strip_prefix('@') else {
            log::debug!("ignoring stray header token `{token}`");
            continue;
        };
        let (name, argument) = split_argument(body);
        if let Err(kind) = apply(&mut lexed.annotations, name, argument) {
            lexed.errors.push(LexError {
                token: token.to_string(),
                offset,
                kind,
            });
        }
    }

    lexed
}

/// Split on whitespace, keeping bracketed arguments intact. An unclosed `[`
/// ends at the next whitespace-separated `@` token.
fn tokenize(header: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut depth = 0usize;

    for (i, c) in header.char_indices() {
        match c {
            '[' => {
                token_start.get_or_insert(i);
                depth += 1;
            }
            ']' => {
                token_start.get_or_insert(i);
                depth = depth.saturating_sub(1);
            }
            c if c.is_whitespace() && (depth == 0 || starts_annotation(&header[i..])) => {
                depth = 0;
                if let Some(start) = token_start.take() {
                    tokens.push((start, &header[start..i]));
                }
            }
            _ => {
                token_start.get_or_insert(i);
            }
        }
    }

    if let Some(start) = token_start {
        tokens.push((start, &header[start..]));
    }

    tokens
}

fn starts_annotation(rest: &str) -> bool {
    rest.trim_start().starts_with('@')
}

fn split_argument(body: &str) -> (&str, Argument<'_>) {
    match body.split_once('[') {
        None => (body, Argument::None),
        Some((name, rest)) => match rest.strip_suffix(']') {
            Some(inner) => (name, Argument::Some(inner)),
            None => (name, Argument::Unclosed),
        },
    }
}

fn apply(set: &mut AnnotationSet, name: &str, argument: Argument<'_>) -> Result<(), LexErrorKind> {
    match name {
        "wait" => set.wait = Some(parse_wait(required(argument, "wait")?)?),
        "fontsize" => set.font_size = Some(parse_font_size(required(argument, "fontsize")?)?),
        "write" => {
            flag(argument, "write")?;
            set.write = true;
        }
        "transform" => match argument {
            Argument::None => set.transform = true,
            Argument::Some(pairs) => {
                set.morphs = parse_morphs(pairs)?;
                set.transform = true;
            }
            Argument::Unclosed => return Err(LexErrorKind::UnclosedBracket),
        },
        "highlight" => set.highlights = split_list(required(argument, "highlight")?),
        "isolate" => set.isolate = split_list(required(argument, "isolate")?),
        "step" => {
            return Err(match argument {
                Argument::Some(inner) => LexErrorKind::BracketedStep(inner.trim().to_string()),
                _ => LexErrorKind::InvalidStep,
            });
        }
        _ => match name.strip_prefix("step") {
            Some(digits) if looks_numeric(digits) => {
                if argument != Argument::None {
                    return Err(LexErrorKind::InvalidStep);
                }
                set.step = Some(parse_step(digits)?);
            }
            _ => log::debug!("ignoring unrecognised annotation `@{name}`"),
        },
    }
    Ok(())
}

fn required<'a>(argument: Argument<'a>, name: &'static str) -> Result<&'a str, LexErrorKind> {
    match argument {
        Argument::Some(value) => Ok(value),
        Argument::None => Err(LexErrorKind::MissingArgument(name)),
        Argument::Unclosed => Err(LexErrorKind::UnclosedBracket),
    }
}

fn flag(argument: Argument<'_>, name: &'static str) -> Result<(), LexErrorKind> {
    match argument {
        Argument::None => Ok(()),
        Argument::Some(_) => Err(LexErrorKind::UnexpectedArgument(name)),
        Argument::Unclosed => Err(LexErrorKind::UnclosedBracket),
    }
}

fn looks_numeric(digits: &str) -> bool {
    digits
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+')
}

fn parse_step(digits: &str) -> Result<u32, LexErrorKind> {
    match digits.parse::<u32>() {
        Ok(step) if step > 0 && digits.bytes().all(|b| b.is_ascii_digit()) => Ok(step),
        _ => Err(LexErrorKind::InvalidStep),
    }
}

fn parse_wait(value: &str) -> Result<f64, LexErrorKind> {
    match value.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(LexErrorKind::InvalidWait(value.to_string())),
    }
}

fn parse_font_size(value: &str) -> Result<u32, LexErrorKind> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(LexErrorKind::InvalidFontSize(value.to_string())),
    }
}

fn parse_morphs(pairs: &str) -> Result<Vec<Morph>, LexErrorKind> {
    pairs
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once("->") {
            Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => Ok(Morph {
                from: from.trim().to_string(),
                to: to.trim().to_string(),
            }),
            _ => Err(LexErrorKind::InvalidMorph(pair.to_string())),
        })
        .collect()
}

fn split_list(items: &str) -> Vec<String> {
    items
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
