//! Code fence tracking for slide extraction.
//!
//! Only backtick fences that begin at column 0 are recognised. The length of
//! the opening run is remembered and a closing line must repeat it exactly,
//! so a plain ```` ``` ```` line closes a block opened with three backticks.

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase and opening run length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Number of backticks in the opening run, zero when outside.
    pub length: usize,
}

/// How a single line relates to the fence structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceLine<'a> {
    /// Ordinary markdown outside any fence.
    Outside,
    /// Opening fence; `header` is the trimmed text after the backticks.
    Open {
        /// Language tag and annotations, trimmed.
        header: &'a str,
        /// Byte offset of `header` within the line.
        header_offset: usize,
    },
    /// A line of block content.
    Body,
    /// The closing fence.
    Close,
}

/// Outcome of processing a single line for fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParseOutcome<'a> {
    /// State to carry into the next line.
    pub next_state: FenceState,
    /// Classification of the processed line.
    pub kind: FenceLine<'a>,
}

/// Advance fence state based on a single line of text.
pub fn advance_fence_state(line: &str, state: FenceState) -> LineParseOutcome<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    match state.phase {
        FencePhase::Outside => match backtick_run(line) {
            Some(length) => {
                let rest = &line[length..];
                let leading = rest.len() - rest.trim_start().len();
                LineParseOutcome {
                    next_state: FenceState {
                        phase: FencePhase::InsideFence,
                        length,
                    },
                    kind: FenceLine::Open {
                        header: rest.trim(),
                        header_offset: length + leading,
                    },
                }
            }
            None => LineParseOutcome {
                next_state: state,
                kind: FenceLine::Outside,
            },
        },
        FencePhase::InsideFence if is_closing_fence(line, state.length) => LineParseOutcome {
            next_state: FenceState::default(),
            kind: FenceLine::Close,
        },
        FencePhase::InsideFence => LineParseOutcome {
            next_state: state,
            kind: FenceLine::Body,
        },
    }
}

/// Length of a line-leading backtick run, if it is long enough to open a fence.
fn backtick_run(line: &str) -> Option<usize> {
    let run = line.bytes().take_while(|b| *b == b'`').count();
    (run >= 3).then_some(run)
}

/// A closing fence is the opening run of backticks and nothing else.
fn is_closing_fence(line: &str, length: usize) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() == length && trimmed.bytes().all(|b| b == b'`')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_and_closes_backtick_fence() {
        let start = advance_fence_state("```csharp @step1", FenceState::default());
        assert_eq!(
            start.kind,
            FenceLine::Open {
                header: "csharp @step1",
                header_offset: 3
            }
        );
        assert_eq!(start.next_state.phase, FencePhase::InsideFence);
        assert_eq!(start.next_state.length, 3);

        let inner = advance_fence_state("var x = 1;", start.next_state);
        assert_eq!(inner.kind, FenceLine::Body);

        let end = advance_fence_state("```", inner.next_state);
        assert_eq!(end.kind, FenceLine::Close);
        assert_eq!(end.next_state, FenceState::default());
    }

    #[test]
    fn header_offset_skips_padding() {
        let start = advance_fence_state("```   @step2 @write  ", FenceState::default());
        assert_eq!(
            start.kind,
            FenceLine::Open {
                header: "@step2 @write",
                header_offset: 6
            }
        );
    }

    #[test]
    fn bare_fence_has_empty_header() {
        let start = advance_fence_state("```", FenceState::default());
        assert!(matches!(start.kind, FenceLine::Open { header: "", .. }));
    }

    #[test]
    fn indented_fence_not_opened() {
        let outcome = advance_fence_state("  ```js @step1", FenceState::default());
        assert_eq!(outcome.kind, FenceLine::Outside);
        assert_eq!(outcome.next_state.phase, FencePhase::Outside);
    }

    #[test]
    fn requires_three_markers_to_open() {
        let outcome = advance_fence_state("``", FenceState::default());
        assert_eq!(outcome.kind, FenceLine::Outside);
    }

    #[test]
    fn tilde_fences_are_plain_text() {
        let outcome = advance_fence_state("~~~ts @step1", FenceState::default());
        assert_eq!(outcome.kind, FenceLine::Outside);
    }

    #[test]
    fn fence_with_info_string_does_not_close() {
        let start = advance_fence_state("``` @step1", FenceState::default());
        let not_closed = advance_fence_state("```js", start.next_state);
        assert_eq!(not_closed.kind, FenceLine::Body);
        assert_eq!(not_closed.next_state.phase, FencePhase::InsideFence);
    }

    #[test]
    fn four_backtick_fence_contains_three_backtick() {
        let start = advance_fence_state("````markdown @step1", FenceState::default());
        assert_eq!(start.next_state.length, 4);

        let inner_open = advance_fence_state("```js", start.next_state);
        assert_eq!(inner_open.kind, FenceLine::Body);
        let inner_close = advance_fence_state("```", inner_open.next_state);
        assert_eq!(inner_close.kind, FenceLine::Body);

        let outer_close = advance_fence_state("````", inner_close.next_state);
        assert_eq!(outer_close.kind, FenceLine::Close);
    }

    #[test]
    fn closing_fence_tolerates_carriage_return_and_trailing_space() {
        let start = advance_fence_state("```\r", FenceState::default());
        assert!(matches!(start.kind, FenceLine::Open { header: "", .. }));
        let end = advance_fence_state("```  \r", start.next_state);
        assert_eq!(end.kind, FenceLine::Close);
    }

    #[test]
    fn indented_closer_is_body() {
        let start = advance_fence_state("``` @step1", FenceState::default());
        let inner = advance_fence_state("  ```", start.next_state);
        assert_eq!(inner.kind, FenceLine::Body);
    }
}
