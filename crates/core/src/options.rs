//! Assembly configuration.

use crate::error::StepcastError;
use crate::frontmatter::SceneSettings;

/// Seconds a slide stays on screen when none of its segments asks otherwise.
pub const DEFAULT_WAIT: f64 = 1.5;

/// Options controlling how a document is assembled into slides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssembleOptions {
    /// Wait applied to slides that declare no `@wait`.
    pub default_wait: f64,
    /// Font size applied to segments without `@fontsize`. `None` leaves the
    /// choice to the renderer.
    pub default_font_size: Option<u32>,
    /// Read scene settings from leading YAML frontmatter.
    pub frontmatter: bool,
}

impl AssembleOptions {
    /// Stock defaults: 1.5 second waits, renderer font size, frontmatter on.
    pub const fn new() -> Self {
        Self {
            default_wait: DEFAULT_WAIT,
            default_font_size: None,
            frontmatter: true,
        }
    }

    /// Defaults with frontmatter detection disabled; a leading `---` block is
    /// then ordinary markdown.
    pub const fn without_frontmatter() -> Self {
        Self {
            frontmatter: false,
            ..Self::new()
        }
    }

    /// Reject a negative or non-finite wait and a zero font size.
    pub fn validate(&self) -> Result<(), StepcastError> {
        if !(self.default_wait.is_finite() && self.default_wait >= 0.0) {
            return Err(StepcastError::InvalidOption(format!(
                "default wait must be a non-negative number of seconds, got {}",
                self.default_wait
            )));
        }
        if self.default_font_size == Some(0) {
            return Err(StepcastError::InvalidOption(
                "default font size must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Overlay document settings on top of these options.
    pub fn with_settings(self, settings: &SceneSettings) -> Self {
        Self {
            default_wait: settings.wait.unwrap_or(self.default_wait),
            default_font_size: settings.fontsize.or(self.default_font_size),
            ..self
        }
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self::new()
    }
}
