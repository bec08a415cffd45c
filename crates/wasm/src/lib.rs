use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use stepcast_core::{AnnotationSet, AssembleOptions, Slide};

// ============================================================================
// Assembler Config
// ============================================================================

/// Configuration accepted by `assemble`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct WasmAssembleConfig {
    #[serde(default, alias = "defaultWait")]
    pub default_wait: Option<f64>,
    #[serde(default, alias = "defaultFontSize")]
    pub default_font_size: Option<u32>,
    #[serde(default)]
    pub frontmatter: Option<bool>,
}

fn parse_config(config: JsValue) -> Result<WasmAssembleConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(WasmAssembleConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

fn build_options(cfg: &WasmAssembleConfig) -> Result<AssembleOptions, JsError> {
    let defaults = AssembleOptions::default();
    let options = AssembleOptions {
        default_wait: cfg.default_wait.unwrap_or(defaults.default_wait),
        default_font_size: cfg.default_font_size.or(defaults.default_font_size),
        frontmatter: cfg.frontmatter.unwrap_or(defaults.frontmatter),
    };
    options
        .validate()
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?;
    Ok(options)
}

// ============================================================================
// Assemble API
// ============================================================================

/// A recoverable problem found while assembling.
#[derive(Debug, Clone, Serialize)]
pub struct WarningEntry {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Human-readable message.
    pub message: String,
}

/// Script handed to a JavaScript renderer.
#[derive(Debug, Clone, Serialize)]
pub struct AssembleResult {
    /// Scene title, empty when absent.
    pub title: String,
    /// Slides in playback order.
    pub slides: Vec<Slide>,
    /// Dropped annotations and language conflicts.
    pub warnings: Vec<WarningEntry>,
}

/// Assembles annotated markdown into a slide script.
///
/// # Arguments
///
/// * `source` - The markdown document
/// * `config` - Optional `{ defaultWait, defaultFontSize, frontmatter }`
///
/// # Errors
///
/// Throws on a negative `defaultWait` or a zero `defaultFontSize`, and when a
/// block has no `@stepN`, a fence is never closed, or the frontmatter is
/// invalid. Document errors carry the 1-based line number.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { assemble } from './stepcast_wasm';
///
/// const script = assemble("# Demo\n```js @step1 @write\nlet x = 1;\n```");
/// // script.slides[0] = { step: 1, language: "js", transition: "write",
/// //                      wait: 1.5, segments: [...] }
/// ```
#[wasm_bindgen]
pub fn assemble(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let cfg = parse_config(config)?;
    let options = build_options(&cfg)?;
    let assembly = stepcast_core::assemble_with_options(source, &options)
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;

    let warnings = assembly
        .diagnostics
        .iter()
        .map(|warning| WarningEntry {
            line: warning.location().line,
            column: warning.location().column,
            message: warning.to_string(),
        })
        .collect();

    let result = AssembleResult {
        title: assembly.script.title,
        slides: assembly.script.slides,
        warnings,
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Header Lexer API
// ============================================================================

/// Lexed fence header.
#[derive(Debug, Clone, Serialize)]
pub struct LexResult {
    /// Language tag, empty for plain text.
    pub language: String,
    /// Recognised annotations.
    pub annotations: AnnotationSet,
    /// Messages for annotations that were dropped.
    pub errors: Vec<String>,
}

/// Lexes a single fence header such as `csharp @step2 @wait[3]`.
///
/// Useful for editor tooling that previews how a header will be read.
#[wasm_bindgen(js_name = lex_header)]
pub fn lex_header(header: &str) -> Result<JsValue, JsError> {
    let lexed = stepcast_core::lex(header);
    let result = LexResult {
        language: lexed.language,
        annotations: lexed.annotations,
        errors: lexed.errors.iter().map(ToString::to_string).collect(),
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
