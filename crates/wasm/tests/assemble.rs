use serde::Deserialize;
use stepcast_core::{AnnotationSet, Slide, TransitionMode};
use stepcast_wasm::{assemble, lex_header};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct AssembleResult {
    title: String,
    slides: Vec<Slide>,
    warnings: Vec<WarningEntry>,
}

#[derive(Deserialize, Debug)]
struct WarningEntry {
    line: usize,
    column: usize,
    message: String,
}

#[derive(Deserialize, Debug)]
struct LexResult {
    language: String,
    annotations: AnnotationSet,
    errors: Vec<String>,
}

fn run(source: &str) -> AssembleResult {
    let result = assemble(source, JsValue::UNDEFINED).expect("assemble should succeed");
    serde_wasm_bindgen::from_value(result).expect("deserialize result")
}

#[wasm_bindgen_test]
fn assemble_basic_document() {
    let result = run("# Hello\n\n```csharp @step1\nx\n```");

    assert_eq!(result.title, "Hello");
    assert_eq!(result.slides.len(), 1);
    assert_eq!(result.slides[0].language, "csharp");
    assert_eq!(result.slides[0].segments[0].body, "x");
    assert_eq!(result.slides[0].transition, TransitionMode::Crossfade);
    assert!(result.warnings.is_empty());
}

#[wasm_bindgen_test]
fn assemble_reports_warnings() {
    let result = run("```js @step1 @wait[abc]\nx\n```");

    assert_eq!(result.slides[0].wait, 1.5);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].line, 1);
    assert_eq!(result.warnings[0].column, 14);
    assert!(result.warnings[0].message.contains("@wait[abc]"));
}

#[wasm_bindgen_test]
fn assemble_missing_step_throws() {
    assert!(assemble("```js\nx\n```", JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn assemble_with_config() {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Config {
        default_wait: f64,
        default_font_size: u32,
    }

    let config = serde_wasm_bindgen::to_value(&Config {
        default_wait: 0.5,
        default_font_size: 32,
    })
    .unwrap();
    let result = assemble("```@step1\nhi\n```", config).expect("assemble should succeed");
    let result: AssembleResult = serde_wasm_bindgen::from_value(result).unwrap();

    assert_eq!(result.slides[0].wait, 0.5);
    assert_eq!(result.slides[0].segments[0].font_size, Some(32));
}

#[wasm_bindgen_test]
fn lex_header_reports_errors() {
    let result = lex_header("python @step2 @transform @fontsize[0]").unwrap();
    let result: LexResult = serde_wasm_bindgen::from_value(result).unwrap();

    assert_eq!(result.language, "python");
    assert_eq!(result.annotations.step, Some(2));
    assert!(result.annotations.transform);
    assert_eq!(result.annotations.font_size, None);
    assert_eq!(result.errors.len(), 1);
}

#[wasm_bindgen_test]
fn assemble_rejects_out_of_range_config() {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Config {
        default_wait: f64,
    }

    let config = serde_wasm_bindgen::to_value(&Config { default_wait: -2.0 }).unwrap();
    assert!(assemble("```@step1\nhi\n```", config).is_err());

    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct FontConfig {
        default_font_size: u32,
    }

    let config = serde_wasm_bindgen::to_value(&FontConfig { default_font_size: 0 }).unwrap();
    assert!(assemble("```@step1\nhi\n```", config).is_err());
}
