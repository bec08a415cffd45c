//! YAML frontmatter holding scene-wide settings.
//!
//! ```text
//! ---
//! title: LINQ in three steps
//! wait: 2.0
//! fontsize: 28
//! ---
//! ```

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result returned after extracting frontmatter from a Markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON value.
    pub value: JsonValue,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }

    /// Number of document lines consumed before the Markdown body.
    pub fn lines_before_body(&self, input: &str) -> usize {
        input[..self.body_start].matches('\n').count()
    }
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
    /// A known setting has the wrong type or an out-of-range value.
    #[error("Invalid frontmatter setting: {0}")]
    InvalidSetting(String),
}

/// Scene-wide settings read from frontmatter. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneSettings {
    /// Title used when the document has no `# ` heading.
    #[serde(default)]
    pub title: Option<String>,
    /// Default wait in seconds for slides that declare none.
    #[serde(default)]
    pub wait: Option<f64>,
    /// Default font size for segments without `@fontsize`.
    #[serde(default, alias = "font_size", alias = "fontSize")]
    pub fontsize: Option<u32>,
}

impl SceneSettings {
    /// Read settings from an extracted frontmatter mapping.
    pub fn from_value(value: &JsonValue) -> Result<Self, FrontmatterError> {
        let settings: SceneSettings = serde_json::from_value(value.clone())
            .map_err(|err| FrontmatterError::InvalidSetting(err.to_string()))?;

        if let Some(wait) = settings.wait
            && !(wait.is_finite() && wait >= 0.0)
        {
            return Err(FrontmatterError::InvalidSetting(format!(
                "wait must be a non-negative number of seconds, got {wait}"
            )));
        }
        if settings.fontsize == Some(0) {
            return Err(FrontmatterError::InvalidSetting(
                "fontsize must be a positive integer".to_string(),
            ));
        }

        Ok(settings)
    }
}

/// Extracts YAML frontmatter from an input document.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

/// Locates a leading `---` block. Only blank lines (and a BOM) may precede it.
fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let bom_len = if input.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let mut lines = LineCursor::new(input, bom_len);

    let opener = lines.by_ref().find(|(line, _)| !line.trim().is_empty());
    let Some((_, after_open)) = opener.filter(|(line, _)| is_yaml_fence(line)) else {
        return Ok(None);
    };

    for (line, next) in lines {
        if is_yaml_fence(line) {
            let line_start = next - line.len() - usize::from(input[..next].ends_with('\n'));
            let block = input[after_open..line_start].trim_end_matches(['\r', '\n']);
            return Ok(Some((block, next)));
        }
    }

    Err(FrontmatterError::Unterminated)
}

/// Iterates lines as `(line, offset just past the line terminator)`.
struct LineCursor<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str, start: usize) -> Self {
        Self {
            input,
            cursor: start,
        }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor;
        if start >= self.input.len() {
            return None;
        }

        let rest = &self.input[start..];
        let (line, next) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], start + pos + 1),
            None => (rest, self.input.len()),
        };
        self.cursor = next;
        Some((line, next))
    }
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterExtraction {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn returns_empty_when_no_frontmatter() {
        let result = extract("# Title\n```js @step1\nx\n```");
        assert_eq!(result.body_start, 0);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.lines_before_body("# Title"), 0);
    }

    #[test]
    fn parses_scene_settings() {
        let input = "---\ntitle: Example\nwait: 2\nfontsize: 28\nauthor: someone\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(result.lines_before_body(input), 6);

        let settings = SceneSettings::from_value(&result.value).unwrap();
        assert_eq!(
            settings,
            SceneSettings {
                title: Some("Example".to_string()),
                wait: Some(2.0),
                fontsize: Some(28),
            }
        );
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract(input);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.body_start, input.find("# Body").unwrap());
        assert_eq!(
            SceneSettings::from_value(&result.value).unwrap(),
            SceneSettings::default()
        );
    }

    #[test]
    fn skips_bom_and_blank_lines() {
        let input = "\u{feff}\n   \n---\r\nwait: 0.5\r\n---\r\nBody";
        let result = extract(input);
        assert_eq!(result.body_start, input.find("Body").unwrap());
        assert_eq!(result.lines_before_body(input), 5);
        let settings = SceneSettings::from_value(&result.value).unwrap();
        assert_eq!(settings.wait, Some(0.5));
    }

    #[test]
    fn horizontal_rule_after_content_is_not_frontmatter() {
        let result = extract("# Title\n---\nwait: 3\n---\n");
        assert_eq!(result.body_start, 0);
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let input = "---\ninvalid: [unterminated\n---\n";
        let err = extract_frontmatter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn errors_on_unterminated_block() {
        let input = "---\ntitle: test";
        let err = extract_frontmatter(input).unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn errors_on_non_mapping_root() {
        let err = extract_frontmatter("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType));
    }

    #[test]
    fn rejects_ill_typed_settings() {
        let value = serde_json::json!({ "wait": "long" });
        let err = SceneSettings::from_value(&value).unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidSetting(_)));

        let value = serde_json::json!({ "wait": -1.0 });
        assert!(SceneSettings::from_value(&value).is_err());

        let value = serde_json::json!({ "fontsize": 0 });
        assert!(SceneSettings::from_value(&value).is_err());
    }
}
