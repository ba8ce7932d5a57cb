use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::Viewport;

/// Options handed to the drawing library on construction and resize.
///
/// `base` is the caller's opaque configuration. The engine never looks
/// inside it; it only overlays what it computed itself: geometry, cursor,
/// interactivity and series labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub viewport: Viewport,
    pub cursor: Option<usize>,
    pub interactive: bool,
    pub labels: Vec<String>,
    pub base: Value,
}

impl RenderOptions {
    #[must_use]
    pub fn new(viewport: Viewport, base: Value) -> Self {
        Self {
            viewport,
            cursor: None,
            interactive: true,
            labels: Vec::new(),
            base,
        }
    }

    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Merges engine-computed fields over the caller's options.
    ///
    /// Object options get `width`, `height`, `cursor`, `interactive` and
    /// `labels` overwritten. Any other value is kept under `base`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut merged = match &self.base {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("base".to_owned(), other.clone());
                map
            }
        };
        merged.insert("width".to_owned(), Value::from(self.viewport.width));
        merged.insert("height".to_owned(), Value::from(self.viewport.height));
        merged.insert(
            "cursor".to_owned(),
            self.cursor.map_or(Value::Null, |index| Value::from(index as u64)),
        );
        merged.insert("interactive".to_owned(), Value::Bool(self.interactive));
        merged.insert(
            "labels".to_owned(),
            Value::Array(self.labels.iter().cloned().map(Value::String).collect()),
        );
        Value::Object(merged)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::RenderOptions;
    use crate::core::Viewport;

    #[test]
    fn merge_overwrites_geometry_and_keeps_caller_keys() {
        let options = RenderOptions::new(
            Viewport::new(400, 240),
            json!({"width": 1, "series": [{"label": "a"}]}),
        )
        .with_cursor(Some(3))
        .with_interactive(false)
        .with_labels(vec!["x".to_owned(), "loss".to_owned()]);

        let merged = options.to_json();
        assert_eq!(merged["width"], json!(400));
        assert_eq!(merged["height"], json!(240));
        assert_eq!(merged["cursor"], json!(3));
        assert_eq!(merged["interactive"], json!(false));
        assert_eq!(merged["series"][0]["label"], json!("a"));
        assert_eq!(merged["labels"], json!(["x", "loss"]));
    }

    #[test]
    fn merge_wraps_non_object_base() {
        let options = RenderOptions::new(Viewport::new(10, 6), json!("raw"));
        let merged = options.to_json();
        assert_eq!(merged["base"], json!("raw"));
        assert_eq!(merged["cursor"], json!(null));
    }
}
