use crate::audio::Base64EncodedAudioBytes;

/// Inline binary payload, e.g. `{"mimeType":"audio/pcm","data":"..."}`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    mime_type: String,
    data: Base64EncodedAudioBytes,
}

impl Blob {
    pub fn new(mime_type: &str, data: Base64EncodedAudioBytes) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// One element of a turn's `parts` array.
///
/// The endpoint owns the schema, so anything that is neither a text part nor
/// an inline-data part is passed through untouched as `Raw`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Raw(serde_json::Value),
}

impl Part {
    pub fn text(text: &str) -> Self {
        Part::Text {
            text: text.to_string(),
        }
    }

    pub fn inline_data(mime_type: &str, data: Base64EncodedAudioBytes) -> Self {
        Part::InlineData {
            inline_data: Blob::new(mime_type, data),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Part {
    fn from(value: serde_json::Value) -> Self {
        Part::Raw(value)
    }
}

impl From<Part> for Vec<Part> {
    fn from(part: Part) -> Self {
        vec![part]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_part_shapes() {
        assert_eq!(
            serde_json::to_value(Part::text("hi")).unwrap(),
            json!({"text": "hi"})
        );
        assert_eq!(
            serde_json::to_value(Part::inline_data("image/png", "AAAA".to_string())).unwrap(),
            json!({"inlineData": {"mimeType": "image/png", "data": "AAAA"}})
        );
        assert_eq!(
            serde_json::to_value(Part::from(json!("hello"))).unwrap(),
            json!("hello")
        );
    }

    #[test]
    fn test_part_deserialize_falls_back_to_raw() {
        let part: Part = serde_json::from_value(json!({"text": "hi"})).unwrap();
        assert_eq!(part.as_text(), Some("hi"));

        let part: Part = serde_json::from_value(json!({"functionCall": {"name": "f"}})).unwrap();
        assert_eq!(part, Part::Raw(json!({"functionCall": {"name": "f"}})));
    }
}
