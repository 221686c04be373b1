use crate::audio::MediaChunk;
use crate::content::parts::Part;
use crate::content::turn::Content;
use crate::setup::{GenerationConfig, SessionConfig};

/// Frames the client writes to the socket, one JSON text frame each.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    Setup(SetupMessage),
    ClientContent(ClientContentMessage),
    RealtimeInput(RealtimeInputMessage),
}

impl ClientMessage {
    pub fn setup(session: &SessionConfig) -> Self {
        ClientMessage::Setup(SetupMessage::new(session))
    }

    pub fn user_content(parts: Vec<Part>, turn_complete: bool) -> Self {
        ClientMessage::ClientContent(ClientContentMessage::new(vec![Content::user(parts)], turn_complete))
    }

    pub fn realtime_input(media_chunks: Vec<MediaChunk>) -> Self {
        ClientMessage::RealtimeInput(RealtimeInputMessage::new(media_chunks))
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Setup(_) => "setup",
            ClientMessage::ClientContent(_) => "clientContent",
            ClientMessage::RealtimeInput(_) => "realtimeInput",
        }
    }
}

/// `setup` frame
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetupMessage {
    model: String,

    /// Always true, the session is a stream.
    stream: bool,

    generation_config: GenerationConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

impl SetupMessage {
    pub fn new(session: &SessionConfig) -> Self {
        Self {
            model: session.model().to_string(),
            stream: true,
            generation_config: session.generation_config().clone(),
            system_instruction: session.system_instruction().cloned(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// `clientContent` frame
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientContentMessage {
    turns: Vec<Content>,

    /// Whether the model should start generating after this content.
    turn_complete: bool,
}

impl ClientContentMessage {
    pub fn new(turns: Vec<Content>, turn_complete: bool) -> Self {
        Self {
            turns,
            turn_complete,
        }
    }

    pub fn turns(&self) -> &[Content] {
        &self.turns
    }

    pub fn turn_complete(&self) -> bool {
        self.turn_complete
    }
}

/// `realtimeInput` frame
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInputMessage {
    media_chunks: Vec<MediaChunk>,
}

impl RealtimeInputMessage {
    pub fn new(media_chunks: Vec<MediaChunk>) -> Self {
        Self { media_chunks }
    }

    pub fn media_chunks(&self) -> &[MediaChunk] {
        &self.media_chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Modality, Voice, PCM_INPUT_MIME_TYPE};
    use crate::setup::SessionConfigurator;
    use serde_json::json;

    #[test]
    fn test_user_content_wire_format() {
        let message = ClientMessage::user_content(vec![Part::from(json!("hello"))], true);
        let text = serde_json::to_string(&message).unwrap();
        assert_eq!(
            text,
            r#"{"clientContent":{"turns":[{"role":"user","parts":["hello"]}],"turnComplete":true}}"#
        );
    }

    #[test]
    fn test_setup_wire_format() {
        let session = SessionConfigurator::new("models/m1")
            .with_response_modalities(vec![Modality::Audio])
            .with_max_output_tokens(256)
            .with_temperature(0.5)
            .with_top_p(0.25)
            .with_top_k(40)
            .with_voice(Voice::Aoede)
            .build();

        let value = serde_json::to_value(ClientMessage::setup(&session)).unwrap();
        assert_eq!(
            value,
            json!({
                "setup": {
                    "model": "models/m1",
                    "stream": true,
                    "generationConfig": {
                        "responseModalities": ["AUDIO"],
                        "candidateCount": 1,
                        "maxOutputTokens": 256,
                        "temperature": 0.5,
                        "topP": 0.25,
                        "topK": 40,
                        "stopSequences": [],
                        "speechConfig": { "voice": "Aoede" }
                    }
                }
            })
        );
    }

    #[test]
    fn test_setup_omits_unset_parameters() {
        let session = SessionConfigurator::new("m1").with_text_only().build();
        let value = serde_json::to_value(ClientMessage::setup(&session)).unwrap();
        let generation = &value["setup"]["generationConfig"];
        assert_eq!(generation["responseModalities"], json!(["TEXT"]));
        assert!(generation.get("temperature").is_none());
        assert!(generation.get("speechConfig").is_none());
        assert!(value["setup"].get("systemInstruction").is_none());
    }

    #[test]
    fn test_realtime_input_wire_format() {
        let message = ClientMessage::realtime_input(vec![
            MediaChunk::pcm("AAEC".to_string()),
            MediaChunk::pcm("AwQF".to_string()),
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "realtimeInput": {
                    "mediaChunks": [
                        { "mimeType": PCM_INPUT_MIME_TYPE, "data": "AAEC" },
                        { "mimeType": PCM_INPUT_MIME_TYPE, "data": "AwQF" }
                    ]
                }
            })
        );
        assert_eq!(message.kind(), "realtimeInput");
    }
}
