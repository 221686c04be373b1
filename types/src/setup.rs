use crate::audio::{Modality, Voice};
use crate::content::turn::Content;

/// Session parameters sent in the `setup` frame. Supplied once per `connect`
/// and reused verbatim for every reconnect of that session.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Model identifier, ex: "models/gemini-2.0-flash-exp"
    model: String,

    generation_config: GenerationConfig,

    /// Optional system instructions prepended to the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

impl SessionConfig {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation_config
    }

    pub fn system_instruction(&self) -> Option<&Content> {
        self.system_instruction.as_ref()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// The set of modalities the model can respond with, ex: ["AUDIO"]
    response_modalities: Vec<Modality>,

    /// Always 1 for streaming sessions.
    candidate_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,

    /// Sampling temperature for the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,

    stop_sequences: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            response_modalities: vec![Modality::Audio],
            candidate_count: 1,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            top_k: None,
            stop_sequences: Vec::new(),
            speech_config: None,
        }
    }
}

impl GenerationConfig {
    pub fn response_modalities(&self) -> &[Modality] {
        &self.response_modalities
    }

    pub fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn top_p(&self) -> Option<f32> {
        self.top_p
    }

    pub fn top_k(&self) -> Option<u32> {
        self.top_k
    }

    pub fn stop_sequences(&self) -> &[String] {
        &self.stop_sequences
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.speech_config.as_ref().map(|s| &s.voice)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct SpeechConfig {
    voice: Voice,
}

impl SpeechConfig {
    pub fn new(voice: Voice) -> Self {
        Self { voice }
    }
}

pub struct SessionConfigurator {
    session: SessionConfig,
}

impl SessionConfigurator {
    pub fn new(model: &str) -> Self {
        Self {
            session: SessionConfig {
                model: model.to_string(),
                generation_config: GenerationConfig::default(),
                system_instruction: None,
            },
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.session.model = model.to_string();
        self
    }

    pub fn with_response_modalities(mut self, modalities: Vec<Modality>) -> Self {
        self.session.generation_config.response_modalities = modalities;
        self
    }

    pub fn with_text_only(mut self) -> Self {
        self.session.generation_config.response_modalities = vec![Modality::Text];
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.session.generation_config.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.session.generation_config.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.session.generation_config.top_k = Some(top_k);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.session.generation_config.max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.session.generation_config.stop_sequences = stop_sequences;
        self
    }

    pub fn with_voice(mut self, voice: Voice) -> Self {
        self.session.generation_config.speech_config = Some(SpeechConfig::new(voice));
        self
    }

    pub fn with_system_instruction(mut self, instruction: Content) -> Self {
        self.session.system_instruction = Some(instruction);
        self
    }

    pub fn build(self) -> SessionConfig {
        self.session
    }
}
