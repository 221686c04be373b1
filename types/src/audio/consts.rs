use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::str::FromStr;

/// MIME descriptor attached to every realtime audio chunk.
pub const PCM_INPUT_MIME_TYPE: &str = "audio/pcm;bits=16;rate=16000";

/// Sample rate the endpoint expects for realtime input.
pub const INPUT_SAMPLE_RATE_HZ: u32 = 16000;
/// Sample rate of the PCM audio the endpoint streams back.
pub const OUTPUT_SAMPLE_RATE_HZ: u32 = 24000;

/// Prebuilt voices. Anything else is carried through as `Custom`.
#[derive(Debug, Clone, PartialEq)]
pub enum Voice {
    Puck,
    Charon,
    Kore,
    Fenrir,
    Aoede,
    Custom(String),
}

impl Serialize for Voice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Voice::Puck => serializer.serialize_str("Puck"),
            Voice::Charon => serializer.serialize_str("Charon"),
            Voice::Kore => serializer.serialize_str("Kore"),
            Voice::Fenrir => serializer.serialize_str("Fenrir"),
            Voice::Aoede => serializer.serialize_str("Aoede"),
            Voice::Custom(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Voice {
    fn from(s: &str) -> Self {
        match s {
            "Puck" => Voice::Puck,
            "Charon" => Voice::Charon,
            "Kore" => Voice::Kore,
            "Fenrir" => Voice::Fenrir,
            "Aoede" => Voice::Aoede,
            _ => Voice::Custom(s.to_string()),
        }
    }
}

impl FromStr for Voice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Voice::from(s))
    }
}

impl<'de> Deserialize<'de> for Voice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Voice::from(s.as_str()))
    }
}

/// Output modalities a session may request.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Audio,
    Image,
}
