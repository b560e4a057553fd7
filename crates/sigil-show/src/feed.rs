//! Feed Messages
//!
//! Typed payloads of the remote event feed. Transport is handled elsewhere;
//! this module only decodes `(event name, JSON payload)` pairs.

use serde::Deserialize;
use serde_json::Value;

use crate::ShowError;
use crate::library::Sigil;
use crate::state::Percept;

/// PNG attachment, either a bare base64 string or `{ "data": base64 }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PngData {
    Base64(String),
    Object { data: Option<String> },
}

impl PngData {
    /// Base64 body, if non-empty
    pub fn base64(&self) -> Option<&str> {
        let data = match self {
            PngData::Base64(data) => Some(data.as_str()),
            PngData::Object { data } => data.as_deref(),
        };
        data.filter(|d| !d.is_empty())
    }
}

/// `sigil` event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigilMessage {
    pub sigil_phrase: Option<String>,
    pub sigil_code: Option<String>,
    #[serde(default)]
    pub png: Option<PngData>,
}

impl SigilMessage {
    /// Sigil carried by this message
    pub fn sigil(&self) -> Sigil {
        Sigil::new(
            self.sigil_phrase.clone().unwrap_or_default(),
            self.sigil_code.clone().unwrap_or_default(),
        )
    }

    /// Base64 PNG body, if any
    pub fn png_base64(&self) -> Option<&str> {
        self.png.as_ref().and_then(PngData::base64)
    }
}

/// `perceptReceived` event
///
/// Header fields are loosely typed so numeric ids still decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerceptMessage {
    pub session_id: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub timestamp: Option<Value>,
    pub data: Option<PerceptBody>,
}

/// Body of a percept message
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerceptBody {
    pub sigil_phrase: Option<String>,
    /// Drawing script; some producers send structured JSON instead of text
    pub draw_calls: Option<Value>,
    /// Attachment object holding `pngData`; other shapes are ignored
    pub data: Option<Value>,
    /// Older producers put `pngData` directly on the body
    pub png_data: Option<Value>,
}

impl PerceptBody {
    /// Base64 PNG body, preferring the nested attachment
    pub fn png_base64(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|attachment| attachment.get("pngData"))
            .and_then(png_value_base64)
            .or_else(|| self.png_data.as_ref().and_then(png_value_base64))
    }
}

impl PerceptMessage {
    /// Flatten into a [`Percept`]; messages without a body carry no percept
    pub fn percept(&self) -> Option<Percept> {
        let body = self.data.as_ref()?;
        Some(Percept {
            session_id: self.session_id.as_ref().map(value_text),
            kind: self.kind.as_ref().map(value_text),
            timestamp: self.timestamp.as_ref().map(value_text),
            sigil_phrase: body.sigil_phrase.clone(),
            draw_calls: body.draw_calls.as_ref().map(value_text),
            png_base64: body.png_base64().map(str::to_string),
        })
    }
}

/// `phase` event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhaseMessage {
    pub phase: Option<String>,
}

impl PhaseMessage {
    pub fn phase(&self) -> Option<Phase> {
        self.phase
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Phase::from_name)
    }
}

/// Show phase announced by the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Sigil should fade out
    SigilOut,
    /// Buffer time before the next sigil
    Spool,
    Other(String),
}

impl Phase {
    pub fn from_name(name: &str) -> Self {
        match name {
            "SIGILOUT" => Phase::SigilOut,
            "SPOOL" => Phase::Spool,
            other => Phase::Other(other.to_string()),
        }
    }
}

/// `mindMoment` event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMomentMessage {
    pub mind_moment: Option<String>,
    pub sigil_phrase: Option<String>,
}

/// Decoded feed event
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Sigil(SigilMessage),
    Percept(PerceptMessage),
    Phase(PhaseMessage),
    MindMoment(MindMomentMessage),
}

impl FeedEvent {
    /// Decode a payload by event name
    pub fn decode(event: &str, payload: &str) -> Result<Self, ShowError> {
        let decoded = match event {
            "sigil" => FeedEvent::Sigil(serde_json::from_str(payload)?),
            "perceptReceived" => FeedEvent::Percept(serde_json::from_str(payload)?),
            "phase" => FeedEvent::Phase(serde_json::from_str(payload)?),
            "mindMoment" => FeedEvent::MindMoment(serde_json::from_str(payload)?),
            other => return Err(ShowError::UnknownEvent(other.to_string())),
        };
        tracing::trace!("Decoded feed event {}", event);
        Ok(decoded)
    }
}

/// Non-empty base64 from a bare string or a `{ "data": base64 }` object
fn png_value_base64(value: &Value) -> Option<&str> {
    let data = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get("data").and_then(Value::as_str),
        _ => None,
    };
    data.filter(|d| !d.is_empty())
}

/// Strings as-is, anything else re-serialized
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_forms() {
        let payload = r#"{"sigilPhrase": "a", "sigilCode": "c", "png": "AAAA"}"#;
        let bare: SigilMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(bare.png_base64(), Some("AAAA"));

        let payload = r#"{"sigilPhrase": "a", "png": {"data": "BBBB"}}"#;
        let nested: SigilMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(nested.png_base64(), Some("BBBB"));

        let empty: SigilMessage =
            serde_json::from_str(r#"{"sigilPhrase": "a", "png": ""}"#).unwrap();
        assert_eq!(empty.png_base64(), None);
        assert_eq!(empty.sigil().code, "");
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::from_name("SIGILOUT"), Phase::SigilOut);
        assert_eq!(Phase::from_name("SPOOL"), Phase::Spool);
        assert_eq!(Phase::from_name("DREAM"), Phase::Other("DREAM".into()));

        let msg = PhaseMessage { phase: Some(String::new()) };
        assert_eq!(msg.phase(), None);
    }

    #[test]
    fn test_percept_structured_draw_calls() {
        let payload = r#"{
            "sessionId": "s1",
            "type": "visual",
            "timestamp": 1700000000,
            "data": {"sigilPhrase": "light", "drawCalls": ["a", "b"], "data": {"pngData": "CCCC"}}
        }"#;
        let FeedEvent::Percept(msg) = FeedEvent::decode("perceptReceived", payload).unwrap() else {
            panic!("expected percept");
        };
        let percept = msg.percept().unwrap();
        assert_eq!(percept.kind.as_deref(), Some("visual"));
        assert_eq!(percept.timestamp.as_deref(), Some("1700000000"));
        assert_eq!(percept.draw_calls.as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(percept.png_base64.as_deref(), Some("CCCC"));
    }

    #[test]
    fn test_percept_png_on_body() {
        let msg: PerceptMessage =
            serde_json::from_str(r#"{"data": {"sigilPhrase": "p", "pngData": "QUJD"}}"#).unwrap();
        assert_eq!(msg.percept().unwrap().png_base64.as_deref(), Some("QUJD"));

        let payload = r#"{"data": {"pngData": "OLD", "data": {"pngData": "NEW"}}}"#;
        let msg: PerceptMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.percept().unwrap().png_base64.as_deref(), Some("NEW"));

        let payload = r#"{"data": {"pngData": "OLD", "data": {"pngData": ""}}}"#;
        let msg: PerceptMessage = serde_json::from_str(payload).unwrap();
        assert_eq!(msg.percept().unwrap().png_base64.as_deref(), Some("OLD"));
    }

    #[test]
    fn test_percept_loose_shapes() {
        let payload =
            r#"{"sessionId": 42, "type": 7, "data": {"sigilPhrase": "p", "data": "none"}}"#;
        let FeedEvent::Percept(msg) = FeedEvent::decode("perceptReceived", payload).unwrap() else {
            panic!("expected percept");
        };
        let percept = msg.percept().unwrap();
        assert_eq!(percept.session_id.as_deref(), Some("42"));
        assert_eq!(percept.kind.as_deref(), Some("7"));
        assert_eq!(percept.sigil_phrase.as_deref(), Some("p"));
        assert_eq!(percept.png_base64, None);

        let nested_object: PerceptMessage =
            serde_json::from_str(r#"{"data": {"data": {"pngData": {"data": "DDDD"}}}}"#).unwrap();
        assert_eq!(nested_object.percept().unwrap().png_base64.as_deref(), Some("DDDD"));

        let odd_legacy: PerceptMessage =
            serde_json::from_str(r#"{"data": {"sigilPhrase": "p", "pngData": 5}}"#).unwrap();
        assert_eq!(odd_legacy.percept().unwrap().png_base64, None);
    }

    #[test]
    fn test_percept_without_body() {
        let msg: PerceptMessage = serde_json::from_str(r#"{"sessionId": "s1"}"#).unwrap();
        assert!(msg.percept().is_none());
    }

    #[test]
    fn test_unknown_event() {
        assert!(matches!(FeedEvent::decode("bogus", "{}"), Err(ShowError::UnknownEvent(_))));
        assert!(matches!(FeedEvent::decode("phase", "not json"), Err(ShowError::Json(_))));
    }
}
