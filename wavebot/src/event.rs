//! The closed catalog of event types and the inbound event shape.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returned when a string does not name a member of the event catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event: {0}")]
pub struct UnknownEventType(pub String);

/// Every kind of occurrence a robot may be asked to handle.
///
/// The set is closed: handlers can only ever be registered against one of
/// these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    WaveletBlipCreated,
    WaveletBlipRemoved,
    WaveletParticipantsChanged,
    WaveletSelfAdded,
    WaveletSelfRemoved,
    WaveletTimestampChanged,
    WaveletTitleChanged,
    WaveletVersionChanged,
    BlipContributorsChanged,
    BlipDeleted,
    BlipSubmitted,
    BlipTimestampChanged,
    BlipVersionChanged,
    DocumentChanged,
    FormButtonClicked,
}

impl EventType {
    /// The full catalog, in declaration order.
    pub const ALL: [EventType; 15] = [
        EventType::WaveletBlipCreated,
        EventType::WaveletBlipRemoved,
        EventType::WaveletParticipantsChanged,
        EventType::WaveletSelfAdded,
        EventType::WaveletSelfRemoved,
        EventType::WaveletTimestampChanged,
        EventType::WaveletTitleChanged,
        EventType::WaveletVersionChanged,
        EventType::BlipContributorsChanged,
        EventType::BlipDeleted,
        EventType::BlipSubmitted,
        EventType::BlipTimestampChanged,
        EventType::BlipVersionChanged,
        EventType::DocumentChanged,
        EventType::FormButtonClicked,
    ];

    /// The identifier used on the wire, e.g. `BLIP_SUBMITTED`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventType::WaveletBlipCreated => "WAVELET_BLIP_CREATED",
            EventType::WaveletBlipRemoved => "WAVELET_BLIP_REMOVED",
            EventType::WaveletParticipantsChanged => "WAVELET_PARTICIPANTS_CHANGED",
            EventType::WaveletSelfAdded => "WAVELET_SELF_ADDED",
            EventType::WaveletSelfRemoved => "WAVELET_SELF_REMOVED",
            EventType::WaveletTimestampChanged => "WAVELET_TIMESTAMP_CHANGED",
            EventType::WaveletTitleChanged => "WAVELET_TITLE_CHANGED",
            EventType::WaveletVersionChanged => "WAVELET_VERSION_CHANGED",
            EventType::BlipContributorsChanged => "BLIP_CONTRIBUTORS_CHANGED",
            EventType::BlipDeleted => "BLIP_DELETED",
            EventType::BlipSubmitted => "BLIP_SUBMITTED",
            EventType::BlipTimestampChanged => "BLIP_TIMESTAMP_CHANGED",
            EventType::BlipVersionChanged => "BLIP_VERSION_CHANGED",
            EventType::DocumentChanged => "DOCUMENT_CHANGED",
            EventType::FormButtonClicked => "FORM_BUTTON_CLICKED",
        }
    }

    /// The capability name that handles this event by convention: the
    /// identifier lower-cased, e.g. `blip_submitted`.
    pub fn handler_name(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// An inbound event, already decoded by the transport layer.
///
/// Only `event_type` is meaningful to dispatch. It is kept as the raw
/// delivered string so that types outside the catalog still reach the
/// dispatcher, which ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: None,
            modified_by: None,
            properties: serde_json::Map::new(),
        }
    }

    pub fn modified_by(mut self, participant: impl Into<String>) -> Self {
        self.modified_by = Some(participant.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Resolve the raw type against the catalog.
    pub fn kind(&self) -> Option<EventType> {
        self.event_type.parse().ok()
    }
}

impl From<EventType> for Event {
    fn from(event_type: EventType) -> Self {
        Event::new(event_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_identifiers_parse_back() {
        for event_type in EventType::ALL {
            assert_eq!(event_type.as_str().parse::<EventType>(), Ok(event_type));
        }
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        assert_eq!(
            "NOT_A_TYPE".parse::<EventType>(),
            Err(UnknownEventType("NOT_A_TYPE".to_string()))
        );
        // Matching is exact, the convention name is not an identifier.
        assert!("blip_submitted".parse::<EventType>().is_err());
    }

    #[test]
    fn test_handler_name_is_lowercased_identifier() {
        assert_eq!(EventType::BlipSubmitted.handler_name(), "blip_submitted");
        assert_eq!(
            EventType::WaveletParticipantsChanged.handler_name(),
            "wavelet_participants_changed"
        );
    }

    #[test]
    fn test_event_decodes_from_wire_json() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "type": "DOCUMENT_CHANGED",
            "modifiedBy": "alice@example.com",
            "timestamp": "2009-10-01T12:00:00Z",
            "properties": { "blipId": "b+1" }
        }))
        .unwrap();

        assert_eq!(event.kind(), Some(EventType::DocumentChanged));
        assert_eq!(event.modified_by.as_deref(), Some("alice@example.com"));
        assert!(event.timestamp.is_some());
        assert_eq!(event.properties["blipId"], "b+1");
    }

    #[test]
    fn test_event_with_unknown_type_still_decodes() {
        let event: Event = serde_json::from_str(r#"{"type":"SOMETHING_NEW"}"#).unwrap();
        assert_eq!(event.event_type, "SOMETHING_NEW");
        assert_eq!(event.kind(), None);
        assert!(event.properties.is_empty());
    }

    #[test]
    fn test_event_type_serializes_as_identifier() {
        let json = serde_json::to_string(&EventType::FormButtonClicked).unwrap();
        assert_eq!(json, "\"FORM_BUTTON_CLICKED\"");
    }
}
