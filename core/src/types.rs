//! Wire types for the CCP JSON API.
//!
//! # Design
//! `Record` mirrors the remote schema exactly: all seven fields are always
//! serialized, even when empty, because the service expects every key.
//! Decoding is lenient: fields the server leaves out take their empty value.
//! The response envelope keeps `responsedata` as an undecoded `RawValue`;
//! each client operation decodes it into its own payload shape.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

/// A DNS resource record as modeled by the CCP service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Record {
    /// Server-assigned id; empty for records not created yet.
    pub id: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Numeric value sent as a string, e.g. `"10"` for MX.
    pub priority: String,
    pub destination: String,
    #[serde(rename = "deleterecord")]
    pub delete_record: bool,
    pub state: String,
}

impl Record {
    /// A record that does not exist on the server yet.
    pub fn new(hostname: &str, record_type: &str, destination: &str) -> Self {
        Self {
            id: String::new(),
            hostname: hostname.to_string(),
            record_type: record_type.to_string(),
            priority: "0".to_string(),
            destination: destination.to_string(),
            delete_record: false,
            state: String::new(),
        }
    }

    /// A copy of this record flagged for removal by `updateDnsRecords`.
    pub fn marked_for_deletion(&self) -> Self {
        Self {
            delete_record: true,
            ..self.clone()
        }
    }
}

/// Authentication state of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated { id: String },
}

impl Session {
    pub fn id(&self) -> Option<&str> {
        match self {
            Session::Unauthenticated => None,
            Session::Authenticated { id } => Some(id),
        }
    }
}

/// Outer body of every request: `{"action": ..., "param": {...}}`.
#[derive(Debug, Serialize)]
pub(crate) struct RequestEnvelope<'a> {
    pub action: &'a str,
    pub param: Map<String, Value>,
}

/// Outer body of every response.
///
/// Missing fields fall back to defaults; a missing `statuscode` therefore
/// reads as 0 and is treated as a failure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
    #[serde(rename = "serverrequestid")]
    pub server_request_id: String,
    #[serde(rename = "clientrequestid")]
    pub client_request_id: String,
    pub action: String,
    pub status: String,
    #[serde(rename = "statuscode")]
    pub status_code: i64,
    #[serde(rename = "shortmessage")]
    pub short_message: String,
    #[serde(rename = "longmessage")]
    pub long_message: String,
    #[serde(rename = "responsedata")]
    pub response_data: Option<Box<RawValue>>,
}

impl ResponseEnvelope {
    pub const SUCCESS: i64 = 2000;

    pub fn is_success(&self) -> bool {
        self.status_code == Self::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_every_field() {
        let record = Record::new("@", "TXT", "test");
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["deleterecord", "destination", "hostname", "id", "priority", "state", "type"]
        );
        assert_eq!(json["id"], "");
        assert_eq!(json["type"], "TXT");
        assert_eq!(json["deleterecord"], false);
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = Record {
            id: "123452".to_string(),
            hostname: "@".to_string(),
            record_type: "MX".to_string(),
            priority: "10".to_string(),
            destination: "mail.example.com".to_string(),
            delete_record: true,
            state: "yes".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_missing_fields_decode_to_defaults() {
        let record: Record = serde_json::from_str(
            r#"{"id":"1","hostname":"@","type":"A","destination":"127.0.0.1"}"#,
        )
        .unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(record.record_type, "A");
        assert_eq!(record.priority, "");
        assert!(!record.delete_record);
        assert_eq!(record.state, "");
    }

    #[test]
    fn marked_for_deletion_keeps_other_fields() {
        let record = Record::new("www", "CNAME", "@");
        let doomed = record.marked_for_deletion();
        assert!(doomed.delete_record);
        assert_eq!(doomed.hostname, "www");
        assert!(!record.delete_record);
    }

    #[test]
    fn session_id_only_when_authenticated() {
        assert_eq!(Session::default().id(), None);
        let session = Session::Authenticated { id: "abc".to_string() };
        assert_eq!(session.id(), Some("abc"));
    }

    #[test]
    fn envelope_keeps_response_data_raw() {
        let envelope: ResponseEnvelope = serde_json::from_str(
            r#"{"action":"login","status":"success","statuscode":2000,"responsedata":{"apisessionid":"x"}}"#,
        )
        .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.response_data.unwrap().get(), r#"{"apisessionid":"x"}"#);
        assert!(envelope.long_message.is_empty());
    }

    #[test]
    fn envelope_without_status_code_is_not_success() {
        let envelope: ResponseEnvelope = serde_json::from_str("{}").unwrap();
        assert!(!envelope.is_success());
        assert!(envelope.response_data.is_none());
    }
}
