//! Session-holding client for the netcup CCP API.
//!
//! # Design
//! `NetcupClient` owns the account identity, the current `Session`, the last
//! record list it fetched, and a `Transport`. Every operation goes through
//! `dispatch`, which builds the authenticated envelope (`build_request`),
//! runs it through the transport, and unwraps the response envelope
//! (`parse_response`). The raw `responsedata` is decoded by the operation
//! that knows its shape.
//!
//! Operations that change client state take `&mut self`. A client is meant
//! to be driven from one place at a time; share it behind a lock if needed.

use std::fmt;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_ENDPOINT};
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::log_sanitizer::truncate_for_log;
use crate::types::{Record, RequestEnvelope, ResponseEnvelope, Session};

const ACTION_LOGIN: &str = "login";
const ACTION_LOGOUT: &str = "logout";
const ACTION_INFO_DNS_RECORDS: &str = "infoDnsRecords";
const ACTION_UPDATE_DNS_RECORDS: &str = "updateDnsRecords";

#[derive(Serialize)]
struct LoginParam<'a> {
    #[serde(rename = "apipassword")]
    api_password: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    #[serde(rename = "apisessionid")]
    api_session_id: String,
}

#[derive(Serialize)]
struct DomainParam<'a> {
    #[serde(rename = "domainname")]
    domain_name: &'a str,
}

#[derive(Serialize)]
struct UpdateRecordsParam<'a> {
    #[serde(rename = "domainname")]
    domain_name: &'a str,
    #[serde(rename = "dnsrecordset")]
    record_set: RecordSet<'a>,
}

#[derive(Serialize)]
struct RecordSet<'a> {
    #[serde(rename = "dnsrecords")]
    records: &'a [Record],
}

#[derive(Deserialize)]
struct RecordsData {
    #[serde(rename = "dnsrecords")]
    records: Vec<Record>,
}

/// Blocking client for the CCP DNS API.
pub struct NetcupClient<T = UreqTransport> {
    customer_number: u64,
    api_key: String,
    session: Session,
    endpoint: String,
    transport: T,
    records: Vec<Record>,
}

impl NetcupClient<UreqTransport> {
    /// Client for the production endpoint. Does no I/O.
    pub fn new(customer_number: u64, api_key: &str) -> Self {
        Self::with_transport(customer_number, api_key, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_transport(
            config.customer_number,
            &config.api_key,
            UreqTransport::with_timeout(config.timeout()),
        )
        .with_endpoint(&config.endpoint)
    }
}

impl<T: Transport> NetcupClient<T> {
    pub fn with_transport(customer_number: u64, api_key: &str, transport: T) -> Self {
        Self {
            customer_number,
            api_key: api_key.to_string(),
            session: Session::Unauthenticated,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            transport,
            records: Vec::new(),
        }
    }

    /// Point the client at another endpoint, e.g. a local stand-in server.
    /// The URL is used verbatim.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn customer_number(&self) -> u64 {
        self.customer_number
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, Session::Authenticated { .. })
    }

    /// Records from the last successful `get_records` or `update_records`.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open a session. Must precede every other operation.
    pub fn login(&mut self, api_password: &str) -> Result<()> {
        let param = LoginParam { api_password };
        let raw = self.dispatch(ACTION_LOGIN, Some(&param))?;
        let data: LoginData = decode_payload(ACTION_LOGIN, raw)?;
        if data.api_session_id.is_empty() {
            return Err(ApiError::DeserializationError(
                "\"login\" response has an empty apisessionid".to_string(),
            ));
        }

        self.session = Session::Authenticated {
            id: data.api_session_id,
        };
        debug!("[ccp] session opened for customer {}", self.customer_number);
        Ok(())
    }

    /// Close the session. The response payload is not inspected.
    pub fn logout(&mut self) -> Result<()> {
        let raw = self.dispatch::<()>(ACTION_LOGOUT, None)?;
        if let Some(raw) = raw.filter(|r| r.get() != "\"\"") {
            debug!("[ccp] ignoring logout payload: {}", truncate_for_log(raw.get()));
        }

        self.session = Session::Unauthenticated;
        debug!("[ccp] session closed for customer {}", self.customer_number);
        Ok(())
    }

    /// Fetch every record of `domain_name`, in server order.
    pub fn get_records(&mut self, domain_name: &str) -> Result<Vec<Record>> {
        let param = DomainParam { domain_name };
        let raw = self.dispatch(ACTION_INFO_DNS_RECORDS, Some(&param))?;
        let data: RecordsData = decode_payload(ACTION_INFO_DNS_RECORDS, raw)?;

        self.records = data.records.clone();
        Ok(data.records)
    }

    /// Submit `records` for `domain_name` and return the zone as the server
    /// holds it afterwards.
    ///
    /// Records with an empty id are created, records flagged with
    /// `delete_record` are removed, others are replaced by id.
    pub fn update_records(
        &mut self,
        domain_name: &str,
        records: &[Record],
    ) -> Result<Vec<Record>> {
        let param = UpdateRecordsParam {
            domain_name,
            record_set: RecordSet { records },
        };
        let raw = self.dispatch(ACTION_UPDATE_DNS_RECORDS, Some(&param))?;
        let data: RecordsData = decode_payload(ACTION_UPDATE_DNS_RECORDS, raw)?;

        self.records = data.records.clone();
        Ok(data.records)
    }

    /// Build the authenticated POST for `action` without sending it.
    ///
    /// `param` must serialize to a JSON object; its keys are merged with
    /// `customernumber`, `apikey` and, when a session is held, `apisessionid`.
    pub fn build_request<P>(&self, action: &str, param: Option<&P>) -> Result<HttpRequest>
    where
        P: Serialize + ?Sized,
    {
        let mut map = match param {
            None => serde_json::Map::new(),
            Some(param) => match serde_json::to_value(param) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(ApiError::SerializationError(format!(
                        "parameter for \"{action}\" must be a JSON object, got {other}"
                    )))
                }
                Err(e) => return Err(ApiError::SerializationError(e.to_string())),
            },
        };

        map.insert("customernumber".to_string(), Value::from(self.customer_number));
        map.insert("apikey".to_string(), Value::from(self.api_key.as_str()));
        if let Some(id) = self.session.id() {
            map.insert("apisessionid".to_string(), Value::from(id));
        }

        let envelope = RequestEnvelope { action, param: map };
        let body = serde_json::to_string(&envelope)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    fn dispatch<P>(&self, action: &str, param: Option<&P>) -> Result<Option<Box<RawValue>>>
    where
        P: Serialize + ?Sized,
    {
        if action != ACTION_LOGIN && !self.is_authenticated() {
            return Err(ApiError::NotAuthenticated);
        }

        let request = self.build_request(action, param)?;
        debug!("[ccp] POST {action}");
        let response = self.transport.execute(request)?;
        parse_response(action, response)
    }
}

impl<T> fmt::Debug for NetcupClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetcupClient")
            .field("customer_number", &self.customer_number)
            .field("endpoint", &self.endpoint)
            .field("authenticated", &matches!(self.session, Session::Authenticated { .. }))
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// Unwrap the response envelope for `action`, returning its raw payload.
///
/// Fails with `Rejected` unless the status code is exactly 2000.
pub fn parse_response(action: &str, response: HttpResponse) -> Result<Option<Box<RawValue>>> {
    debug!(
        "[ccp] {action} answered HTTP {} ({} bytes)",
        response.status,
        response.body.len()
    );

    let envelope: ResponseEnvelope = serde_json::from_str(&response.body).map_err(|e| {
        debug!("[ccp] undecodable {action} response: {}", truncate_for_log(&response.body));
        ApiError::DeserializationError(e.to_string())
    })?;

    if !envelope.is_success() {
        warn!(
            "[ccp] {action} rejected with status {} ({})",
            envelope.status_code, envelope.short_message
        );
        return Err(ApiError::Rejected {
            action: action.to_string(),
            status_code: envelope.status_code,
            message: envelope.long_message,
        });
    }

    Ok(envelope.response_data)
}

fn decode_payload<D: DeserializeOwned>(action: &str, raw: Option<Box<RawValue>>) -> Result<D> {
    let raw = raw.ok_or_else(|| {
        ApiError::DeserializationError(format!("\"{action}\" response has no responsedata"))
    })?;
    serde_json::from_str(raw.get()).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
