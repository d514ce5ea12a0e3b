use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const SUCCESS: u32 = 2000;
const SESSION_INVALID: u32 = 4001;
const VALIDATION_ERROR: u32 = 4013;
const RECORD_NOT_FOUND: u32 = 5028;
const ZONE_NOT_FOUND: u32 = 5029;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub hostname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub priority: String,
    pub destination: String,
    pub deleterecord: bool,
    pub state: String,
}

/// Credentials the stand-in accepts.
#[derive(Clone, Debug)]
pub struct Account {
    pub customer_number: u64,
    pub api_key: String,
    pub api_password: String,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            customer_number: 1234,
            api_key: "key".to_string(),
            api_password: "password".to_string(),
        }
    }
}

/// In-memory CCP: one account, its open sessions and its zones.
#[derive(Debug, Default)]
pub struct Ccp {
    account: Account,
    sessions: HashSet<String>,
    zones: HashMap<String, Vec<Record>>,
    next_id: u64,
    requests: Vec<String>,
}

pub type Db = Arc<RwLock<Ccp>>;

#[derive(Serialize)]
struct Envelope {
    serverrequestid: String,
    clientrequestid: String,
    action: String,
    status: &'static str,
    statuscode: u32,
    shortmessage: String,
    longmessage: String,
    responsedata: Value,
}

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    param: Map<String, Value>,
}

/// Handler outcome: payload on success, (code, short, long) on failure.
type Outcome = Result<(&'static str, String, Value), (u32, &'static str, String)>;

impl Ccp {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            next_id: 1,
            ..Self::default()
        }
    }

    /// Seed `domain` with `records`. Later server-assigned ids continue after
    /// the highest numeric id seen.
    pub fn with_zone(mut self, domain: &str, records: Vec<Record>) -> Self {
        for record in &records {
            if let Ok(id) = record.id.parse::<u64>() {
                self.next_id = self.next_id.max(id.saturating_add(1));
            }
        }
        self.zones.insert(domain.to_string(), records);
        self
    }

    pub fn into_db(self) -> Db {
        Arc::new(RwLock::new(self))
    }

    /// Raw bodies of every request received, oldest first.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn has_session(&self, id: &str) -> bool {
        self.sessions.contains(id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop every open session, as the real service does on timeout.
    pub fn expire_sessions(&mut self) {
        self.sessions.clear();
    }

    pub fn zone(&self, domain: &str) -> Option<&[Record]> {
        self.zones.get(domain).map(Vec::as_slice)
    }

    /// Answer one raw request body with a response envelope.
    pub fn handle(&mut self, body: &str) -> Value {
        self.requests.push(body.to_string());

        let request: ActionRequest = match serde_json::from_str(body) {
            Ok(request) => request,
            Err(e) => {
                return envelope(
                    String::new(),
                    Err((VALIDATION_ERROR, "Validation Error.", format!("Invalid request: {e}"))),
                )
            }
        };

        let outcome = self.dispatch(&request);
        envelope(request.action, outcome)
    }

    fn dispatch(&mut self, request: &ActionRequest) -> Outcome {
        let param = &request.param;
        if param.get("customernumber").and_then(Value::as_u64) != Some(self.account.customer_number)
            || param.get("apikey").and_then(Value::as_str) != Some(self.account.api_key.as_str())
        {
            return Err((
                VALIDATION_ERROR,
                "Validation Error.",
                "The customer number or API key is invalid.".to_string(),
            ));
        }

        if request.action == "login" {
            return self.login(param);
        }

        let session = param.get("apisessionid").and_then(Value::as_str).unwrap_or_default();
        if !self.sessions.contains(session) {
            return Err((
                SESSION_INVALID,
                "Api session id in invalid format",
                "The session id is not in a valid format.".to_string(),
            ));
        }

        match request.action.as_str() {
            "logout" => {
                self.sessions.remove(session);
                Ok((
                    "Logout successful",
                    "Session has been terminated successful.".to_string(),
                    json!(""),
                ))
            }
            "infoDnsRecords" => {
                let domain = domain_name(param)?;
                let records = self.zones.get(domain).ok_or_else(|| zone_not_found(domain))?;
                Ok((
                    "DNS records found",
                    "DNS Records for this zone were found.".to_string(),
                    json!({ "dnsrecords": records }),
                ))
            }
            "updateDnsRecords" => self.update_records(param),
            other => Err((
                VALIDATION_ERROR,
                "Validation Error.",
                format!("Unknown action {other}."),
            )),
        }
    }

    fn login(&mut self, param: &Map<String, Value>) -> Outcome {
        let password = param.get("apipassword").and_then(Value::as_str);
        if password != Some(self.account.api_password.as_str()) {
            return Err((
                VALIDATION_ERROR,
                "Login failed.",
                "The login data is invalid.".to_string(),
            ));
        }
        let id = Uuid::new_v4().simple().to_string();
        self.sessions.insert(id.clone());
        Ok((
            "Login successful",
            "Session has been created successful.".to_string(),
            json!({ "apisessionid": id }),
        ))
    }

    /// Apply creations, replacements and deletions all-or-nothing.
    fn update_records(&mut self, param: &Map<String, Value>) -> Outcome {
        let domain = domain_name(param)?;
        let submitted: Vec<Record> = param
            .get("dnsrecordset")
            .and_then(|set| set.get("dnsrecords"))
            .cloned()
            .map(serde_json::from_value::<Vec<Record>>)
            .transpose()
            .map_err(|e| {
                (
                    VALIDATION_ERROR,
                    "Validation Error.",
                    format!("Invalid dnsrecordset: {e}"),
                )
            })?
            .ok_or_else(|| {
                (
                    VALIDATION_ERROR,
                    "Validation Error.",
                    "Missing dnsrecordset.".to_string(),
                )
            })?;

        let mut zone = self.zones.get(domain).cloned().ok_or_else(|| zone_not_found(domain))?;
        let mut next_id = self.next_id;

        for record in submitted {
            if record.id.is_empty() {
                if record.deleterecord {
                    continue;
                }
                zone.push(Record {
                    id: next_id.to_string(),
                    state: "yes".to_string(),
                    ..record
                });
                next_id = next_id.saturating_add(1);
                continue;
            }

            let position = zone.iter().position(|r| r.id == record.id).ok_or_else(|| {
                (
                    RECORD_NOT_FOUND,
                    "DNS record not found.",
                    format!("DNS record {} does not exist in zone {domain}.", record.id),
                )
            })?;
            if record.deleterecord {
                zone.remove(position);
            } else {
                zone[position] = Record {
                    state: "yes".to_string(),
                    ..record
                };
            }
        }

        self.next_id = next_id;
        self.zones.insert(domain.to_string(), zone.clone());
        Ok((
            "DNS records successful updated",
            "The given DNS records for this zone were updated.".to_string(),
            json!({ "dnsrecords": zone }),
        ))
    }
}

fn domain_name(param: &Map<String, Value>) -> Result<&str, (u32, &'static str, String)> {
    param
        .get("domainname")
        .and_then(Value::as_str)
        .ok_or_else(|| (VALIDATION_ERROR, "Validation Error.", "Missing domainname.".to_string()))
}

fn zone_not_found(domain: &str) -> (u32, &'static str, String) {
    (
        ZONE_NOT_FOUND,
        "Can not get DNS records for zone.",
        format!("Zone {domain} not found."),
    )
}

fn envelope(action: String, outcome: Outcome) -> Value {
    let envelope = match outcome {
        Ok((short, long, data)) => Envelope {
            serverrequestid: Uuid::new_v4().simple().to_string(),
            clientrequestid: String::new(),
            action,
            status: "success",
            statuscode: SUCCESS,
            shortmessage: short.to_string(),
            longmessage: long,
            responsedata: data,
        },
        Err((code, short, long)) => Envelope {
            serverrequestid: Uuid::new_v4().simple().to_string(),
            clientrequestid: String::new(),
            action,
            status: "error",
            statuscode: code,
            shortmessage: short.to_string(),
            longmessage: long,
            responsedata: json!(""),
        },
    };
    json!(envelope)
}

pub fn app(db: Db) -> Router {
    Router::new().route("/", post(endpoint)).with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

async fn endpoint(State(db): State<Db>, body: String) -> Json<Value> {
    Json(db.write().await.handle(&body))
}
