//! Mock backend API server for testing
//!
//! This module provides a mock HTTP server that simulates the remote
//! backend, allowing the auth and transaction flows to be tested without a
//! real deployment.
//!
//! The mock implements the same surface the real backend exposes:
//! - POST /auth/signup, POST /auth/token?grant_type=password,
//!   POST /auth/logout, GET /auth/user
//! - GET/POST on /income and /expanse, PATCH/DELETE with id=eq. filters
//!
//! Records live in memory behind a mutex, so POST/PATCH/DELETE followed by
//! a GET behaves like the real store. It doubles as the "purely in-memory"
//! variant of the transaction layer: a test stub, nothing more.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::domain::TransactionKind;

/// Access token the mock hands out and accepts
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

/// The one user the mock knows about
pub const MOCK_USER_ID: &str = "user-1";

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Password grant responds 400
    pub fail_auth: bool,
    /// Password grant responds 200 but without an access_token
    pub omit_access_token: bool,
    /// Password grant responds 200 but without a user
    pub omit_user: bool,
    /// Logout responds 500
    pub fail_logout: bool,
    /// GET /auth/user responds 401 regardless of token
    pub fail_get_user: bool,
    /// GET /income responds 500
    pub fail_income: bool,
    /// GET /expanse responds 500
    pub fail_expense: bool,
}

/// A record held by the mock store
#[derive(Debug, Clone)]
pub struct SeedRecord {
    pub kind: TransactionKind,
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    /// RFC3339
    pub date: String,
    /// RFC3339
    pub created_at: String,
}

impl SeedRecord {
    pub fn income(id: &str, amount: f64, description: &str, category: &str, created_at: &str) -> Self {
        Self {
            kind: TransactionKind::Income,
            id: id.to_string(),
            user_id: MOCK_USER_ID.to_string(),
            amount,
            description: description.to_string(),
            category: category.to_string(),
            date: created_at.to_string(),
            created_at: created_at.to_string(),
        }
    }

    pub fn expense(id: &str, amount: f64, description: &str, category: &str, created_at: &str) -> Self {
        Self {
            kind: TransactionKind::Expense,
            ..Self::income(id, amount, description, category, created_at)
        }
    }

    fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "userId": self.user_id,
            "amount": self.amount,
            "description": self.description,
            "category": self.category,
            "date": self.date,
            "created_at": self.created_at,
        })
    }
}

/// Mock backend server for testing
pub struct MockApiServer {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
    records: Arc<Mutex<Vec<SeedRecord>>>,
    hits: Arc<AtomicUsize>,
}

impl MockApiServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let records: Arc<Mutex<Vec<SeedRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));

        let running_clone = running.clone();
        let records_clone = records.clone();
        let hits_clone = hits.clone();

        // Non-blocking accept so the server can shut down cleanly
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        hits_clone.fetch_add(1, Ordering::SeqCst);
                        let cfg = config.clone();
                        let recs = records_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &recs);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            thread_handle: Some(thread_handle),
            records,
            hits,
        })
    }

    /// Base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Add a record to the mock store
    pub fn seed(&self, record: SeedRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Number of requests the server has accepted
    pub fn request_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Snapshot of the records currently held
    pub fn records(&self) -> Vec<SeedRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Request handling
// =============================================================================

fn handle_connection(
    mut stream: TcpStream,
    config: &MockConfig,
    records: &Arc<Mutex<Vec<SeedRecord>>>,
) {
    let request = match read_request(&mut stream) {
        Some(request) => request,
        None => return,
    };

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"msg": "Invalid request"}"#);
        return;
    }

    let method = parts[0];
    let path = parts[1];
    let path_only = path.split('?').next().unwrap_or(path);
    let query = path.splitn(2, '?').nth(1).unwrap_or("");
    let body = request.split("\r\n\r\n").nth(1).unwrap_or("");
    let has_bearer = request
        .lines()
        .any(|l| l.to_lowercase().starts_with("authorization:") && l.contains(MOCK_ACCESS_TOKEN));

    match (method, path_only) {
        ("POST", "/auth/signup") => {
            let email = json_field(body, "email").unwrap_or_default();
            let response = json!({ "id": Uuid::new_v4().to_string(), "email": email });
            send_response(&mut stream, 200, "OK", &response.to_string());
        }
        ("POST", "/auth/token") => handle_token(&mut stream, config, body),
        ("POST", "/auth/logout") => {
            if config.fail_logout {
                send_response(&mut stream, 500, "Internal Server Error", r#"{"msg": "logout failed"}"#);
            } else {
                send_response(&mut stream, 204, "No Content", "");
            }
        }
        ("GET", "/auth/user") => {
            if config.fail_get_user || !has_bearer {
                send_response(&mut stream, 401, "Unauthorized", r#"{"msg": "invalid JWT"}"#);
            } else {
                let user = json!({ "id": MOCK_USER_ID, "email": "user@example.com" });
                send_response(&mut stream, 200, "OK", &user.to_string());
            }
        }
        (_, "/income") => handle_collection(&mut stream, config, records, TransactionKind::Income, method, query, body),
        (_, "/expanse") => handle_collection(&mut stream, config, records, TransactionKind::Expense, method, query, body),
        _ => {
            send_response(&mut stream, 404, "Not Found", r#"{"msg": "Endpoint not found"}"#);
        }
    }
}

fn handle_token(stream: &mut TcpStream, config: &MockConfig, body: &str) {
    if config.fail_auth {
        send_response(
            stream,
            400,
            "Bad Request",
            r#"{"error_description": "Invalid login credentials"}"#,
        );
        return;
    }

    let email = json_field(body, "email").unwrap_or_else(|| "user@example.com".to_string());
    let mut response = json!({
        "refresh_token": "mock-refresh-token",
        "expires_at": 4_102_444_800i64,
    });
    if !config.omit_access_token {
        response["access_token"] = json!(MOCK_ACCESS_TOKEN);
    }
    if !config.omit_user {
        response["user"] = json!({ "id": MOCK_USER_ID, "email": email });
    }
    send_response(stream, 200, "OK", &response.to_string());
}

fn handle_collection(
    stream: &mut TcpStream,
    config: &MockConfig,
    records: &Arc<Mutex<Vec<SeedRecord>>>,
    kind: TransactionKind,
    method: &str,
    query: &str,
    body: &str,
) {
    let failed = match kind {
        TransactionKind::Income => config.fail_income,
        TransactionKind::Expense => config.fail_expense,
    };

    match method {
        "GET" => {
            if failed {
                send_response(stream, 500, "Internal Server Error", r#"{"message": "internal error"}"#);
                return;
            }
            let user_filter = query_filter(query, "userId");
            let mut matching: Vec<SeedRecord> = records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.kind == kind)
                .filter(|r| user_filter.as_deref().map_or(true, |u| r.user_id == u))
                .cloned()
                .collect();
            // order=created_at.desc
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let body: Vec<JsonValue> = matching.iter().map(|r| r.to_json()).collect();
            send_response(stream, 200, "OK", &JsonValue::Array(body).to_string());
        }
        "POST" => {
            let parsed: JsonValue = match serde_json::from_str(body) {
                Ok(v) => v,
                Err(_) => {
                    send_response(stream, 400, "Bad Request", r#"{"message": "invalid body"}"#);
                    return;
                }
            };
            let record = SeedRecord {
                kind,
                id: Uuid::new_v4().to_string(),
                user_id: parsed["userId"].as_str().unwrap_or_default().to_string(),
                amount: json_amount(&parsed["amount"]),
                description: parsed["description"].as_str().unwrap_or_default().to_string(),
                category: parsed["category"].as_str().unwrap_or_default().to_string(),
                date: parsed["date"].as_str().unwrap_or_default().to_string(),
                created_at: parsed["created_at"].as_str().unwrap_or_default().to_string(),
            };
            records.lock().unwrap().push(record);
            send_response(stream, 201, "Created", "");
        }
        "PATCH" => {
            let id = match query_filter(query, "id") {
                Some(id) => id,
                None => {
                    send_response(stream, 400, "Bad Request", r#"{"message": "missing id filter"}"#);
                    return;
                }
            };
            let parsed: JsonValue = serde_json::from_str(body).unwrap_or(JsonValue::Null);
            let mut store = records.lock().unwrap();
            match store.iter_mut().find(|r| r.kind == kind && r.id == id) {
                Some(record) => {
                    if let Some(amount) = parsed.get("amount") {
                        record.amount = json_amount(amount);
                    }
                    if let Some(desc) = parsed.get("description").and_then(|v| v.as_str()) {
                        record.description = desc.to_string();
                    }
                    if let Some(cat) = parsed.get("category").and_then(|v| v.as_str()) {
                        record.category = cat.to_string();
                    }
                    send_response(stream, 204, "No Content", "");
                }
                None => {
                    send_response(stream, 404, "Not Found", r#"{"message": "record not found"}"#);
                }
            }
        }
        "DELETE" => {
            let id = match query_filter(query, "id") {
                Some(id) => id,
                None => {
                    send_response(stream, 400, "Bad Request", r#"{"message": "missing id filter"}"#);
                    return;
                }
            };
            let mut store = records.lock().unwrap();
            let before = store.len();
            store.retain(|r| !(r.kind == kind && r.id == id));
            if store.len() < before {
                send_response(stream, 204, "No Content", "");
            } else {
                send_response(stream, 404, "Not Found", r#"{"message": "record not found"}"#);
            }
        }
        _ => {
            send_response(stream, 405, "Method Not Allowed", r#"{"msg": "Method not allowed"}"#);
        }
    }
}

// =============================================================================
// HTTP plumbing
// =============================================================================

/// Read headers plus a Content-Length body from the stream
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text
                .lines()
                .find(|l| l.to_lowercase().starts_with("content-length:"))
                .and_then(|l| l.split(':').nth(1))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buffer.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    if buffer.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&buffer).to_string())
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    // Connection: close keeps the client from reusing a dead pooled socket
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// Extract `<name>=eq.<value>` from a query string
fn query_filter(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?;
        let value = parts.next()?;
        if key == name {
            value.strip_prefix("eq.").map(str::to_string)
        } else {
            None
        }
    })
}

/// Pull a string field out of a JSON body without failing the request
fn json_field(body: &str, name: &str) -> Option<String> {
    serde_json::from_str::<JsonValue>(body)
        .ok()?
        .get(name)?
        .as_str()
        .map(str::to_string)
}

fn json_amount(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rest::ApiClient;

    #[test]
    fn test_mock_server_starts() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
    }

    #[test]
    fn test_password_grant_against_mock() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();

        let (session, user) = client.password_grant("user@example.com", "hunter2").unwrap();
        assert_eq!(session.access_token, MOCK_ACCESS_TOKEN);
        assert_eq!(user.id, MOCK_USER_ID);
    }

    #[test]
    fn test_password_grant_rejected() {
        let server = MockApiServer::start(MockConfig {
            fail_auth: true,
            ..Default::default()
        })
        .unwrap();
        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();

        let err = client.password_grant("user@example.com", "wrong").unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));
    }

    #[test]
    fn test_grant_missing_token_is_failure() {
        let server = MockApiServer::start(MockConfig {
            omit_access_token: true,
            ..Default::default()
        })
        .unwrap();
        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();

        let err = client.password_grant("user@example.com", "hunter2").unwrap_err();
        assert!(err.to_string().contains("Invalid response"));
    }

    #[test]
    fn test_get_user_requires_token() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();

        assert!(client.get_user("garbage-token").is_err());
        let user = client.get_user(MOCK_ACCESS_TOKEN).unwrap();
        assert_eq!(user.id, MOCK_USER_ID);
    }

    #[test]
    fn test_list_records_filters_and_orders() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        server.seed(SeedRecord::income("a", 100.0, "Old", "salary", "2025-01-01T00:00:00Z"));
        server.seed(SeedRecord::income("b", 200.0, "New", "salary", "2025-03-01T00:00:00Z"));
        server.seed(SeedRecord {
            user_id: "someone-else".to_string(),
            ..SeedRecord::income("c", 300.0, "Other", "salary", "2025-02-01T00:00:00Z")
        });

        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();
        let records = client
            .list_records(TransactionKind::Income, MOCK_USER_ID, None)
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "b");
        assert_eq!(records[1].id, "a");
    }

    #[test]
    fn test_patch_unknown_id_is_404() {
        let server = MockApiServer::start(MockConfig::default()).unwrap();
        let client = ApiClient::new(&server.base_url(), "test-key").unwrap();

        let patch = crate::domain::TransactionPatch {
            amount: Some(rust_decimal::Decimal::new(20000, 2)),
            ..Default::default()
        };
        let err = client
            .update_record(TransactionKind::Income, "tx-unknown", &patch, None)
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
