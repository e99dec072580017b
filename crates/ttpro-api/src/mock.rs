//! In-memory mock of the remote service
//!
//! Behaves like a small TestTrack server: accounts, cookie-based sessions,
//! per-record edit locks, and a journal of every call received. Tests drive
//! the client layers against it and assert on the journal.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use crate::transport::methods;
use crate::{Fault, Result, SoapTransport};

/// One recorded RPC, cookie included
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone)]
struct Account {
    project: String,
    username: String,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    /// cookie -> project the session is logged into
    sessions: HashMap<String, String>,
    /// (table, record id) -> payload
    records: HashMap<(String, i64), Value>,
    /// (table, record id) -> cookie holding the edit lock
    locks: HashMap<(String, i64), String>,
    /// records locked by "someone else" (no cookie of ours)
    foreign_locks: Vec<(String, i64)>,
    calls: Vec<Call>,
    /// method -> fault to return on its next invocation
    fail_next: HashMap<String, Fault>,
}

pub struct MockServer {
    state: RwLock<State>,
}

impl MockServer {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Create a server with a single valid account
    pub fn with_account(project: &str, username: &str, password: &str) -> Self {
        let server = Self::new();
        server.add_account(project, username, password);
        server
    }

    pub fn add_account(&self, project: &str, username: &str, password: &str) {
        self.state.write().accounts.push(Account {
            project: project.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    /// Seed an entity record. The payload should carry its `recordid`.
    pub fn insert_record(&self, table: &str, record_id: i64, payload: Value) {
        self.state
            .write()
            .records
            .insert((table.to_string(), record_id), payload);
    }

    /// Current stored payload for a record
    pub fn record(&self, table: &str, record_id: i64) -> Option<Value> {
        self.state
            .read()
            .records
            .get(&(table.to_string(), record_id))
            .cloned()
    }

    /// Mark a record as edit-locked by another session
    pub fn hold_foreign_lock(&self, table: &str, record_id: i64) {
        self.state
            .write()
            .foreign_locks
            .push((table.to_string(), record_id));
    }

    pub fn release_foreign_lock(&self, table: &str, record_id: i64) {
        let key = (table.to_string(), record_id);
        self.state.write().foreign_locks.retain(|k| *k != key);
    }

    /// Whether any session currently holds the record's edit lock
    pub fn lock_held(&self, table: &str, record_id: i64) -> bool {
        let key = (table.to_string(), record_id);
        let state = self.state.read();
        state.locks.contains_key(&key) || state.foreign_locks.contains(&key)
    }

    /// Make the next invocation of `method` return `fault`
    pub fn fail_once(&self, method: &str, fault: Fault) {
        self.state.write().fail_next.insert(method.to_string(), fault);
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.read().calls.clone()
    }

    /// How many times `method` was invoked
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .read()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Number of live (logged-in) sessions
    pub fn session_count(&self) -> usize {
        self.state.read().sessions.len()
    }

    fn dispatch(&self, method: &str, args: &[Value]) -> Result<Value> {
        let mut state = self.state.write();

        state.calls.push(Call {
            method: method.to_string(),
            args: args.to_vec(),
        });

        if let Some(fault) = state.fail_next.remove(method) {
            return Err(fault);
        }

        match method {
            methods::DATABASE_LOGON => {
                let project = str_arg(args, 0)?;
                let username = str_arg(args, 1)?;
                let password = str_arg(args, 2)?;

                if !state.accounts.iter().any(|a| {
                    a.project == project && a.username == username && a.password == password
                }) {
                    return Err(Fault::Auth {
                        message: "Invalid username or password.".to_string(),
                    });
                }

                let cookie = Uuid::new_v4().to_string();
                state.sessions.insert(cookie.clone(), project.to_string());
                tracing::debug!(project = %project, "mock: session opened");
                Ok(Value::String(cookie))
            }
            methods::DATABASE_LOGOFF => {
                let cookie = str_arg(args, 0)?;
                if state.sessions.remove(cookie).is_none() {
                    return Err(Fault::SessionExpired {
                        message: "Invalid cookie.".to_string(),
                    });
                }
                // the server releases any edit locks the session still holds
                state.locks.retain(|_, holder| holder != cookie);
                tracing::debug!("mock: session closed");
                Ok(Value::Null)
            }
            methods::GET_PROJECT_LIST => {
                let username = str_arg(args, 0)?;
                let password = str_arg(args, 1)?;
                let projects: Vec<Value> = state
                    .accounts
                    .iter()
                    .filter(|a| a.username == username && a.password == password)
                    .map(|a| Value::String(a.project.clone()))
                    .collect();
                if projects.is_empty() {
                    return Err(Fault::Auth {
                        message: "Invalid username or password.".to_string(),
                    });
                }
                Ok(Value::Array(projects))
            }
            _ => {
                let cookie = str_arg(args, 0)?.to_string();
                if !state.sessions.contains_key(&cookie) {
                    return Err(Fault::SessionExpired {
                        message: "Invalid cookie.".to_string(),
                    });
                }
                Self::dispatch_entity(&mut state, &cookie, method, args)
            }
        }
    }

    fn dispatch_entity(
        state: &mut State,
        cookie: &str,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        if let Some(table) = method.strip_prefix("cancelSave") {
            let record_id = i64_arg(args, 1)?;
            let key = (table.to_string(), record_id);
            if state.locks.get(&key).map(String::as_str) != Some(cookie) {
                return Err(Fault::Generic {
                    code: "23".to_string(),
                    message: format!("No edit lock held on {} {}.", table, record_id),
                });
            }
            state.locks.remove(&key);
            tracing::debug!(table = %table, record_id, "mock: edit cancelled");
            return Ok(Value::Null);
        }

        if let Some(table) = method.strip_prefix("edit") {
            let record_id = i64_arg(args, 1)?;
            let key = (table.to_string(), record_id);
            let payload = state
                .records
                .get(&key)
                .cloned()
                .ok_or_else(|| Fault::Generic {
                    code: "7".to_string(),
                    message: format!("{} {} not found.", table, record_id),
                })?;

            let held_elsewhere = state.foreign_locks.contains(&key)
                || state
                    .locks
                    .get(&key)
                    .is_some_and(|holder| holder != cookie);
            if held_elsewhere {
                tracing::debug!(table = %table, record_id, "mock: edit lock denied");
                return Err(Fault::LockConflict {
                    message: format!("{} {} is being edited by another user.", table, record_id),
                });
            }

            state.locks.insert(key, cookie.to_string());
            tracing::debug!(table = %table, record_id, "mock: edit lock granted");
            return Ok(payload);
        }

        if let Some(table) = method.strip_prefix("save") {
            let payload = args.get(1).cloned().ok_or_else(bad_arguments)?;
            let record_id = payload
                .get("recordid")
                .and_then(Value::as_i64)
                .ok_or_else(bad_arguments)?;
            let key = (table.to_string(), record_id);
            if state.locks.get(&key).map(String::as_str) != Some(cookie) {
                return Err(Fault::Generic {
                    code: "23".to_string(),
                    message: format!("No edit lock held on {} {}.", table, record_id),
                });
            }
            state.records.insert(key.clone(), payload);
            state.locks.remove(&key);
            tracing::debug!(table = %table, record_id, "mock: record saved");
            return Ok(Value::Null);
        }

        if let Some(table) = method.strip_prefix("get") {
            let record_id = i64_arg(args, 1)?;
            let key = (table.to_string(), record_id);
            return state.records.get(&key).cloned().ok_or_else(|| Fault::Generic {
                code: "7".to_string(),
                message: format!("{} {} not found.", table, record_id),
            });
        }

        Err(Fault::Generic {
            code: "2".to_string(),
            message: format!("Unknown method: {}", method),
        })
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoapTransport for MockServer {
    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.dispatch(method, args)
    }
}

fn bad_arguments() -> Fault {
    Fault::Generic {
        code: "3".to_string(),
        message: "Malformed arguments.".to_string(),
    }
}

fn str_arg(args: &[Value], index: usize) -> Result<&str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(bad_arguments)
}

fn i64_arg(args: &[Value], index: usize) -> Result<i64> {
    args.get(index)
        .and_then(Value::as_i64)
        .ok_or_else(bad_arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn logon(server: &MockServer) -> Value {
        server
            .invoke(
                methods::DATABASE_LOGON,
                &[json!("Widgets"), json!("alice"), json!("secret")],
            )
            .unwrap()
    }

    #[test]
    fn test_logon_and_logoff() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        let cookie = logon(&server);
        assert_eq!(server.session_count(), 1);

        server
            .invoke(methods::DATABASE_LOGOFF, &[cookie])
            .unwrap();
        assert_eq!(server.session_count(), 0);
    }

    #[test]
    fn test_logon_rejects_bad_credentials() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        let result = server.invoke(
            methods::DATABASE_LOGON,
            &[json!("Widgets"), json!("alice"), json!("wrong")],
        );
        assert!(matches!(result, Err(Fault::Auth { .. })));
        assert_eq!(server.session_count(), 0);
    }

    #[test]
    fn test_edit_save_cycle() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11, "summary": "crash"}));
        let cookie = logon(&server);

        let payload = server
            .invoke("editDefect", &[cookie.clone(), json!(11), json!(false)])
            .unwrap();
        assert_eq!(payload["summary"], "crash");
        assert!(server.lock_held("Defect", 11));

        server
            .invoke(
                "saveDefect",
                &[cookie, json!({"recordid": 11, "summary": "fixed"})],
            )
            .unwrap();
        assert!(!server.lock_held("Defect", 11));
        assert_eq!(server.record("Defect", 11).unwrap()["summary"], "fixed");
    }

    #[test]
    fn test_edit_denied_while_foreign_lock_held() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11}));
        server.hold_foreign_lock("Defect", 11);
        let cookie = logon(&server);

        let result = server.invoke("editDefect", &[cookie, json!(11), json!(false)]);
        assert!(matches!(result, Err(Fault::LockConflict { .. })));
    }

    #[test]
    fn test_cancel_releases_lock_without_saving() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11, "summary": "crash"}));
        let cookie = logon(&server);

        server
            .invoke("editDefect", &[cookie.clone(), json!(11), json!(false)])
            .unwrap();
        server
            .invoke("cancelSaveDefect", &[cookie, json!(11)])
            .unwrap();

        assert!(!server.lock_held("Defect", 11));
        assert_eq!(server.record("Defect", 11).unwrap()["summary"], "crash");
    }

    #[test]
    fn test_stale_cookie_is_rejected() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11}));
        let cookie = logon(&server);
        server
            .invoke(methods::DATABASE_LOGOFF, &[cookie.clone()])
            .unwrap();

        let result = server.invoke("getDefect", &[cookie, json!(11)]);
        assert!(matches!(result, Err(Fault::SessionExpired { .. })));
    }

    #[test]
    fn test_fail_once_scripts_a_single_fault() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11}));
        server.fail_once(
            "getDefect",
            Fault::Generic {
                code: "1".to_string(),
                message: "transient".to_string(),
            },
        );
        let cookie = logon(&server);

        assert!(server.invoke("getDefect", &[cookie.clone(), json!(11)]).is_err());
        assert!(server.invoke("getDefect", &[cookie, json!(11)]).is_ok());
        assert_eq!(server.call_count("getDefect"), 2);
    }

    #[test]
    fn test_logoff_releases_held_locks() {
        let server = MockServer::with_account("Widgets", "alice", "secret");
        server.insert_record("Defect", 11, json!({"recordid": 11}));
        let cookie = logon(&server);

        server
            .invoke("editDefect", &[cookie.clone(), json!(11), json!(false)])
            .unwrap();
        assert!(server.lock_held("Defect", 11));

        server
            .invoke(methods::DATABASE_LOGOFF, &[cookie])
            .unwrap();
        assert!(!server.lock_held("Defect", 11));
    }
}
