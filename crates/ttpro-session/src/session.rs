//! Session lifecycle and call forwarding

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use ttpro_api::{methods, Fault, SoapTransport};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::Result;

/// Fault message the server uses when it has already dropped an idle
/// session; logging off such a session is not an error worth surfacing.
const SESSION_DROPPED: &str = "Session Dropped.";

/// An authenticated session against one project.
///
/// Holds the cookie returned by login and injects it as the first argument
/// of every forwarded call. Logoff runs at most once: explicitly through
/// [`Session::logoff`], or on drop, where a failure is logged rather than
/// surfaced so it never masks an error already unwinding through the caller.
pub struct Session {
    transport: Arc<dyn SoapTransport>,
    endpoint: String,
    project: String,
    username: String,
    cookie: Mutex<Option<Value>>,
}

impl Session {
    /// Log in and open a session.
    ///
    /// On a rejected login no session state is created and nothing needs
    /// tearing down.
    pub fn login(transport: Arc<dyn SoapTransport>, config: &SessionConfig) -> Result<Self> {
        let endpoint = config.wsdl_url()?;

        let cookie = transport
            .invoke(
                methods::DATABASE_LOGON,
                &[
                    json!(config.project),
                    json!(config.username),
                    json!(config.password),
                ],
            )
            .map_err(|fault| SessionError::Authentication(fault.message().to_string()))?;

        tracing::info!(
            endpoint = %endpoint,
            project = %config.project,
            username = %config.username,
            "Logged in"
        );

        Ok(Self {
            transport,
            endpoint: endpoint.into(),
            project: config.project.clone(),
            username: config.username.clone(),
            cookie: Mutex::new(Some(cookie)),
        })
    }

    /// Normalized WSDL URL this session was opened against
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Project the session is logged into
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_logged_in(&self) -> bool {
        self.cookie.lock().is_some()
    }

    /// Forward a call with the session cookie injected as the first argument.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let cookie = self
            .cookie
            .lock()
            .clone()
            .ok_or(SessionError::NotLoggedIn)?;

        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(cookie);
        full_args.extend_from_slice(args);

        self.transport
            .invoke(method, &full_args)
            .map_err(|fault| match fault {
                Fault::SessionExpired { message } => SessionError::Expired(message),
                other => SessionError::Fault(other),
            })
    }

    /// Log off and surrender the cookie.
    ///
    /// Safe to call on an already-closed session (does nothing). The cookie
    /// is taken before the remote call, so the logoff fires at most once
    /// even if the call itself fails.
    pub fn logoff(&self) -> Result<()> {
        let Some(cookie) = self.cookie.lock().take() else {
            return Ok(());
        };

        match self
            .transport
            .invoke(methods::DATABASE_LOGOFF, &[cookie])
        {
            Ok(_) => {
                tracing::info!(project = %self.project, "Logged off");
                Ok(())
            }
            Err(fault) if fault.message() == SESSION_DROPPED => {
                tracing::debug!(project = %self.project, "Session already dropped by server");
                Ok(())
            }
            Err(fault) => Err(SessionError::Fault(fault)),
        }
    }

    /// Projects the given user may log into. The one documented call that
    /// takes credentials instead of a cookie.
    pub fn project_list(
        transport: &dyn SoapTransport,
        username: &str,
        password: &str,
    ) -> Result<Vec<String>> {
        let value = transport
            .invoke(methods::GET_PROJECT_LIST, &[json!(username), json!(password)])
            .map_err(|fault| SessionError::Authentication(fault.message().to_string()))?;

        Ok(value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(error) = self.logoff() {
            tracing::warn!(
                project = %self.project,
                error = %error,
                "Logoff during session teardown failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttpro_api::mock::MockServer;

    fn config() -> SessionConfig {
        SessionConfig::new("http://tt.example.com/", "Widgets", "alice", "secret")
    }

    fn server() -> Arc<MockServer> {
        Arc::new(MockServer::with_account("Widgets", "alice", "secret"))
    }

    #[test]
    fn test_login_stores_cookie() {
        let server = server();
        let session = Session::login(server.clone(), &config()).unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.project(), "Widgets");
        assert_eq!(session.endpoint(), "http://tt.example.com/ttsoapcgi.wsdl");
        assert_eq!(server.session_count(), 1);
    }

    #[test]
    fn test_rejected_login_leaves_no_state() {
        let server = server();
        let bad = SessionConfig::new("http://tt.example.com/", "Widgets", "alice", "wrong");

        let result = Session::login(server.clone(), &bad);
        assert!(matches!(result, Err(SessionError::Authentication(_))));
        assert_eq!(server.session_count(), 0);
        assert_eq!(server.call_count(methods::DATABASE_LOGOFF), 0);
    }

    #[test]
    fn test_call_injects_cookie_first() {
        let server = server();
        server.insert_record("Defect", 42, json!({"recordid": 42, "summary": "boom"}));
        let session = Session::login(server.clone(), &config()).unwrap();

        let defect = session.call("getDefect", &[json!(42)]).unwrap();
        assert_eq!(defect["summary"], "boom");

        let calls = server.calls();
        let get = calls.iter().find(|c| c.method == "getDefect").unwrap();
        assert!(get.args[0].is_string());
        assert_eq!(get.args[1], json!(42));
    }

    #[test]
    fn test_expired_cookie_maps_to_expired_error() {
        let server = server();
        let session = Session::login(server.clone(), &config()).unwrap();
        server.fail_once(
            "getDefect",
            Fault::SessionExpired {
                message: "Invalid cookie.".to_string(),
            },
        );

        let result = session.call("getDefect", &[json!(1)]);
        assert!(matches!(result, Err(SessionError::Expired(_))));
    }

    #[test]
    fn test_call_after_logoff_fails_locally() {
        let server = server();
        let session = Session::login(server.clone(), &config()).unwrap();
        session.logoff().unwrap();

        let result = session.call("getDefect", &[json!(1)]);
        assert!(matches!(result, Err(SessionError::NotLoggedIn)));
        // nothing went over the wire
        assert_eq!(server.call_count("getDefect"), 0);
    }

    #[test]
    fn test_drop_logs_off_exactly_once() {
        let server = server();
        {
            let _session = Session::login(server.clone(), &config()).unwrap();
        }
        assert_eq!(server.call_count(methods::DATABASE_LOGOFF), 1);
        assert_eq!(server.session_count(), 0);
    }

    #[test]
    fn test_explicit_logoff_suppresses_drop_logoff() {
        let server = server();
        {
            let session = Session::login(server.clone(), &config()).unwrap();
            session.logoff().unwrap();
            assert!(!session.is_logged_in());
        }
        assert_eq!(server.call_count(methods::DATABASE_LOGOFF), 1);
    }

    #[test]
    fn test_session_dropped_fault_is_tolerated() {
        let server = server();
        let session = Session::login(server.clone(), &config()).unwrap();
        server.fail_once(
            methods::DATABASE_LOGOFF,
            Fault::Generic {
                code: "0".to_string(),
                message: SESSION_DROPPED.to_string(),
            },
        );

        assert!(session.logoff().is_ok());
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_logoff_failure_surfaces_on_explicit_call() {
        let server = server();
        let session = Session::login(server.clone(), &config()).unwrap();
        server.fail_once(
            methods::DATABASE_LOGOFF,
            Fault::Generic {
                code: "1".to_string(),
                message: "internal error".to_string(),
            },
        );

        assert!(session.logoff().is_err());
        // cookie is gone regardless; drop will not retry
        assert!(!session.is_logged_in());
        drop(session);
        assert_eq!(server.call_count(methods::DATABASE_LOGOFF), 1);
    }

    #[test]
    fn test_project_list_without_cookie() {
        let server = server();
        server.add_account("Gadgets", "alice", "secret");

        let projects = Session::project_list(&*server, "alice", "secret").unwrap();
        assert_eq!(projects, vec!["Widgets", "Gadgets"]);

        let result = Session::project_list(&*server, "alice", "nope");
        assert!(matches!(result, Err(SessionError::Authentication(_))));
    }
}
