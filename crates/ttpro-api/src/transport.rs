//! Transport seam to the remote service

use serde_json::Value;

use crate::Result;

/// Session-level RPC method names.
///
/// Entity-specific methods (`editDefect`, `saveDefect`, ...) are derived
/// from the entity table name by the model layer.
pub mod methods {
    pub const DATABASE_LOGON: &str = "DatabaseLogon";
    pub const DATABASE_LOGOFF: &str = "DatabaseLogoff";
    pub const GET_PROJECT_LIST: &str = "getProjectList";
}

/// A connection to the remote SOAP service.
///
/// Implementations own the wire protocol (envelope encoding, HTTP, WSDL
/// quirks) and expose the service as a uniform method call. Arguments and
/// results are opaque JSON values; the session cookie, when required, is
/// always the first argument.
pub trait SoapTransport: Send + Sync {
    fn invoke(&self, method: &str, args: &[Value]) -> Result<Value>;
}
