//! High-level client

use std::sync::Arc;

use serde_json::{json, Value};

use ttpro_api::SoapTransport;
use ttpro_edit::{EditLock, EditOptions, EditReport};
use ttpro_model::{Defect, Entity, Requirement, TestCase};
use ttpro_session::{Session, SessionConfig};

use crate::error::ClientError;
use crate::Result;

/// One authenticated connection to a TestTrack project.
///
/// Owns the [`Session`] and exposes typed operations per entity. Logoff is
/// guaranteed: either explicitly through [`Client::logoff`] or when the
/// client is dropped, no matter how many edit scopes ran or failed inside.
pub struct Client {
    session: Session,
}

impl Client {
    /// Log in and open a client session.
    pub fn connect(transport: Arc<dyn SoapTransport>, config: &SessionConfig) -> Result<Self> {
        let session = Session::login(transport, config)?;
        tracing::debug!(project = %session.project(), "Client connected");
        Ok(Self { session })
    }

    /// The underlying session, for direct call forwarding
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Forward an arbitrary API call with the cookie injected
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        Ok(self.session.call(method, args)?)
    }

    /// Projects the given user may log into, without opening a session
    pub fn project_list(
        transport: &dyn SoapTransport,
        username: &str,
        password: &str,
    ) -> Result<Vec<String>> {
        Ok(Session::project_list(transport, username, password)?)
    }

    /// Log off explicitly. Otherwise happens on drop, where a failure is
    /// logged instead of surfaced.
    pub fn logoff(self) -> Result<()> {
        Ok(self.session.logoff()?)
    }

    // === Reads (no lock taken) ===

    fn get<E: Entity>(&self, record_id: i64) -> Result<E> {
        let value = self.session.call(E::KIND.get_method(), &[json!(record_id)])?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn defect(&self, record_id: i64) -> Result<Defect> {
        self.get(record_id)
    }

    pub fn requirement(&self, record_id: i64) -> Result<Requirement> {
        self.get(record_id)
    }

    pub fn test_case(&self, record_id: i64) -> Result<TestCase> {
        self.get(record_id)
    }

    // === Edit scopes ===

    /// Open an edit scope for any entity type
    pub fn edit<E: Entity>(&self, record_id: i64, options: EditOptions) -> Result<EditLock<'_, E>> {
        Ok(EditLock::acquire(&self.session, record_id, options)?)
    }

    pub fn edit_defect(&self, record_id: i64, options: EditOptions) -> Result<EditLock<'_, Defect>> {
        self.edit(record_id, options)
    }

    pub fn edit_requirement(
        &self,
        record_id: i64,
        options: EditOptions,
    ) -> Result<EditLock<'_, Requirement>> {
        self.edit(record_id, options)
    }

    pub fn edit_test_case(
        &self,
        record_id: i64,
        options: EditOptions,
    ) -> Result<EditLock<'_, TestCase>> {
        self.edit(record_id, options)
    }

    /// Run a whole edit scope through a closure: save on `Ok`, cancel (and
    /// propagate the closure's error unchanged) on `Err`, skip the body on
    /// an ignored lock conflict.
    pub fn with_edit<E, T, Err, F>(
        &self,
        record_id: i64,
        options: EditOptions,
        body: F,
    ) -> std::result::Result<(EditReport<E>, Option<T>), Err>
    where
        E: Entity,
        Err: From<ttpro_edit::EditError>,
        F: FnOnce(&mut E) -> std::result::Result<T, Err>,
    {
        ttpro_edit::with_edit(&self.session, record_id, options, body)
    }
}
