//! The edit-lock scope guard

use serde_json::json;

use ttpro_api::Fault;
use ttpro_model::{Entity, EntityKind};
use ttpro_session::{Session, SessionError};

use crate::error::EditError;
use crate::outcome::EditOutcome;
use crate::Result;

/// Options for entering an edit scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    /// Eagerly fetch attachment contents with the payload
    pub download_attachments: bool,
    /// Treat a lock held by another session as a reportable condition
    /// instead of an error: the scope is entered without the lock, the
    /// body is skipped, and the conflict is captured on the handle
    pub ignore_edit_lock_error: bool,
}

/// A finalized edit handle, left behind once the scope has exited.
#[derive(Debug, Clone)]
pub struct EditReport<E: Entity> {
    pub kind: EntityKind,
    /// The record id the scope was opened for
    pub record_id: i64,
    pub outcome: EditOutcome,
    /// Captured fault: a conflict when the lock was never obtained, or the
    /// save fault when the save leg failed
    pub fault: Option<Fault>,
    /// Final payload (the empty default if the lock was never obtained)
    pub entity: E,
}

/// A live edit scope holding the server-side write lock on one record.
///
/// Exactly one terminal RPC fires per guard: [`EditLock::save`] on the
/// normal path, `cancelSave` on every other path (explicit
/// [`EditLock::cancel`], early `?` return, panic, plain drop). The
/// lock-held flag is the fired-once guard; once it clears, no further
/// save or cancel goes over the wire.
pub struct EditLock<'s, E: Entity> {
    session: &'s Session,
    record_id: i64,
    entity: E,
    outcome: EditOutcome,
    fault: Option<Fault>,
    lock_held: bool,
}

impl<'s, E: Entity> EditLock<'s, E> {
    /// Issue the `edit<Entity>` call and enter the scope.
    ///
    /// A lock conflict either propagates as [`EditError::LockConflict`] or,
    /// with `ignore_edit_lock_error`, yields a lock-out guard: default
    /// payload, conflict captured, no lock held, so the eventual exit sends
    /// nothing.
    pub fn acquire(session: &'s Session, record_id: i64, options: EditOptions) -> Result<Self> {
        let kind = E::KIND;

        match session.call(
            kind.edit_method(),
            &[json!(record_id), json!(options.download_attachments)],
        ) {
            Ok(value) => {
                let entity: E = serde_json::from_value(value)
                    .map_err(|source| EditError::Decode { kind, source })?;
                tracing::debug!(kind = %kind, record_id, "Edit lock acquired");
                Ok(Self {
                    session,
                    record_id,
                    entity,
                    outcome: EditOutcome::Pending,
                    fault: None,
                    lock_held: true,
                })
            }
            Err(SessionError::Fault(fault)) if fault.is_lock_conflict() => {
                if options.ignore_edit_lock_error {
                    tracing::warn!(
                        kind = %kind,
                        record_id,
                        message = %fault.message(),
                        "Edit lock denied; continuing without it"
                    );
                    Ok(Self {
                        session,
                        record_id,
                        entity: E::default(),
                        outcome: EditOutcome::Pending,
                        fault: Some(fault),
                        lock_held: false,
                    })
                } else {
                    Err(EditError::LockConflict {
                        kind,
                        record_id,
                        message: fault.message().to_string(),
                    })
                }
            }
            Err(other) => Err(EditError::Session(other)),
        }
    }

    /// The record id the scope was opened for
    pub fn record_id(&self) -> i64 {
        self.record_id
    }

    pub fn outcome(&self) -> EditOutcome {
        self.outcome
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref()
    }

    /// Whether the server-side write lock is currently held by this guard
    pub fn is_lock_held(&self) -> bool {
        self.lock_held
    }

    /// The payload, present only while the lock is held
    pub fn entity(&self) -> Option<&E> {
        self.lock_held.then_some(&self.entity)
    }

    /// Mutable payload access, present only while the lock is held
    pub fn entity_mut(&mut self) -> Option<&mut E> {
        if self.lock_held {
            Some(&mut self.entity)
        } else {
            None
        }
    }

    /// Exit the scope normally: send the mutated payload with
    /// `save<Entity>` and release the lock.
    ///
    /// On a guard that does not hold the lock (an ignored conflict, or an
    /// edit already cancelled) nothing goes over the wire and the handle is
    /// finalized as-is. If the save itself faults, a best-effort
    /// `cancelSave` still releases the lock (its own failure is only
    /// logged) and the save fault is what the caller gets.
    pub fn save(mut self) -> Result<EditReport<E>> {
        if !self.lock_held {
            return Ok(self.report());
        }
        let kind = E::KIND;

        let payload = serde_json::to_value(&self.entity)
            .map_err(|source| EditError::Decode { kind, source })?;

        match self.session.call(kind.save_method(), &[payload]) {
            Ok(_) => {
                self.lock_held = false;
                self.transition(EditOutcome::Saved);
                tracing::debug!(kind = %kind, record_id = self.record_id, "Edit saved");
                Ok(self.report())
            }
            Err(error) => {
                self.lock_held = false;
                self.transition(EditOutcome::Cancelled);
                tracing::warn!(
                    kind = %kind,
                    record_id = self.record_id,
                    error = %error,
                    "Save failed; releasing edit lock"
                );
                if let Err(cancel_error) = self
                    .session
                    .call(kind.cancel_save_method(), &[json!(self.record_id)])
                {
                    tracing::warn!(
                        kind = %kind,
                        record_id = self.record_id,
                        error = %cancel_error,
                        "Cancel after failed save also failed"
                    );
                }
                let fault = into_fault(error);
                self.fault = Some(fault.clone());
                Err(EditError::Save {
                    kind,
                    record_id: self.record_id,
                    fault,
                })
            }
        }
    }

    /// Exit the scope early without saving: send `cancelSave<Entity>` and
    /// release the lock. A no-op on a guard that does not hold the lock.
    pub fn cancel(mut self) -> Result<EditReport<E>> {
        if !self.lock_held {
            return Ok(self.report());
        }
        let kind = E::KIND;

        self.lock_held = false;
        self.transition(EditOutcome::Cancelled);
        self.session
            .call(kind.cancel_save_method(), &[json!(self.record_id)])?;
        tracing::debug!(kind = %kind, record_id = self.record_id, "Edit cancelled");
        Ok(self.report())
    }

    fn report(&self) -> EditReport<E> {
        EditReport {
            kind: E::KIND,
            record_id: self.record_id,
            outcome: self.outcome,
            fault: self.fault.clone(),
            entity: self.entity.clone(),
        }
    }

    fn transition(&mut self, next: EditOutcome) {
        debug_assert!(
            self.outcome.can_transition_to(next),
            "invalid outcome transition {} -> {}",
            self.outcome,
            next
        );
        self.outcome = next;
    }
}

impl<E: Entity> Drop for EditLock<'_, E> {
    fn drop(&mut self) {
        if !self.lock_held {
            return;
        }
        self.lock_held = false;
        self.transition(EditOutcome::Cancelled);
        tracing::debug!(
            kind = %E::KIND,
            record_id = self.record_id,
            "Edit scope abandoned; cancelling"
        );
        if let Err(error) = self
            .session
            .call(E::KIND.cancel_save_method(), &[json!(self.record_id)])
        {
            // the caller's own error is already unwinding; this one is
            // logged, not substituted for it
            tracing::warn!(
                kind = %E::KIND,
                record_id = self.record_id,
                error = %error,
                "Cancelling abandoned edit failed"
            );
        }
    }
}

/// Drive a whole edit scope through a closure.
///
/// Enters the scope, runs `body` against the mutable payload, and exits:
/// save when the body returns `Ok`, cancel (then the body's own error,
/// unchanged) when it returns `Err`. When an ignored lock conflict left the
/// guard without the lock the body is skipped entirely and no terminal RPC
/// is sent; inspect the returned report to tell the cases apart.
pub fn with_edit<E, T, Err, F>(
    session: &Session,
    record_id: i64,
    options: EditOptions,
    body: F,
) -> std::result::Result<(EditReport<E>, Option<T>), Err>
where
    E: Entity,
    Err: From<EditError>,
    F: FnOnce(&mut E) -> std::result::Result<T, Err>,
{
    let mut lock = EditLock::<E>::acquire(session, record_id, options)?;

    if !lock.is_lock_held() {
        return Ok((lock.save()?, None));
    }

    match body(&mut lock.entity) {
        Ok(value) => Ok((lock.save()?, Some(value))),
        Err(error) => {
            // dropping the guard issues the cancelSave
            drop(lock);
            Err(error)
        }
    }
}

fn into_fault(error: SessionError) -> Fault {
    match error {
        SessionError::Fault(fault) => fault,
        SessionError::Expired(message) => Fault::SessionExpired { message },
        other => Fault::Generic {
            code: String::new(),
            message: other.to_string(),
        },
    }
}
