//! Collaborators for dry runs: record what a gate would register for a given
//! principal without wiring anything into a live dispatcher.

use serde::Serialize;
use std::sync::Mutex;

use crate::gate::errors::GateError;
use crate::gate::roles::RoleSet;
use crate::gate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Handler,
    Verification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub hook: String,
    pub priority: i32,
    pub kind: EntryKind,
}

/// A [`DispatchRegistry`] that only records registrations, in call order.
/// Entries at [`VERIFY_PRIORITY`] or earlier are reported as verification
/// pre-steps.
#[derive(Debug, Default)]
pub struct RegistrationLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RegistrationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Hooks that received a handler, in registration order.
    pub fn hooks(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.kind == EntryKind::Handler)
            .map(|e| e.hook.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DispatchRegistry for RegistrationLog {
    fn add_action(&self, hook: &str, _handler: Handler, priority: i32) {
        let kind = if priority <= VERIFY_PRIORITY {
            EntryKind::Verification
        } else {
            EntryKind::Handler
        };
        self.lock().push(LogEntry {
            hook: hook.to_string(),
            priority,
            kind,
        });
    }
}

/// An [`IdentityResolver`] with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    roles: Option<RoleSet>,
}

impl StaticIdentity {
    pub fn anonymous() -> Self {
        Self { roles: None }
    }

    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: Some(roles.into_iter().map(Into::into).collect()),
        }
    }
}

impl IdentityResolver for StaticIdentity {
    fn current_roles(&self) -> Option<RoleSet> {
        self.roles.clone()
    }
}

/// Placeholder tokens for plans; never valid for a real request.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanTokens;

impl TokenIssuer for PlanTokens {
    fn issue(&self, action: &str) -> String {
        format!("unissued:{action}")
    }
}

impl TokenVerifier for PlanTokens {
    fn verify(&self, action: &str, _request: &ActionRequest) -> Result<(), GateError> {
        Err(GateError::Verification {
            action: action.to_string(),
        })
    }
}
