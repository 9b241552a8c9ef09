use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::gate::errors::GateError;
use crate::gate::roles::RoleSet;

/// Priority of verification pre-steps; lower runs first.
pub const VERIFY_PRIORITY: i32 = 1;
/// Priority of ordinary handlers.
pub const DEFAULT_PRIORITY: i32 = 10;

// ---------- Collaborator seams ----------

/// An inbound request as the host dispatch mechanism delivers it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// The action the request declares it targets.
    pub action: String,
    /// Remaining request fields (tokens, payload, ...).
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: serde_json::Map::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}

/// A callable registered against a hook. Returning `Err` stops the host from
/// running later callbacks on the same hook.
pub type Handler = Arc<dyn Fn(&ActionRequest) -> Result<(), GateError> + Send + Sync>;

/// Replaces or augments the expanded role set before authorization.
pub type RoleFilter = Arc<dyn Fn(RoleSet) -> RoleSet + Send + Sync>;

/// Host registry of named callbacks.
pub trait DispatchRegistry: Send + Sync {
    /// Register `handler` to run when a request targets `hook`. Multiple
    /// registrations per hook are allowed and run in ascending `priority`.
    fn add_action(&self, hook: &str, handler: Handler, priority: i32);
}

/// Resolves who the current caller is.
pub trait IdentityResolver: Send + Sync {
    /// Roles assigned to the authenticated principal, `None` if nobody is
    /// authenticated.
    fn current_roles(&self) -> Option<RoleSet>;
}

/// Issues request-forgery tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, action: &str) -> String;
}

/// Checks request-forgery tokens carried by inbound requests.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, action: &str, request: &ActionRequest) -> Result<(), GateError>;
}

/// The external collaborators an [`ActionGate`](crate::gate::engine::ActionGate)
/// is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn DispatchRegistry>,
    pub identity: Arc<dyn IdentityResolver>,
    pub issuer: Arc<dyn TokenIssuer>,
    pub verifier: Arc<dyn TokenVerifier>,
}

// ---------- Hook naming ----------

/// Fixed composition rule for hook names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookNaming {
    pub prefix: String,
    pub anonymous_infix: String,
}

impl Default for HookNaming {
    fn default() -> Self {
        Self {
            prefix: "ajax_".to_string(),
            anonymous_infix: "nopriv_".to_string(),
        }
    }
}

impl HookNaming {
    pub fn hooks_for(&self, action: &str) -> HookNames {
        HookNames {
            authenticated: format!("{}{}", self.prefix, action),
            anonymous: format!("{}{}{}", self.prefix, self.anonymous_infix, action),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookNames {
    pub authenticated: String,
    pub anonymous: String,
}

// ---------- Outcomes ----------

/// What a single `register` call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub action: String,
    pub required_role: String,
    pub hooks: HookNames,
    /// Handler registered under the authenticated hook.
    pub authenticated: bool,
    /// Handler registered under the anonymous hook.
    pub anonymous: bool,
    /// Verification pre-steps registered alongside the handlers.
    pub verified: bool,
    /// Always issued, even when nothing was registered.
    pub token: String,
}

// ---------- Manifest types ----------

/// One `action` node from a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    pub name: String,
    pub role: String,
    /// Name the host uses to look up the handler; defaults to the action name.
    pub handler: Option<String>,
}

impl ActionSpec {
    pub fn handler_name(&self) -> &str {
        self.handler.as_deref().unwrap_or(&self.name)
    }
}

/// Every declared action, keyed by action name.
#[derive(Debug, Clone, Default)]
pub struct ActionManifest {
    pub actions: BTreeMap<String, ActionSpec>,
}

impl ActionManifest {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
