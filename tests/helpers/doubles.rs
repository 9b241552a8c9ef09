use action_gate::gate::{
    ActionRequest, Collaborators, DispatchRegistry, GateError, Handler, IdentityResolver, RoleSet,
    TokenIssuer, TokenVerifier,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Minimal host dispatcher: stores callbacks per hook and runs them in
/// ascending priority, stopping at the first error.
#[derive(Default)]
pub struct Dispatcher {
    hooks: Mutex<HashMap<String, Vec<(i32, Handler)>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_hook(&self, hook: &str) -> bool {
        self.hooks.lock().unwrap().contains_key(hook)
    }

    pub fn priorities(&self, hook: &str) -> Vec<i32> {
        self.hooks
            .lock()
            .unwrap()
            .get(hook)
            .map(|callbacks| callbacks.iter().map(|(p, _)| *p).collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.hooks.lock().unwrap().values().map(|v| v.len()).sum()
    }

    pub fn dispatch(&self, hook: &str, request: &ActionRequest) -> Result<(), GateError> {
        let callbacks = self.hooks.lock().unwrap().get(hook).cloned().unwrap_or_default();
        for (_, callback) in callbacks {
            callback(request)?;
        }
        Ok(())
    }
}

impl DispatchRegistry for Dispatcher {
    fn add_action(&self, hook: &str, handler: Handler, priority: i32) {
        let mut hooks = self.hooks.lock().unwrap();
        let callbacks = hooks.entry(hook.to_string()).or_default();
        callbacks.push((priority, handler));
        // stable: equal priorities keep registration order
        callbacks.sort_by_key(|(p, _)| *p);
    }
}

/// Identity whose roles can change between calls.
#[derive(Default)]
pub struct ScriptedIdentity {
    roles: Mutex<Option<RoleSet>>,
}

impl ScriptedIdentity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_roles(roles: &[&str]) -> Self {
        let identity = Self::default();
        identity.set_roles(Some(roles));
        identity
    }

    pub fn set_roles(&self, roles: Option<&[&str]>) {
        *self.roles.lock().unwrap() =
            roles.map(|r| r.iter().map(|s| s.to_string()).collect());
    }
}

impl IdentityResolver for ScriptedIdentity {
    fn current_roles(&self) -> Option<RoleSet> {
        self.roles.lock().unwrap().clone()
    }
}

/// Issues `nonce-<action>` tokens and accepts requests carrying the matching
/// `_nonce` parameter. Records every action it was asked to verify.
#[derive(Default)]
pub struct NonceTokens {
    issued: AtomicUsize,
    verified: Mutex<Vec<String>>,
}

impl NonceTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token_for(action: &str) -> String {
        format!("nonce-{action}")
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn verified(&self) -> Vec<String> {
        self.verified.lock().unwrap().clone()
    }
}

impl TokenIssuer for NonceTokens {
    fn issue(&self, action: &str) -> String {
        self.issued.fetch_add(1, Ordering::SeqCst);
        Self::token_for(action)
    }
}

impl TokenVerifier for NonceTokens {
    fn verify(&self, action: &str, request: &ActionRequest) -> Result<(), GateError> {
        self.verified.lock().unwrap().push(action.to_string());
        if request.param_str("_nonce") == Some(Self::token_for(action).as_str()) {
            Ok(())
        } else {
            Err(GateError::Verification {
                action: action.to_string(),
            })
        }
    }
}

pub fn collaborators(
    dispatcher: &Arc<Dispatcher>,
    identity: &Arc<ScriptedIdentity>,
    tokens: &Arc<NonceTokens>,
) -> Collaborators {
    Collaborators {
        registry: dispatcher.clone(),
        identity: identity.clone(),
        issuer: tokens.clone(),
        verifier: tokens.clone(),
    }
}
