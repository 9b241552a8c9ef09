use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::gate::roles::{self, RequiredRole, RoleSet};
use crate::gate::types::*;
use crate::settings::GateSettings;

/// Registers action handlers for the current principal according to the
/// role each action requires.
///
/// Callers are expected to register every action unconditionally at setup
/// time; the gate decides per principal which hooks actually receive the
/// handler. Denial is silent.
pub struct ActionGate {
    collaborators: Collaborators,
    naming: HookNaming,
    role_filter: RoleFilter,
    auto_verify: AtomicBool,
}

impl ActionGate {
    pub fn new(collaborators: Collaborators, auto_verify: bool) -> Self {
        Self {
            collaborators,
            naming: HookNaming::default(),
            role_filter: Arc::new(|roles: RoleSet| roles),
            auto_verify: AtomicBool::new(auto_verify),
        }
    }

    pub fn from_settings(settings: &GateSettings, collaborators: Collaborators) -> Self {
        Self::new(collaborators, settings.auto_verify).with_hook_naming(HookNaming {
            prefix: settings.hook_prefix.clone(),
            anonymous_infix: settings.anonymous_infix.clone(),
        })
    }

    /// Install a customization hook applied to every expanded role set.
    pub fn with_role_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(RoleSet) -> RoleSet + Send + Sync + 'static,
    {
        self.role_filter = Arc::new(filter);
        self
    }

    pub fn with_hook_naming(mut self, naming: HookNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn hook_naming(&self) -> &HookNaming {
        &self.naming
    }

    pub fn set_auto_verify(&self, enabled: bool) {
        self.auto_verify.store(enabled, Ordering::Release);
    }

    pub fn auto_verify(&self) -> bool {
        self.auto_verify.load(Ordering::Acquire)
    }

    /// Expanded and filtered roles of the current principal. Computed fresh
    /// on every call.
    pub fn effective_roles(&self) -> RoleSet {
        let assigned = self.collaborators.identity.current_roles().unwrap_or_default();
        (self.role_filter)(roles::expand(&assigned))
    }

    /// Register `handler` for `action` if the current principal satisfies
    /// `required_role`, and return a token bound to `action`.
    ///
    /// The token is issued whether or not anything was registered, so its
    /// presence says nothing about access.
    pub fn register(&self, action: &str, handler: Handler, required_role: &str) -> String {
        self.register_detailed(action, handler, required_role).token
    }

    /// Like [`register`](Self::register), but reports which hooks received
    /// the handler.
    pub fn register_detailed(
        &self,
        action: &str,
        handler: Handler,
        required_role: &str,
    ) -> Registration {
        if action.is_empty() || required_role.is_empty() {
            tracing::warn!(action, required_role, "register called with an empty name");
        }

        let required = RequiredRole::parse(required_role);
        let effective = self.effective_roles();
        let public = required.is_public();
        let authorized = required.is_satisfied_by(&effective);
        let hooks = self.naming.hooks_for(action);
        let registry = &self.collaborators.registry;

        if authorized {
            registry.add_action(&hooks.authenticated, handler.clone(), DEFAULT_PRIORITY);
        }
        if public {
            registry.add_action(&hooks.anonymous, handler, DEFAULT_PRIORITY);
        }

        let auto_verify = self.auto_verify();
        if auto_verify {
            if authorized {
                registry.add_action(
                    &hooks.authenticated,
                    self.verification_step(),
                    VERIFY_PRIORITY,
                );
            }
            if public {
                registry.add_action(
                    &hooks.anonymous,
                    self.verification_step(),
                    VERIFY_PRIORITY,
                );
            }
        }

        if let RequiredRole::Custom(name) = &required {
            if !authorized {
                tracing::debug!(action, role = %name, "custom role not held by principal");
            }
        }

        tracing::debug!(
            action,
            required_role = %required,
            authorized,
            public,
            auto_verify,
            "action registration evaluated"
        );

        Registration {
            action: action.to_string(),
            required_role: required.to_string(),
            hooks,
            authenticated: authorized,
            anonymous: public,
            verified: auto_verify && authorized,
            token: self.collaborators.issuer.issue(action),
        }
    }

    pub fn register_for_all(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "all")
    }

    pub fn register_for_subscriber(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "subscriber")
    }

    pub fn register_for_contributor(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "contributor")
    }

    pub fn register_for_author(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "author")
    }

    pub fn register_for_editor(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "editor")
    }

    pub fn register_for_admin(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "administrator")
    }

    pub fn register_for_super_admin(&self, action: &str, handler: Handler) -> String {
        self.register(action, handler, "super_admin")
    }

    /// Register every action declared in `manifest`, resolving each handler
    /// through `resolve`.
    pub fn register_manifest<F>(
        &self,
        manifest: &ActionManifest,
        mut resolve: F,
    ) -> Vec<Registration>
    where
        F: FnMut(&ActionSpec) -> Handler,
    {
        let outcomes: Vec<Registration> = manifest
            .actions
            .values()
            .map(|spec| self.register_detailed(&spec.name, resolve(spec), &spec.role))
            .collect();

        tracing::info!(
            actions = outcomes.len(),
            authenticated = outcomes.iter().filter(|r| r.authenticated).count(),
            anonymous = outcomes.iter().filter(|r| r.anonymous).count(),
            "Registered manifest actions"
        );

        outcomes
    }

    /// Pre-step that checks the request token against the action the request
    /// itself declares.
    fn verification_step(&self) -> Handler {
        let verifier = Arc::clone(&self.collaborators.verifier);
        Arc::new(move |request: &ActionRequest| verifier.verify(&request.action, request))
    }
}
