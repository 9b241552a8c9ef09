pub mod engine;
pub mod errors;
pub mod loader;
pub mod manifest;
pub mod plan;
pub mod roles;
pub mod types;

pub use engine::ActionGate;
pub use errors::GateError;
pub use roles::{expand, RequiredRole, Role, RoleSet};
pub use types::{
    ActionRequest, Collaborators, DispatchRegistry, Handler, IdentityResolver, Registration,
    TokenIssuer, TokenVerifier,
};
