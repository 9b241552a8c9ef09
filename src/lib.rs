//! Action Gate - role-gated registration of action handlers
//!
//! Decides, per principal, which dispatch hooks receive a handler based on a
//! fixed role hierarchy, and optionally guards each registered handler with a
//! request-forgery token check.

pub mod errors;
pub mod gate;
pub mod settings;
