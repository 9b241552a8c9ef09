pub mod doubles;

pub use doubles::{collaborators, Dispatcher, NonceTokens, ScriptedIdentity};
