use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GateError {
    #[error("Failed to load action manifest `{path}`")]
    #[diagnostic(
        code(action_gate::manifest_load),
        help("Check that the file exists and contains valid KDL syntax")
    )]
    ManifestLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid action manifest: {0}")]
    #[diagnostic(
        code(action_gate::invalid_manifest),
        help("Declare actions with: action \"<name>\" role=\"<role>\" (optionally handler=\"<name>\")")
    )]
    InvalidManifest(String),

    #[error("KDL parse error: {0}")]
    #[diagnostic(
        code(action_gate::kdl_parse),
        help("Check your KDL file syntax — see https://kdl.dev for the specification")
    )]
    KdlParse(String),

    #[error("Request verification failed for action `{action}`")]
    #[diagnostic(
        code(action_gate::verification),
        help("The request token is missing, expired, or was issued for another action")
    )]
    Verification { action: String },

    #[error("Handler for `{action}` failed: {message}")]
    #[diagnostic(code(action_gate::handler))]
    Handler { action: String, message: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(action_gate::io))]
    Io(#[from] std::io::Error),
}
