use crate::gate::errors::GateError;
use crate::gate::types::ActionSpec;
use kdl::KdlDocument;

/// Parse a KDL manifest into action declarations.
///
/// ```kdl
/// action "save_draft" role="contributor"
/// action "public_ping" role="all" handler="ping"
/// ```
pub fn parse_manifest(source: &str) -> Result<Vec<ActionSpec>, GateError> {
    let doc: KdlDocument = source
        .parse()
        .map_err(|e: kdl::KdlError| GateError::KdlParse(e.to_string()))?;

    let mut actions = Vec::new();

    for node in doc.nodes() {
        match node.name().value() {
            "action" => {
                let name = first_string_arg(node).ok_or_else(|| {
                    GateError::InvalidManifest(
                        "action node requires a name argument (e.g. action \"save_draft\" role=\"author\")"
                            .into(),
                    )
                })?;
                if name.is_empty() {
                    return Err(GateError::InvalidManifest(
                        "action name must not be empty".into(),
                    ));
                }

                let role = string_prop(node, "role").ok_or_else(|| {
                    GateError::InvalidManifest(format!(
                        "action `{name}` missing `role` property (e.g. role=\"editor\")"
                    ))
                })?;
                if role.is_empty() {
                    return Err(GateError::InvalidManifest(format!(
                        "action `{name}` has an empty `role`"
                    )));
                }

                actions.push(ActionSpec {
                    name,
                    role,
                    handler: string_prop(node, "handler"),
                });
            }
            other => {
                tracing::warn!("ignoring unknown top-level KDL node `{other}`");
            }
        }
    }

    Ok(actions)
}

fn first_string_arg(node: &kdl::KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn string_prop(node: &kdl::KdlNode, key: &str) -> Option<String> {
    node.get(key)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}
