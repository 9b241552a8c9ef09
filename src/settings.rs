use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub gate: GateSettings,
    pub manifest: Manifest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    /// Attach a token verification pre-step to every registered handler.
    #[serde(default)]
    pub auto_verify: bool,
    /// Prefix of every hook name, e.g. `ajax_save_draft`
    pub hook_prefix: String,
    /// Inserted after the prefix for hooks reachable without authentication
    pub anonymous_infix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Directory of `.kdl` action manifests. Default: actions
    pub dir: PathBuf,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            auto_verify: false,
            hook_prefix: "ajax_".to_string(),
            anonymous_infix: "nopriv_".to_string(),
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("actions"),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("gate.auto_verify", GateSettings::default().auto_verify)
            .into_diagnostic()?
            .set_default("gate.hook_prefix", GateSettings::default().hook_prefix)
            .into_diagnostic()?
            .set_default(
                "gate.anonymous_infix",
                GateSettings::default().anonymous_infix,
            )
            .into_diagnostic()?
            .set_default(
                "manifest.dir",
                Manifest::default().dir.to_string_lossy().to_string(),
            )
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: ACTION_GATE__GATE__AUTO_VERIFY=true, etc.
        builder =
            builder.add_source(config::Environment::with_prefix("ACTION_GATE").separator("__"));

        let cfg = builder.build().map_err(AppError::from)?;
        let mut s: Settings = cfg.try_deserialize().map_err(AppError::from)?;

        if s.manifest.dir.is_relative() {
            s.manifest.dir = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.manifest.dir);
        }

        Ok(s)
    }
}
