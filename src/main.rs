use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use action_gate::errors::AppError;
use action_gate::gate::loader;
use action_gate::gate::plan::{LogEntry, PlanTokens, RegistrationLog, StaticIdentity};
use action_gate::gate::{
    ActionGate, ActionRequest, Collaborators, Handler, IdentityResolver, Registration, RoleSet,
};
use action_gate::settings::Settings;
use clap::Parser;
use miette::Result;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "action-gate",
    version,
    about = "Show which action hooks a principal would receive"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Directory of action manifests (overrides manifest.dir)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Role assigned to the principal; repeat for several. Omit for an anonymous caller.
    #[arg(short, long = "role")]
    roles: Vec<String>,

    /// Enable token verification pre-steps regardless of configuration
    #[arg(long)]
    auto_verify: bool,
}

#[derive(Serialize)]
struct Plan<'a> {
    assigned_roles: Option<RoleSet>,
    effective_roles: RoleSet,
    registrations: &'a [Registration],
    hooks: Vec<LogEntry>,
}

fn main() -> Result<()> {
    // logging goes to stderr, the plan to stdout
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    let dir = cli.manifest.unwrap_or_else(|| settings.manifest.dir.clone());
    let manifest = loader::load_manifests(&dir)?;

    let identity = if cli.roles.is_empty() {
        StaticIdentity::anonymous()
    } else {
        StaticIdentity::with_roles(cli.roles)
    };
    let assigned_roles = identity.current_roles();

    let log = Arc::new(RegistrationLog::new());
    let collaborators = Collaborators {
        registry: log.clone(),
        identity: Arc::new(identity),
        issuer: Arc::new(PlanTokens),
        verifier: Arc::new(PlanTokens),
    };

    let gate = ActionGate::from_settings(&settings.gate, collaborators);
    if cli.auto_verify {
        gate.set_auto_verify(true);
    }

    let registrations = gate.register_manifest(&manifest, |_spec| planned_handler());

    print_plan(&Plan {
        assigned_roles,
        effective_roles: gate.effective_roles(),
        registrations: &registrations,
        hooks: log.entries(),
    })?;
    Ok(())
}

/// Stand-in handler; a plan never dispatches requests.
fn planned_handler() -> Handler {
    Arc::new(|_req: &ActionRequest| Ok(()))
}

fn print_plan(plan: &Plan<'_>) -> Result<(), AppError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, plan)?;
    writeln!(out)?;
    Ok(())
}
