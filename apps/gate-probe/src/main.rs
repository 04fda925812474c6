//! `gate-probe`: drive the access gate from the command line.
//!
//! Evaluates navigations against the configured backend and manages the
//! cached admin record the gate relies on.

mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use access_gate::{AccessGate, Evaluation, FileSessionStore, HttpSessionVerifier};
use access_gate_sdk::{
    AuthRecord, AuthorizationVerdict, GateDecision, SessionCredential, SessionStore,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::ProbeConfig;

#[derive(Parser)]
#[command(name = "gate-probe", version, about = "Check admin route access through the access gate")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, env = "GATE_PROBE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter override, e.g. `debug` or `access_gate=trace`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one navigation and print the decision as JSON.
    Check {
        /// Requested location, e.g. `/admin/posts?page=2`.
        target: String,

        /// Session cookie forwarded to the backend, e.g. `sid=abc123`.
        #[arg(long, env = "GATE_PROBE_COOKIE", hide_env_values = true)]
        cookie: Option<String>,
    },
    /// Store an admin profile in the session cache, as a successful login would.
    Login {
        /// Profile JSON, e.g. `{"name":"Alice"}`.
        #[arg(long)]
        profile: String,
    },
    /// Remove the cached admin profile.
    Logout,
    /// Print the cached admin profile.
    Show,
    /// Print the effective configuration.
    Config,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    target: &'a str,
    verdict: AuthorizationVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<String>,
    decision: GateDecision<&'static str>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = ProbeConfig::load(cli.config.as_deref())?;
    logging::init(&cfg.logging, cli.log_level.as_deref())?;

    let store = FileSessionStore::from_config(&cfg.access_gate.storage);

    match cli.command {
        Command::Check { target, cookie } => check(&cfg, store, &target, cookie).await,
        Command::Login { profile } => {
            let profile: serde_json::Value =
                serde_json::from_str(&profile).context("profile is not valid JSON")?;
            anyhow::ensure!(!profile.is_null(), "profile must not be null");
            store.write(&AuthRecord::new(profile)).await?;
            info!(path = %store.path().display(), "Admin profile cached");
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            store.clear().await?;
            info!(path = %store.path().display(), "Admin profile cleared");
            Ok(ExitCode::SUCCESS)
        }
        Command::Show => {
            match store.read().await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(record.profile())?),
                None => println!("null"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn check(
    cfg: &ProbeConfig,
    store: FileSessionStore,
    target: &str,
    cookie: Option<String>,
) -> anyhow::Result<ExitCode> {
    let verifier = HttpSessionVerifier::new(&cfg.access_gate)?;
    let gate = AccessGate::new(Arc::new(store), Arc::new(verifier), &cfg.access_gate)?;
    let credential = cookie.map_or_else(SessionCredential::none, SessionCredential::cookie);

    let nav = gate.begin(target);
    let outcome = match gate.evaluate(nav, &credential).await {
        Evaluation::Committed(outcome) => outcome,
        Evaluation::Superseded => anyhow::bail!("navigation to {target} was superseded"),
    };

    let report = CheckReport {
        target,
        verdict: outcome.verdict,
        cause: outcome.cause.as_ref().map(ToString::to_string),
        decision: gate.decide(outcome.verdict, target, "protected content"),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if outcome.verdict.is_granted() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
