mod config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use access_scope::{AccessScopeLocalClient, AccessScopeService, Stores};
use access_scope_sdk::{
    AccessScopeClient, AccessScopeError, DocumentKind, Notice, OrgUnitId, ProfileId, Severity,
    UserId,
};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, load_dataset};

/// Access scope profiles and org-hierarchy filters
#[derive(Parser)]
#[command(name = "access-scope")]
#[command(version, about = "Access scope profiles and org-hierarchy filters")]
struct Cli {
    /// Dataset file (profiles, users, org units, employees, resources)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the entries of a profile
    Resolve { profile: String },
    /// Replace a user's scope set with a profile's entries
    Apply {
        user: String,
        profile: String,
        /// Write the resulting dataset to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Empty a user's scope set
    Clear {
        user: String,
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a user's current scope set
    Show { user: String },
    /// Build the candidate filter for a dependent field, e.g. `FactoryBusinessUnit.enterprise`
    Candidates {
        field: String,
        /// Selected ancestor value, e.g. `--set company=ACME`
        #[arg(long = "set", value_parser = parse_key_val)]
        selected: Vec<(String, String)>,
        /// Execute the filter and print matching records
        #[arg(long)]
        list: bool,
    },
    /// Print the effective permission grants of a user
    Grants { user: String },
    /// Print the row filter a user gets on a transaction document kind
    RecordFilter {
        user: String,
        #[arg(long)]
        doc: DocumentKind,
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Print the parent chain of an org unit
    Ancestors { unit: String },
    /// Report hierarchy violations of one unit, or of every unit
    Inspect { unit: Option<String> },
    /// Validate configuration and dataset, then exit
    Check,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    Ok((key.trim().to_owned(), value.to_owned()))
}

/// A failure the CLI reports as a notice instead of an error chain.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct Reported(AccessScopeError);

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config, cli.verbose);

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            if let Some(Reported(err)) = e.downcast_ref::<Reported>() {
                print_notice(&Notice::from(err));
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &AppConfig, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: &AppConfig) -> Result<ExitCode> {
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        bail!("no command given (see --help)");
    };
    let Some(data) = cli.data.as_deref() else {
        bail!("--data is required");
    };

    let stores = load_dataset(data)?
        .into_stores()
        .with_context(|| format!("invalid dataset {}", data.display()))?;
    let service = Arc::new(stores.service(&config.access_scope));
    tracing::info!(dataset = %data.display(), "dataset loaded");

    match command {
        Commands::Ancestors { unit } => {
            let chain = service
                .ancestors(&OrgUnitId::from(unit))
                .map_err(|e| Reported(e.into()))?;
            print_json(&chain)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { unit } => Ok(exit_code(inspect(&service, &stores, unit)?)),
        Commands::Check => {
            let violations = inspect(&service, &stores, None)?;
            if violations == 0 {
                println!("Dataset and configuration are valid.");
            }
            Ok(exit_code(violations))
        }
        Commands::Candidates {
            field,
            selected,
            list: true,
        } => {
            let selected: BTreeMap<String, String> = selected.into_iter().collect();
            let found = service
                .list_candidates(&field, &selected)
                .map_err(|e| Reported(e.into()))?;
            print_json(&found)?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let client = AccessScopeLocalClient::new(service);
            run_client_command(&client, &stores, command).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Commands served through the public client API.
async fn run_client_command(
    client: &dyn AccessScopeClient,
    stores: &Stores,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Resolve { profile } => {
            let entries = client
                .get_profile_entries(&ProfileId::from(profile))
                .await
                .map_err(Reported)?;
            print_json(&entries)
        }
        Commands::Apply {
            user,
            profile,
            save,
        } => {
            let outcome = client
                .apply_profile_to_user(&UserId::from(user), &ProfileId::from(profile))
                .await
                .map_err(Reported)?;
            print_notice(&Notice::from(&outcome));
            save_dataset(stores, save.as_deref())
        }
        Commands::Clear { user, save } => {
            client
                .clear_user_scope(&UserId::from(user))
                .await
                .map_err(Reported)?;
            println!("Access scope cleared.");
            save_dataset(stores, save.as_deref())
        }
        Commands::Show { user } => {
            let scope = client
                .get_user_scope(&UserId::from(user))
                .await
                .map_err(Reported)?;
            print_json(&scope)
        }
        Commands::Candidates {
            field, selected, ..
        } => {
            let selected: BTreeMap<String, String> = selected.into_iter().collect();
            let filter = client
                .resolve_hierarchy_candidates(&field, &selected)
                .await
                .map_err(Reported)?;
            print_json(&filter)
        }
        Commands::Grants { user } => {
            let grants = client
                .materialize_grants(&UserId::from(user))
                .await
                .map_err(Reported)?;
            print_json(&grants)
        }
        Commands::RecordFilter { user, doc, roles } => {
            let filter = client
                .record_filter(&UserId::from(user), &roles, doc)
                .await
                .map_err(Reported)?;
            print_json(&filter)
        }
        Commands::Ancestors { .. } | Commands::Inspect { .. } | Commands::Check => {
            bail!("not a client command")
        }
    }
}

/// Prints hierarchy violations and returns how many were found.
fn inspect(service: &AccessScopeService, stores: &Stores, unit: Option<String>) -> Result<usize> {
    let units: Vec<OrgUnitId> = match unit {
        Some(unit) => vec![OrgUnitId::from(unit)],
        None => stores.units.all_units().into_iter().map(|u| u.id).collect(),
    };

    let mut total = 0usize;
    for unit_id in &units {
        let violations = service
            .inspect(unit_id)
            .map_err(|e| Reported(e.into()))?;
        for violation in &violations {
            println!("{unit_id}: {violation}");
        }
        total += violations.len();
    }

    if total > 0 {
        tracing::warn!(violations = total, units = units.len(), "hierarchy violations found");
    }
    Ok(total)
}

fn exit_code(violations: usize) -> ExitCode {
    if violations == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn save_dataset(stores: &Stores, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(&stores.snapshot())?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "dataset saved");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_notice(notice: &Notice) {
    let line = format!("{}: {}", notice.title, notice.message);
    match notice.severity {
        Severity::Info => println!("{line}"),
        Severity::Warning => println!("Warning: {line}"),
        Severity::Error => eprintln!("Error: {line}"),
    }
}
