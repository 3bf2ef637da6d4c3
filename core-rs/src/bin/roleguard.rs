//! RoleGuard CLI
//!
//! Command-line interface over the local credential store

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roleguard_core::storage::validate_code;
use roleguard_core::{
    BadgeTone, CodeAuthenticator, CredentialStore, DelegationAuthority, RoleBadge,
    RoleGuardConfig, RoleGuardError, RoleKind, RoleManager, RoleResolver, StoreBackend,
    StoreWatcher,
};

#[derive(Parser)]
#[command(name = "roleguard")]
#[command(version)]
#[command(about = "Local role access and unlock-code management", long_about = None)]
struct Cli {
    /// Path to a .roleguard.yaml (default: ./.roleguard.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active role
    Whoami {
        /// Print the role badge as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enter a 6-digit access code to change role
    Unlock {
        code: String,
    },
    /// Check gate tags against the active role (exit 1 if any is hidden)
    Access {
        /// Required-role tags (e.g. admin, betaTester)
        #[arg(required = true)]
        roles: Vec<String>,
    },
    /// Check whether the active role may manage another role's code
    CanManage {
        role: String,
    },
    /// List the unlock codes the active role may view
    Codes,
    /// Rotate the owner or admin unlock code
    Rotate {
        /// owner or admin
        role: String,
        /// New 6-digit code
        code: String,
    },
    /// Manage custom roles (list, add, update, delete)
    Custom {
        #[command(subcommand)]
        command: CustomCommands,
    },
    /// Overwrite the active role without a code (unchecked)
    #[command(hide = true)]
    SetRole {
        role: String,
    },
    /// Print role changes made by other processes until interrupted
    Watch,
}

#[derive(Subcommand)]
enum CustomCommands {
    /// List custom role names
    List,
    /// Add a custom role
    Add {
        name: String,
        code: String,
    },
    /// Change a custom role's code
    Update {
        name: String,
        code: String,
    },
    /// Delete a custom role
    Delete {
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config, cli.verbose);

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<RoleGuardError>() {
                Some(RoleGuardError::Validation(msg)) => eprintln!("Invalid input: {}", msg),
                Some(RoleGuardError::PermissionDenied(msg)) => eprintln!("Denied: {}", msg),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RoleGuardConfig> {
    match path {
        Some(path) => RoleGuardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => RoleGuardConfig::load_from_dir(".").context("Failed to load .roleguard.yaml"),
    }
}

fn init_tracing(config: &RoleGuardConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &RoleGuardConfig) -> anyhow::Result<ExitCode> {
    let store = config.open_store();

    match command {
        Commands::Whoami { json } => handle_whoami(&store, json),
        Commands::Unlock { code } => handle_unlock(&store, &code),
        Commands::Access { roles } => handle_access(&store, &roles),
        Commands::CanManage { role } => {
            let allowed = DelegationAuthority::new(&store).can_manage_role(&role)?;
            println!("{}", if allowed { "yes" } else { "no" });
            Ok(exit_for(allowed))
        }
        Commands::Codes => handle_codes(&store),
        Commands::Rotate { role, code } => {
            RoleManager::new(&store).rotate_code(&role, &code)?;
            println!("✓ {} code updated", role);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Custom { command } => handle_custom(&store, command),
        Commands::SetRole { role } => handle_set_role(&store, &role),
        Commands::Watch => handle_watch(store, config),
    }
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn render_badge(badge: &RoleBadge) -> String {
    let role = badge.role.as_str();
    let mut rendered = match badge.tone {
        BadgeTone::Developer => role.purple().bold().to_string(),
        BadgeTone::Owner => role.blue().bold().to_string(),
        BadgeTone::Admin => role.green().bold().to_string(),
        BadgeTone::Visitor => role.white().to_string(),
        BadgeTone::Custom => role.yellow().bold().to_string(),
    };
    if badge.publish_enabled {
        rendered.push_str(&format!(" {}", "[Publish Enabled]".purple()));
    }
    rendered
}

/// Handle `roleguard whoami` command
fn handle_whoami(store: &CredentialStore, json: bool) -> anyhow::Result<ExitCode> {
    let badge = RoleBadge::current(store)?;
    if json {
        println!("{}", serde_json::to_string(&badge)?);
    } else {
        println!("Current role: {}", render_badge(&badge));
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle `roleguard unlock <code>` command
fn handle_unlock(store: &CredentialStore, code: &str) -> anyhow::Result<ExitCode> {
    if validate_code(code).is_err() {
        eprintln!("Invalid code format: code must be exactly 6 digits");
        return Ok(ExitCode::FAILURE);
    }

    if CodeAuthenticator::new(store).try_become_role(code)? {
        let badge = RoleBadge::current(store)?;
        println!("✓ You are now: {}", render_badge(&badge));
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Invalid code: the code you entered doesn't match any role");
        Ok(ExitCode::FAILURE)
    }
}

/// Handle `roleguard access <role>...` command
fn handle_access(store: &CredentialStore, roles: &[String]) -> anyhow::Result<ExitCode> {
    let decisions = RoleResolver::new(store).visible_gates(roles)?;
    for decision in &decisions {
        let state = if decision.visible {
            "visible".green()
        } else {
            "hidden".red()
        };
        println!("{}: {}", decision.tag, state);
    }
    Ok(exit_for(decisions.iter().all(|d| d.visible)))
}

/// Handle `roleguard codes` command
fn handle_codes(store: &CredentialStore) -> anyhow::Result<ExitCode> {
    let listing = RoleManager::new(store).code_listing()?;
    if listing.is_empty() {
        println!("No codes are visible to role '{}'", store.current_role()?);
        return Ok(ExitCode::SUCCESS);
    }
    for entry in listing {
        println!("{:<16} {}", entry.role, entry.code);
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle `roleguard custom ...` commands
fn handle_custom(store: &CredentialStore, command: CustomCommands) -> anyhow::Result<ExitCode> {
    let manager = RoleManager::new(store);
    match command {
        CustomCommands::List => {
            let roles = store.custom_roles()?;
            if roles.is_empty() {
                println!("No custom roles yet.");
            }
            for name in roles.names() {
                println!("{}", name);
            }
        }
        CustomCommands::Add { name, code } => {
            manager.add_custom_role(&name, &code)?;
            println!("✓ Custom role \"{}\" added", name.trim());
        }
        CustomCommands::Update { name, code } => {
            manager.update_custom_role_code(&name, &code)?;
            println!("✓ Code for \"{}\" updated", name.trim());
        }
        CustomCommands::Delete { name } => {
            if manager.delete_custom_role(&name)? {
                println!("✓ Custom role \"{}\" removed", name);
            } else {
                println!("Custom role \"{}\" did not exist", name);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle `roleguard set-role <role>` command
fn handle_set_role(store: &CredentialStore, role: &str) -> anyhow::Result<ExitCode> {
    let custom_roles = store.custom_roles()?;
    if RoleKind::classify(role, &custom_roles) == RoleKind::Unregistered {
        eprintln!(
            "{} '{}' is not a known role; it will not pass any ranked gate",
            "warning:".yellow(),
            role
        );
    }
    store.set_current_role_unchecked(role)?;
    println!("Active role set to '{}'", role);
    Ok(ExitCode::SUCCESS)
}

/// Handle `roleguard watch` command
fn handle_watch(store: CredentialStore, config: &RoleGuardConfig) -> anyhow::Result<ExitCode> {
    if config.store.backend != StoreBackend::File {
        bail!("watch requires the file store backend");
    }

    let path = config.store_path();
    let printer = store.clone();
    let _subscription = store.subscribe(move |_| match RoleBadge::current(&printer) {
        Ok(badge) => println!("Current role: {}", render_badge(&badge)),
        Err(e) => eprintln!("Error: {}", e),
    });
    let watcher = StoreWatcher::start(store.clone(), &path)
        .with_context(|| format!("Failed to watch {}", path.display()))?;

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Failed to install Ctrl+C handler")?;

    println!("Watching {} (Ctrl+C to stop)", path.display());
    handle_whoami(&store, false)?;

    // Blocks until Ctrl+C; a closed channel also ends the watch
    let _ = stop_rx.recv();
    drop(watcher);
    eprintln!("Stopped watching {}", path.display());
    Ok(ExitCode::SUCCESS)
}
