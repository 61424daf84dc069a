//! Credhash CLI - hash and verify passwords with Argon2
//!
//! This is the command-line interface for credhash. It loads hashing
//! parameters once at startup and hands them to the core library.

mod config;
mod constants;
mod errors;
mod input;

use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use credhash_core::{Argon2Hasher, HashParameters, HasherConfig, PasswordHasher, VERSION};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigSource, CredhashConfig};
use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV};
use crate::errors::CliError;
use crate::input::{read_password, Prompt};

/// Credhash - hash and verify passwords with Argon2
#[derive(Parser)]
#[command(name = "credhash")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "CREDHASH_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: ParameterOverrides,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-field overrides applied on top of the config file.
#[derive(Args)]
struct ParameterOverrides {
    /// Argon2 variant (argon2id, argon2i, argon2d)
    #[arg(long, global = true, env = "CREDHASH_VARIANT")]
    variant: Option<String>,

    /// Memory cost in KiB
    #[arg(long, global = true, env = "CREDHASH_MEMORY_COST", allow_negative_numbers = true)]
    memory_cost: Option<i64>,

    /// Number of passes
    #[arg(long, global = true, env = "CREDHASH_TIME_COST", allow_negative_numbers = true)]
    time_cost: Option<i64>,

    /// Number of lanes
    #[arg(long, global = true, env = "CREDHASH_PARALLELISM", allow_negative_numbers = true)]
    parallelism: Option<i64>,

    /// Derived key length in bytes
    #[arg(long, global = true, env = "CREDHASH_KEY_LENGTH", allow_negative_numbers = true)]
    key_length: Option<i64>,

    /// Salt length in bytes
    #[arg(long, global = true, env = "CREDHASH_SALT_LENGTH", allow_negative_numbers = true)]
    salt_length: Option<i64>,
}

impl From<&ParameterOverrides> for HasherConfig {
    fn from(overrides: &ParameterOverrides) -> Self {
        HasherConfig {
            variant: overrides.variant.clone(),
            version: None,
            memory_cost: overrides.memory_cost,
            time_cost: overrides.time_cost,
            parallelism: overrides.parallelism,
            key_length: overrides.key_length,
            salt_length: overrides.salt_length,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password and print the encoded record
    Hash,

    /// Verify a password against an encoded record
    Verify {
        /// Stored encoded hash
        #[arg(value_name = "HASH")]
        hash: String,
    },

    /// Report whether an encoded record uses outdated parameters
    NeedsRehash {
        /// Stored encoded hash
        #[arg(value_name = "HASH")]
        hash: String,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective hashing parameters
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with the default parameters
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            eprintln!("Error: {}", cli_err);
            std::process::exit(cli_err.exit_code());
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Hash => {
            let hasher = load_hasher(cli)?;
            let password = read_password(Prompt::WithConfirmation)?;
            let encoded = hasher
                .hash(password.expose_secret())
                .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
            println!("{}", encoded);
        }
        Commands::Verify { hash } => {
            let hasher = load_hasher(cli)?;
            let password = read_password(Prompt::Once)?;
            match hasher.verify(password.expose_secret(), hash) {
                Ok(true) => {
                    if !cli.quiet {
                        println!("OK");
                    }
                    if let Ok(true) = hasher.needs_rehash(hash) {
                        eprintln!("Note: stored hash uses outdated parameters; rehash recommended.");
                    }
                }
                Ok(false) => return Err(CliError::AuthFailed.into()),
                Err(err) => {
                    // Detail stays out of the default log level so a corrupt
                    // record is indistinguishable from a wrong password.
                    tracing::debug!(
                        error = %err,
                        malformed_record = err.is_format(),
                        "verification error"
                    );
                    return Err(CliError::AuthFailed.into());
                }
            }
        }
        Commands::NeedsRehash { hash } => {
            let hasher = load_hasher(cli)?;
            let stale = hasher
                .needs_rehash(hash)
                .map_err(|e| CliError::invalid_input(e.to_string()))?;
            println!("{}", if stale { "yes" } else { "no" });
        }
        Commands::Config { action } => match action {
            ConfigCommand::Show { json } => {
                let (params, source) = load_parameters(cli)?;
                print_parameters(&params, &source, *json)?;
            }
            ConfigCommand::Init { force } => {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => config::default_config_path()?,
                };
                if path.exists() && !force {
                    return Err(CliError::invalid_input(format!(
                        "Config already exists: {} (use --force to overwrite)",
                        path.display()
                    ))
                    .into());
                }
                config::write_config(&path, &CredhashConfig::with_defaults())?;
                if !cli.quiet {
                    println!("Wrote {}", path.display());
                }
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "credhash", &mut io::stdout());
        }
    }

    Ok(())
}

fn load_parameters(cli: &Cli) -> anyhow::Result<(HashParameters, ConfigSource)> {
    let (file_config, source) = config::load_config(cli.config.as_deref())?;
    let params = config::resolve_parameters(file_config, HasherConfig::from(&cli.overrides))?;

    tracing::info!(
        source = ?source,
        variant = %params.variant(),
        version = params.version(),
        memory_cost = params.memory_cost(),
        time_cost = params.time_cost(),
        parallelism = params.parallelism(),
        key_length = params.key_length(),
        salt_length = params.salt_length(),
        "loaded hasher configuration"
    );

    Ok((params, source))
}

fn load_hasher(cli: &Cli) -> anyhow::Result<Argon2Hasher> {
    let (params, _) = load_parameters(cli)?;
    Ok(Argon2Hasher::new(params))
}

fn print_parameters(
    params: &HashParameters,
    source: &ConfigSource,
    json: bool,
) -> anyhow::Result<()> {
    let source_label = match source {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Defaults => "defaults".to_string(),
    };

    if json {
        let value = serde_json::json!({
            "source": source_label,
            "parameters": params,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Source: {}", source_label);
    println!("Variant: {}", params.variant());
    println!("Version: {}", params.version());
    println!("Memory cost: {} KiB", params.memory_cost());
    println!("Time cost: {}", params.time_cost());
    println!("Parallelism: {}", params.parallelism());
    println!("Key length: {} bytes", params.key_length());
    println!("Salt length: {} bytes", params.salt_length());
    Ok(())
}
