//! Vesper CLI
//!
//! Command-line client for the Vesper epoch attestation protocol.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vesper_core::AttestationValue;

mod action;
mod commands;
mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "vesper")]
#[command(author, version, about = "Vesper: epoch-scoped private attestations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to ./vesper.toml when present)
    #[arg(short, long, global = true, env = "VESPER_CONFIG")]
    config: Option<PathBuf>,

    /// State file, overrides the configured store path
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show identity, epoch and data vectors
    Status,

    /// Mark the user as signed up at the current epoch (held for this invocation only)
    Signup,

    /// Apply an attestation to the pending data
    Attest {
        /// Field updates as INDEX=VALUE (decimal or 0x hex)
        #[arg(required = true, value_parser = parse_entry)]
        entries: Vec<(usize, AttestationValue)>,
    },

    /// Commit pending data into the provable snapshot
    Transition,

    /// Prove a claim about the committed data
    Prove {
        /// Claimed values as INDEX=VALUE; unspecified fields are zero
        #[arg(value_parser = parse_entry)]
        claims: Vec<(usize, AttestationValue)>,

        /// Output file for the proof payload (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a proof payload file
    Verify {
        /// Proof payload file
        proof: PathBuf,
    },

    /// Print epoch keys for the current epoch
    EpochKey {
        /// Only this nonce
        #[arg(short, long)]
        nonce: Option<u8>,
    },
}

fn parse_entry(s: &str) -> Result<(usize, AttestationValue), String> {
    let (index, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=VALUE, got {:?}", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid field index {:?}: {}", index, e))?;
    Ok((index, AttestationValue::Text(value.trim().to_string())))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vesper={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        settings.store_path = store;
    }

    match cli.command {
        Commands::Status => commands::status::show(&settings).await?,
        Commands::Signup => commands::user::signup(&settings).await?,
        Commands::Attest { entries } => {
            commands::user::attest(&settings, entries.into_iter().collect()).await?
        }
        Commands::Transition => commands::user::transition(&settings).await?,
        Commands::Prove { claims, output } => {
            commands::proof::prove(&settings, claims.into_iter().collect(), output).await?
        }
        Commands::Verify { proof } => commands::proof::verify(&settings, &proof).await?,
        Commands::EpochKey { nonce } => commands::user::epoch_keys(&settings, nonce).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("3=10").unwrap(),
            (3, AttestationValue::Text("10".into()))
        );
        assert_eq!(
            parse_entry(" 4 = 0x1f ").unwrap(),
            (4, AttestationValue::Text("0x1f".into()))
        );
        assert_eq!(
            parse_entry("2=").unwrap(),
            (2, AttestationValue::Text(String::new()))
        );
        assert!(parse_entry("10").is_err());
        assert!(parse_entry("x=1").is_err());
    }

    #[test]
    fn test_signup_help_mentions_session_scope() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let signup = cmd
            .find_subcommand("signup")
            .expect("signup subcommand");
        let about = signup.get_about().map(|s| s.to_string()).unwrap_or_default();
        assert!(about.contains("invocation only"), "{}", about);
    }

    #[test]
    fn test_cli_parses_prove() {
        let cli = Cli::try_parse_from(["vesper", "prove", "0=5", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Prove { claims, output } => {
                assert_eq!(claims.len(), 1);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected prove"),
        }
    }
}
