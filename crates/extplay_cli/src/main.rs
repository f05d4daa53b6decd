//! EXTPLAY CLI
//!
//! Inspection tool for recorded traces.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand};
use color_eyre::Result;
use extplay_core::{PlaybackError, PlayerConfig};
use extplay_player::Player;
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "extplay")]
#[command(about = "EXTPLAY - deterministic trace player", long_about = None)]
struct Cli {
    /// Player configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Skip argument comparison
    #[arg(long, global = true)]
    relaxed: bool,
    /// Maximum in-flight records
    #[arg(long, global = true)]
    slots: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the trace header
    Header {
        /// Path to trace file
        trace: PathBuf,
    },
    /// List the raw record stream
    Inspect {
        /// Path to trace file
        trace: PathBuf,
        /// Stop after this many records
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print one JSON object per record
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EXTPLAY_LOG")
                .unwrap_or_else(|_| EnvFilter::new("extplay_trace=info,extplay_player=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => Ok(()),
        Err(report) => match report.downcast_ref::<PlaybackError>() {
            Some(err) => {
                error!(kind = ?err.kind(), "{err}");
                eprintln!("error: {err}");
                std::process::exit(err.exit_code());
            }
            None => Err(report),
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), cli.relaxed, cli.slots)?;
    let mut out = io::stdout().lock();
    match &cli.command {
        Commands::Header { trace } => {
            let player = Player::open(trace, config)?;
            let header = player.header();
            writeln!(out, "version: {}", header.version)?;
            writeln!(out, "cmdline: {}", header.cmdline)?;
        }
        Commands::Inspect { trace, limit, json } => {
            let mut player = Player::open(trace, config)?;
            inspect(&mut player, *limit, *json, &mut out)?;
        }
    }
    Ok(())
}

/// Config file (if any) with command line overrides applied
fn load_config(path: Option<&Path>, relaxed: bool, slots: Option<usize>) -> Result<PlayerConfig> {
    let mut config = match path {
        Some(path) => PlayerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PlayerConfig::default(),
    };
    if relaxed {
        config.strict_checks = false;
    }
    if let Some(slots) = slots {
        config.slot_capacity = slots;
    }
    config.validate()?;
    Ok(config)
}

/// Walk the record stream up to the sentinel, returning records printed
fn inspect(
    player: &mut Player,
    limit: Option<usize>,
    as_json: bool,
    out: &mut impl Write,
) -> Result<usize> {
    let mut printed = 0;
    while limit.is_none_or(|limit| printed < limit) {
        let offset = player.offset();
        let handle = player.next_call(false)?;
        let record = player.release(handle)?;
        if record.is_sentinel() {
            break;
        }

        if as_json {
            let line = json!({ "offset": offset, "record": record });
            writeln!(out, "{line}")?;
        } else {
            let direction = record
                .direction()
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            writeln!(out, "{offset:>10}  {direction:<5}  {}", record.opcode())?;
        }
        printed += 1;
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use extplay_calls::{Rand, Srand};
    use extplay_test_utils::TraceBuilder;

    fn player() -> Player {
        let mut rand = Rand::new();
        rand.res = 3;
        let bytes = TraceBuilder::new().call(&Srand::new(42)).call(&rand).build();
        Player::from_bytes(bytes, PlayerConfig::default()).unwrap()
    }

    #[test]
    fn test_inspect_lists_both_halves() {
        let mut out = Vec::new();
        let printed = inspect(&mut player(), None, false, &mut out).unwrap();
        assert_eq!(printed, 4);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].contains("start"));
        assert!(lines[0].contains("3 (srand)"));
        assert!(lines[1].contains("end"));
        assert!(lines[3].contains("4 (rand)"));
    }

    #[test]
    fn test_inspect_limit() {
        let mut out = Vec::new();
        assert_eq!(inspect(&mut player(), Some(1), false, &mut out).unwrap(), 1);
    }

    #[test]
    fn test_inspect_json() {
        let mut out = Vec::new();
        inspect(&mut player(), Some(1), true, &mut out).unwrap();
        let line: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(line["record"]["call"]["Srand"]["seed"], 42);
        assert_eq!(line["record"]["start"], true);
    }

    #[test]
    fn test_load_config_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "slot_capacity": 12 }"#).unwrap();

        let config = load_config(Some(file.path()), true, None).unwrap();
        assert_eq!(config.slot_capacity, 12);
        assert!(!config.strict_checks);

        let config = load_config(None, false, Some(4)).unwrap();
        assert_eq!(config.slot_capacity, 4);
        assert!(config.strict_checks);
    }

    #[test]
    fn test_load_config_rejects_tiny_pool() {
        let err = load_config(None, false, Some(1)).unwrap_err();
        assert!(err.downcast_ref::<PlaybackError>().is_some());
    }
}
