//! Command-line front end for operating a twin.
//!
//! ```bash
//! # Feed one reading
//! childeye-twin update --hr 118 --rr 32 --temp 36.9 --face happy --cry laugh
//!
//! # Feed a device payload
//! childeye-twin update --device --json '{"heart_rate": 150, "resp_rate": 48}'
//!
//! # Inspect and maintain
//! childeye-twin current
//! childeye-twin history --limit 20
//! childeye-twin report
//! childeye-twin reset
//! ```

use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::models::{Reading, VitalsPayload};
use crate::settings::{SettingsStore, StorageBackend, TwinSettings};
use crate::twin::{scenarios, DigitalTwin};
use crate::{TwinError, HISTORY_CAPACITY};

/// Child-monitoring digital twin
#[derive(Parser, Debug)]
#[command(name = "childeye-twin")]
#[command(author, version, about = "Child-monitoring digital twin state tracker")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = "childeye-twin.json")]
    pub settings: PathBuf,

    /// Override the storage directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the storage backend (json, sqlite, memory)
    #[arg(long, global = true)]
    pub backend: Option<StorageBackend>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a reading, predict, and persist the new state
    Update(UpdateArgs),

    /// Print the current state
    Current,

    /// Print recent history, oldest first
    History {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Generate and persist a report over the retained history
    Report {
        /// Print the last persisted report instead of generating one
        #[arg(long)]
        last: bool,
    },

    /// Clear current state, history and report
    Reset,

    /// Run the canned scenarios and print a summary table
    Simulate,

    /// Show or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    #[arg(long)]
    pub hr: Option<f64>,
    #[arg(long)]
    pub rr: Option<f64>,
    #[arg(long)]
    pub temp: Option<f64>,
    #[arg(long)]
    pub face: Option<String>,
    #[arg(long)]
    pub cry: Option<String>,
    #[arg(long)]
    pub sleep: Option<String>,

    /// Reading as JSON; `-` reads stdin. Flags are ignored when set.
    #[arg(long)]
    pub json: Option<String>,

    /// Treat `--json` as a device payload (heart_rate, resp_rate, ...)
    #[arg(long, requires = "json")]
    pub device: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print effective settings
    Show,

    /// Update the settings file
    Set {
        #[arg(long)]
        backend: Option<StorageBackend>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// History entries kept, 1 to 200
        #[arg(long, value_parser = parse_capacity)]
        capacity: Option<usize>,
    },
}

fn parse_capacity(raw: &str) -> std::result::Result<usize, String> {
    let capacity: usize = raw.parse().map_err(|err| format!("{err}"))?;
    if (1..=HISTORY_CAPACITY).contains(&capacity) {
        Ok(capacity)
    } else {
        Err(format!("capacity must be between 1 and {HISTORY_CAPACITY}"))
    }
}

impl UpdateArgs {
    pub fn into_reading(self) -> Result<Reading> {
        let Some(raw) = self.json else {
            return Ok(Reading {
                hr: self.hr,
                rr: self.rr,
                temp: self.temp,
                face_emotion: self.face,
                cry_emotion: self.cry,
                sleep_state: self.sleep,
            });
        };

        let raw = if raw == "-" {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read reading from stdin")?;
            buffer
        } else {
            raw
        };

        if self.device {
            let payload: VitalsPayload =
                serde_json::from_str(&raw).context("invalid device payload")?;
            Ok(payload.into())
        } else {
            serde_json::from_str(&raw).context("invalid reading")
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn effective_settings(cli: &Cli, stored: TwinSettings) -> Result<TwinSettings> {
    let mut settings = stored.with_env_overrides()?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    Ok(settings)
}

fn configure(store: &SettingsStore, effective: TwinSettings, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => print_json(&effective),
        ConfigCommand::Set {
            backend,
            data_dir,
            capacity,
        } => {
            let updated = store.update(|s| {
                if let Some(backend) = backend {
                    s.backend = backend;
                }
                if let Some(dir) = data_dir {
                    s.data_dir = dir;
                }
                if let Some(capacity) = capacity {
                    s.history_capacity = capacity;
                }
            })?;
            print_json(&updated)
        }
    }
}

/// Open the configured store, run `action`, then flush the store even if
/// the action failed.
fn with_twin<F>(settings: &TwinSettings, action: F) -> Result<()>
where
    F: FnOnce(&DigitalTwin) -> Result<()>,
{
    let twin = DigitalTwin::new(settings.open_store()?);
    let outcome = action(&twin);
    twin.shutdown()?;
    outcome
}

fn print_simulation(twin: &DigitalTwin) -> Result<()> {
    let outcomes = scenarios::run(twin, &scenarios::canonical())?;
    println!(
        "{:<16} | {:<10} | {:<18} | {:<6} | Reason",
        "Case", "Status", "Prediction", "Conf."
    );
    println!("{}", "-".repeat(80));
    for outcome in outcomes {
        println!(
            "{:<16} | {:<10} | {:<18} | {:<6.2} | {}",
            outcome.name, outcome.status, outcome.prediction, outcome.confidence, outcome.reason
        );
    }
    Ok(())
}

pub fn execute(cli: Cli) -> Result<()> {
    let settings_store = SettingsStore::new(cli.settings.clone())?;
    let settings = effective_settings(&cli, settings_store.settings())?;

    match cli.command {
        Commands::Config(command) => configure(&settings_store, settings, command),
        Commands::Update(args) => {
            let reading = args.into_reading()?;
            with_twin(&settings, |twin| match twin.update(&reading) {
                Ok(state) => print_json(&state),
                Err(TwinError::StorageWrite { state, source }) => {
                    print_json(&state)?;
                    Err(anyhow::Error::new(source).context("state was not persisted"))
                }
                Err(err) => Err(err.into()),
            })
        }
        Commands::Current => with_twin(&settings, |twin| match twin.current()? {
            Some(state) => print_json(&state),
            None => {
                println!("null");
                Ok(())
            }
        }),
        Commands::History { limit } => with_twin(&settings, |twin| print_json(&twin.history(limit))),
        Commands::Report { last } => with_twin(&settings, |twin| {
            let report = if last {
                twin.last_report()?
            } else {
                twin.generate_report()?
            };
            print_json(&report)
        }),
        Commands::Reset => with_twin(&settings, |twin| {
            twin.reset()?;
            print_json(&serde_json::json!({ "status": "reset_done" }))
        }),
        Commands::Simulate => with_twin(&settings, print_simulation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_update_flags() {
        let cli = Cli::parse_from([
            "childeye-twin",
            "update",
            "--hr",
            "150",
            "--rr",
            "50",
            "--cry",
            "pain",
        ]);
        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        let reading = args.into_reading().unwrap();
        assert_eq!(reading.hr, Some(150.0));
        assert_eq!(reading.cry_emotion.as_deref(), Some("pain"));
        assert!(reading.temp.is_none());
    }

    #[test]
    fn json_reading_wins_over_flags() {
        let args = UpdateArgs {
            hr: Some(80.0),
            json: Some(r#"{"hr": 120, "face_emotion": "sleep"}"#.into()),
            ..UpdateArgs::default()
        };
        let reading = args.into_reading().unwrap();
        assert_eq!(reading.hr, Some(120.0));
        assert_eq!(reading.face_emotion.as_deref(), Some("sleep"));
    }

    #[test]
    fn device_payload_gets_default_labels() {
        let args = UpdateArgs {
            json: Some(r#"{"heart_rate": 100, "resp_rate": 30}"#.into()),
            device: true,
            ..UpdateArgs::default()
        };
        let reading = args.into_reading().unwrap();
        assert_eq!(reading.cry_emotion.as_deref(), Some("silence"));
    }

    #[test]
    fn capacity_outside_history_bound_is_rejected() {
        let parse = |capacity: &str| {
            Cli::try_parse_from(["childeye-twin", "config", "set", "--capacity", capacity])
        };
        assert!(parse("0").is_err());
        assert!(parse("500").is_err());

        let Commands::Config(ConfigCommand::Set { capacity, .. }) = parse("150").unwrap().command
        else {
            panic!("expected config set");
        };
        assert_eq!(capacity, Some(150));
    }

    #[test]
    fn global_backend_override() {
        let cli = Cli::parse_from(["childeye-twin", "current", "--backend", "memory"]);
        let settings = effective_settings(&cli, TwinSettings::default()).unwrap();
        assert_eq!(settings.backend, StorageBackend::Memory);
    }
}
