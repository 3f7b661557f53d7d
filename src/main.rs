// SPDX-License-Identifier: GPL-3.0-only
//! pam-monitor-probe: list attached displays and dry-run the presence check

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use pam_monitor::registry::{DISPLAY_CLASS, DeviceRegistry, DisplayDevice, Property, SystemRegistry};
use pam_monitor::sink::TracingSink;
use pam_monitor::{Gate, Options, Verdict};

#[macro_use]
extern crate tracing;

/// Inspect the displays pam_monitor sees
#[derive(Parser)]
#[command(name = "pam-monitor-probe", version, about)]
struct Cli {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List attached displays and their identifiers
    List,

    /// Run the authentication check against the attached displays
    Check {
        /// Identifier to look for, as given to monitor_uuid=
        monitor_uuid: String,
    },
}

#[derive(Debug, Serialize)]
struct DisplayEntry {
    name: String,
    identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl DisplayEntry {
    fn read(device: &impl DisplayDevice) -> Self {
        let name = device.name();
        match device.identifier() {
            Property::Text(id) => Self {
                name,
                identifier: Some(id),
                note: None,
            },
            Property::Absent => Self {
                name,
                identifier: None,
                note: None,
            },
            Property::Unexpected(note) => Self {
                name,
                identifier: None,
                note: Some(note),
            },
        }
    }

    /// One line of `list` output; `-` stands in for a missing identifier
    fn render(&self) -> String {
        let id = self.identifier.as_deref().unwrap_or("-");
        match &self.note {
            Some(note) => format!("{:<20} {} ({})", self.name, id, note),
            None => format!("{:<20} {}", self.name, id),
        }
    }
}

/// Process exit status for a `check` verdict
fn exit_status(verdict: Verdict) -> u8 {
    match verdict {
        Verdict::Granted => 0,
        Verdict::Denied => 1,
        Verdict::Misconfigured => 2,
    }
}

fn setup_logs() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Interactive tool: diagnostics go to the terminal only.
    let fmt_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn list(json: bool) -> Result<ExitCode> {
    let devices = SystemRegistry::default()
        .enumerate(DISPLAY_CLASS)
        .context("can't enumerate displays")?;

    // Handles are released as soon as each entry has been read.
    let entries: Vec<DisplayEntry> = devices.into_iter().map(|device| DisplayEntry::read(&device)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    if entries.is_empty() {
        println!("No displays attached");
    }
    for entry in &entries {
        println!("{}", entry.render());
    }

    Ok(ExitCode::SUCCESS)
}

fn check(monitor_uuid: String, json: bool) -> ExitCode {
    let options = Options::parse([format!("monitor_uuid={monitor_uuid}"), "debug".to_string()]);
    let verdict = Gate::new(SystemRegistry::default(), TracingSink).decide(&options);

    if json {
        println!("{}", serde_json::json!({ "verdict": format!("{verdict:?}") }));
    } else {
        println!("{verdict:?}");
    }

    ExitCode::from(exit_status(verdict))
}

fn main() -> ExitCode {
    setup_logs();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::List) {
        Commands::List => list(cli.json),
        Commands::Check { monitor_uuid } => Ok(check(monitor_uuid, cli.json)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
