//! Expansion management commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::session::Session;
use crate::plugin::LoadReport;

#[derive(Subcommand)]
pub enum ExpansionCommands {
    /// List registered expansions
    List,

    /// Load a single expansion binary and report the outcome
    Load {
        /// Path to the expansion binary
        path: PathBuf,
    },
}

pub fn run(cmd: ExpansionCommands, output: &Output, session: &Session) -> Result<()> {
    match cmd {
        ExpansionCommands::List => list_expansions(output, session),
        ExpansionCommands::Load { path } => {
            let report = session.load_binary(&path);
            print_report(output, &report);

            if !report.is_clean() {
                anyhow::bail!(
                    "{} expansion(s) failed to load from {}",
                    report.failures.len(),
                    path.display()
                );
            }
            Ok(())
        }
    }
}

fn list_expansions(output: &Output, session: &Session) -> Result<()> {
    let entries = session.registry.entries();

    if output.is_json() {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "identifier": e.identifier(),
                    "author": e.author(),
                    "capabilities": e.capabilities().to_vec(),
                    "origin": e.origin(),
                })
            })
            .collect();
        output.data(&items);
    } else if entries.is_empty() {
        println!("No expansions registered.");
        println!();
        println!("Expansions are loaded from:");
        println!("  - built-in core module (unless --no-builtins)");
        println!("  - .papi/expansions/ or --expansion-dir");
    } else {
        println!(
            "{:<16} {:<16} {:<28} ORIGIN",
            "IDENTIFIER", "AUTHOR", "CAPABILITIES"
        );
        println!("{}", "-".repeat(76));
        for entry in &entries {
            println!(
                "{:<16} {:<16} {:<28} {}",
                entry.identifier(),
                entry.author(),
                entry.capabilities().to_string(),
                entry.origin().unwrap_or("-")
            );
        }
    }

    for failure in &session.report.failures {
        output.error(&format!("{}: {}", failure.source, failure.error));
    }

    Ok(())
}

fn print_report(output: &Output, report: &LoadReport) {
    if output.is_json() {
        output.data(report);
        return;
    }

    for registration in &report.loaded {
        let note = if registration.replaced { " (replaced)" } else { "" };
        output.success(&format!(
            "Registered {} by {} [{}]{}",
            registration.identifier, registration.author, registration.capabilities, note
        ));
    }
    for failure in &report.failures {
        output.error(&format!("{}: {}", failure.source, failure.error));
    }
}
