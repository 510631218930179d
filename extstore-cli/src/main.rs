//! extstore command-line host
//!
//! Runs the splice record commands against a document kept in a JSON file,
//! so successive invocations see each other's schemas and records.
//!
//! Usage:
//!   extstore --document site.json add-element "Junction Box"
//!   extstore --document site.json write --element 1000
//!   extstore --document site.json read

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extstore_cli::{ConsoleNotifier, PromptPicker, Session};
use extstore_commands::{CommandConfig, CommandReport, DeleteCommand, ReadCommand, WriteCommand};
use extstore_host::{SchemaStore, ScriptedPicker, Selectable};
use extstore_types::ElementId;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "extstore")]
#[command(about = "Write and read schema-backed records on document elements")]
struct Args {
    /// Path to the document file (created on first save)
    #[arg(short, long, default_value = "extstore-document.json")]
    document: PathBuf,

    /// Path to a JSON command config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an element to the document
    AddElement { name: String },
    /// List the document's elements
    Elements,
    /// List registered schemas
    Schemas,
    /// Write the splice record to an element
    Write {
        #[arg(short, long)]
        element: Option<ElementId>,
    },
    /// Show the splice record of an element
    Read {
        #[arg(short, long)]
        element: Option<ElementId>,
    },
    /// Remove the splice record from an element
    Delete {
        #[arg(short, long)]
        element: Option<ElementId>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => CommandConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CommandConfig::default(),
    };
    debug!(?config, "Config loaded");

    let session = Session::open(&args.document, &config.vendor_id)?;

    match args.command {
        Command::AddElement { name } => {
            let id = session.document().add_element(&name)?;
            session.save()?;
            println!("{id}");
        }
        Command::Elements => {
            for element in session.document().elements() {
                let marker = if element.deleted { " (deleted)" } else { "" };
                println!("{}\t{}{}", element.id, element.name, marker);
            }
        }
        Command::Schemas => {
            for schema in session.registry().list()? {
                let fields: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
                println!(
                    "{}\t{}\tvendor={}\tfields={}",
                    schema.id(),
                    schema.name(),
                    schema.vendor_id(),
                    fields.join(", ")
                );
            }
        }
        Command::Write { element } => {
            let picker = picker_for(element);
            let report = session.run_and_save(picker.as_ref(), &notifier(), |host| {
                WriteCommand::new(config)?.execute(host)
            })?;
            log_report("write", &report);
        }
        Command::Read { element } => {
            let picker = picker_for(element);
            let shown = notifier();
            let report = ReadCommand::new(config)?.execute(&session.context(picker.as_ref(), &shown))?;
            log_report("read", &report);
        }
        Command::Delete { element } => {
            let picker = picker_for(element);
            let report = session.run_and_save(picker.as_ref(), &notifier(), |host| {
                DeleteCommand::new(config)?.execute(host)
            })?;
            log_report("delete", &report);
        }
    }
    Ok(())
}

/// Selects `element` when given, otherwise prompts on stdin.
fn picker_for(element: Option<ElementId>) -> Box<dyn Selectable> {
    match element {
        Some(id) => Box::new(ScriptedPicker::picking(id)),
        None => Box::new(PromptPicker::new(io::stdin().lock(), io::stdout())),
    }
}

fn notifier() -> ConsoleNotifier<io::Stdout> {
    ConsoleNotifier::new(io::stdout())
}

fn log_report(command: &str, report: &CommandReport) {
    info!(
        command,
        outcome = ?report.outcome,
        trail = ?report.trail.states(),
        "Command finished"
    );
}
