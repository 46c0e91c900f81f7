//! Topolink CLI
//!
//! Command-line interface for:
//! - Reconstructing a connectivity graph from device + discovery exports
//! - Checking what the engine would see in a set of inputs, without
//!   emitting a graph

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use topolink_engine::Reconstruction;
use topolink_model::{NeighborObservation, PairedLink, StatusMap};

#[derive(Parser)]
#[command(name = "topolink")]
#[command(
    author,
    version,
    about = "Topolink: reconstruct network topology from neighbor discovery exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct the connectivity graph and write it as JSON.
    Reconstruct {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output path; stdout when omitted.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pretty-print the emitted JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Parse the inputs and report counts without emitting a graph.
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Known-device list (JSON array of records with a `serial`).
    #[arg(long)]
    devices: PathBuf,
    /// Pre-built link-layer topology (`{nodes?, links}`).
    #[arg(long)]
    link_layer: Option<PathBuf>,
    /// Per-device discovery tables (map of serial to payload).
    #[arg(long)]
    discovery: Option<PathBuf>,
    /// Flat discovery-by-device list (no port detail).
    #[arg(long)]
    flat: Option<PathBuf>,
    /// Monitoring status map (object or array form).
    #[arg(long)]
    statuses: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Reconstruct { inputs, out, pretty } => cmd_reconstruct(&inputs, out.as_deref(), pretty),
        Commands::Check { inputs } => cmd_check(&inputs),
    }
}

struct LoadedInputs {
    devices: Vec<topolink_model::DeviceRecord>,
    links: Vec<PairedLink>,
    observations: Vec<NeighborObservation>,
    statuses: StatusMap,
}

fn load_json(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_inputs(args: &InputArgs) -> Result<LoadedInputs> {
    let devices = topolink_ingest::parse_device_list(&load_json(&args.devices)?)
        .with_context(|| format!("ingesting {}", args.devices.display()))?;

    let mut links = Vec::new();
    if let Some(path) = &args.link_layer {
        links = topolink_ingest::parse_link_layer(&load_json(path)?)
            .with_context(|| format!("ingesting {}", path.display()))?;
    }

    let mut observations = Vec::new();
    if let Some(path) = &args.discovery {
        observations.extend(
            topolink_ingest::parse_discovery_tables(&load_json(path)?)
                .with_context(|| format!("ingesting {}", path.display()))?,
        );
    }
    if let Some(path) = &args.flat {
        observations.extend(
            topolink_ingest::parse_flat_discovery(&load_json(path)?)
                .with_context(|| format!("ingesting {}", path.display()))?,
        );
    }

    let statuses = match &args.statuses {
        Some(path) => topolink_ingest::parse_status_map(&load_json(path)?)
            .with_context(|| format!("ingesting {}", path.display()))?,
        None => StatusMap::new(),
    };

    Ok(LoadedInputs {
        devices,
        links,
        observations,
        statuses,
    })
}

fn cmd_reconstruct(args: &InputArgs, out: Option<&Path>, pretty: bool) -> Result<()> {
    let inputs = load_inputs(args)?;

    let mut run = Reconstruction::new(&inputs.devices);
    run.add_link_layer(&inputs.links);
    run.add_observations(&inputs.observations);
    let graph = run.finish(&inputs.statuses);

    eprintln!(
        "{} {} devices, {} paired links, {} observations",
        "Reconstructing".green().bold(),
        inputs.devices.len(),
        inputs.links.len(),
        inputs.observations.len()
    );
    eprintln!(
        "  {} {} nodes, {} links",
        "→".cyan(),
        graph.nodes.len(),
        graph.links.len()
    );

    let json = if pretty {
        serde_json::to_string_pretty(&graph)?
    } else {
        serde_json::to_string(&graph)?
    };
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_check(args: &InputArgs) -> Result<()> {
    println!("{} {}", "Checking".green().bold(), args.devices.display());
    let inputs = load_inputs(args)?;

    println!("  Devices: {}", inputs.devices.len());
    println!("  Paired links: {}", inputs.links.len());
    println!("  Observations: {}", inputs.observations.len());

    let mut run = Reconstruction::new(&inputs.devices);
    run.add_link_layer(&inputs.links);
    run.add_observations(&inputs.observations);
    let graph = run.finish(&inputs.statuses);

    let externals = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == "external")
        .count();
    let appliance_ports = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == "appliance-port")
        .count();
    println!(
        "    {} {} nodes ({} external, {} appliance ports), {} links",
        "→".cyan(),
        graph.nodes.len(),
        externals,
        appliance_ports,
        graph.links.len()
    );
    if externals > 0 {
        println!(
            "    {} {} neighbors did not match any known device",
            "→".yellow(),
            externals
        );
    }
    println!("{}", "Valid.".green());
    Ok(())
}
