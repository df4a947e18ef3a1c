use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use nocgen::config_loader::{self, CliOverrides};
use nocgen::orchestrator::{self, OutputFormat};
use nocgen::topology::TopologyKind;

/// Interconnection network topology generator for multi-node compute simulators
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology configuration YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output path for the generated network description
    #[arg(short, long, default_value = "network.json")]
    output: PathBuf,

    /// Output format (json or yaml); inferred from the output extension if omitted
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Override the topology selected in the configuration
    #[arg(short, long)]
    topology: Option<TopologyKind>,

    /// Override the number of CPUs (routers)
    #[arg(long)]
    num_cpus: Option<usize>,

    /// Run structural validation on the generated graph
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Configuration file: {:?}", args.config);
    info!("Output file: {:?}", args.output);

    let mut config = config_loader::load_config(&args.config)?;
    let overrides = CliOverrides {
        topology: args.topology,
        num_cpus: args.num_cpus,
    };
    config_loader::apply_overrides(&mut config, &overrides)?;

    let description = orchestrator::generate_network_description(&config)
        .wrap_err_with(|| format!("Failed to build {} topology", config.topology))?;

    if args.check {
        orchestrator::check_description(&description)?;
    }

    let format = args.format.unwrap_or_else(|| OutputFormat::from_path(&args.output));
    orchestrator::write_description(&description, &args.output, format)?;

    info!("Topology generation completed successfully");
    Ok(())
}
