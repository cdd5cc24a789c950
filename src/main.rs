use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use nimiq_devnet::config_loader;
use nimiq_devnet::node::Node;
use nimiq_devnet::orchestrator::Topology;
use nimiq_devnet::template::{JinjaTemplates, TemplateEngine};
use nimiq_devnet::utils::binary::{resolve_binary_path, validate_binary};

/// Configuration generator for local Nimiq devnets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the topology YAML file
    #[arg(short, long)]
    topology: PathBuf,

    /// Directory with custom node templates (defaults to the built-in ones)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Remove previously generated configuration, state and logs first
    #[arg(long)]
    clean: bool,

    /// Warn about node binaries that have not been built yet
    #[arg(long)]
    check_binaries: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Topology file: {:?}", args.topology);

    let config = config_loader::load_config(&args.topology)?;
    let settings = &config.settings;

    if args.clean {
        for dir in [&settings.conf_dir, &settings.state_dir, &settings.logs_dir] {
            check_clean_target(dir, &settings.nimiq_dir)?;
            if dir.exists() {
                info!("Removing previous devnet directory {:?}", dir);
                fs::remove_dir_all(dir)
                    .wrap_err_with(|| format!("Failed to remove directory '{}'", dir.display()))?;
            }
        }
    }

    let topology = Topology::from_config(&config)?;

    if args.check_binaries {
        for node in topology.nodes() {
            let binary = resolve_binary_path(topology.settings(), node.role().binary());
            if let Err(e) = validate_binary(&binary) {
                warn!("Node '{}': {}", node.name(), e);
            }
        }
    }

    let templates: Box<dyn TemplateEngine> = match &args.templates {
        Some(dir) => {
            info!("Using templates from {:?}", dir);
            Box::new(JinjaTemplates::from_dir(dir))
        }
        None => Box::new(JinjaTemplates::builtin()?),
    };

    let summary = topology.generate(templates.as_ref())?;

    info!("Generated {} file(s)", summary.files.len());
    info!("Node registry: {:?}", summary.registry_path);
    info!("Configuration generation completed successfully");
    Ok(())
}

/// Refuse to clean a filesystem root, the working directory, or anything that
/// contains the Nimiq checkout.
fn check_clean_target(dir: &Path, nimiq_dir: &Path) -> Result<()> {
    let dir = absolute(dir)?;
    let nimiq_dir = absolute(nimiq_dir)?;
    let cwd = absolute(Path::new("."))?;

    if dir.parent().is_none() {
        bail!("Refusing to clean '{}': it is a filesystem root", dir.display());
    }
    if nimiq_dir.starts_with(&dir) {
        bail!(
            "Refusing to clean '{}': it contains the Nimiq directory '{}'",
            dir.display(),
            nimiq_dir.display()
        );
    }
    if cwd.starts_with(&dir) {
        bail!("Refusing to clean '{}': it contains the working directory", dir.display());
    }
    Ok(())
}

/// Absolute form of `path`, resolving symlinks when it exists.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return fs::canonicalize(path)
            .wrap_err_with(|| format!("Failed to resolve '{}'", path.display()));
    }
    std::path::absolute(path).wrap_err_with(|| format!("Failed to resolve '{}'", path.display()))
}
