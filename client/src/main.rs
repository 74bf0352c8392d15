#![doc = include_str!("../README.md")]

use crate::cli::CliOpts;
use clap::Parser;
use color_eyre::{
	eyre::{eyre, WrapErr},
	Result,
};
use feature_lens_core::{
	catalog::Catalog,
	network::{self, rpc},
	registry::Registry,
	utils::{default_subscriber, install_panic_hooks, json_subscriber},
};
use std::{fs, time::Duration};
use tracing::{info, warn};

use crate::config::RuntimeConfig;

mod cli;
mod config;

pub fn load_runtime_config(opts: &CliOpts) -> Result<RuntimeConfig> {
	let mut cfg = if let Some(config_path) = &opts.config {
		fs::metadata(config_path).map_err(|_| eyre!("Provided config file doesn't exist."))?;
		confy::load_path(config_path)
			.wrap_err(format!("Failed to load configuration from {config_path}"))?
	} else {
		RuntimeConfig::default()
	};

	cfg.log_format_json = opts.logs_json || cfg.log_format_json;
	cfg.log_level = opts.verbosity.unwrap_or(cfg.log_level);
	cfg.pretty_output = opts.pretty || cfg.pretty_output;

	// Flags override the config parameters
	if !opts.network.is_empty() {
		cfg.networks = opts.network.clone();
	}

	if let Some(request_timeout) = opts.request_timeout {
		cfg.rpc.request_timeout = Duration::from_secs(request_timeout);
	}

	if cfg.networks.is_empty() {
		return Err(eyre!("At least one network must be configured."));
	}

	Ok(cfg)
}

async fn run(cfg: RuntimeConfig) -> Result<()> {
	let version = clap::crate_version!();
	info!("Running Feature Lens version: {version}.");
	info!("Using config: {cfg:?}");

	let rpc_client = rpc::Client::new(cfg.rpc.clone());
	let outcomes = network::fetch_all(&rpc_client, &cfg.networks).await;

	for (network, outcome) in &outcomes {
		match outcome.bitmap() {
			Some(bitmap) => {
				let stats = bitmap.stats();
				info!(
					%network,
					enabled = stats.enabled_features,
					addressable = stats.total_features,
					"Feature bitmap fetched"
				);
			},
			None => warn!(%network, "Feature bitmap unavailable, reporting unknown status"),
		}
	}

	let catalog = Catalog::build(Registry::builtin(), &outcomes);
	info!(features = catalog.len(), "Catalog assembled");

	let output = if cfg.pretty_output {
		serde_json::to_string_pretty(&catalog)
	} else {
		serde_json::to_string(&catalog)
	}
	.wrap_err("Failed to serialize catalog")?;
	println!("{output}");

	Ok(())
}

#[tokio::main]
pub async fn main() -> Result<()> {
	let opts = CliOpts::parse();
	let cfg = load_runtime_config(&opts)?;

	if cfg.log_format_json {
		tracing::subscriber::set_global_default(json_subscriber(cfg.log_level))?;
	} else {
		tracing::subscriber::set_global_default(default_subscriber(cfg.log_level))?;
	};

	// install custom panic hooks
	install_panic_hooks()?;

	if let Err(error) = run(cfg).await {
		return Err(error.wrap_err("Building feature catalog failed"));
	};

	Ok(())
}
