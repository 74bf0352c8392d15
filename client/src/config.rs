use feature_lens_core::{
	network::{rpc::RPCConfig, Network},
	types::tracing_level_format,
};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Representation of a configuration used by this project.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RuntimeConfig {
	/// Networks to query, in output order (default: mainnet, testnet, devnet).
	pub networks: Vec<Network>,
	#[serde(flatten)]
	pub rpc: RPCConfig,
	/// Log level, default is `INFO`. See `<https://docs.rs/log/0.4.14/log/enum.LevelFilter.html>` for possible log level values. (default: `INFO`).
	#[serde(with = "tracing_level_format")]
	pub log_level: Level,
	/// If set to true, logs are displayed in JSON format, which is used for structured logging. Otherwise, plain text format is used (default: false).
	pub log_format_json: bool,
	/// Pretty-print the catalog JSON written to stdout (default: false).
	pub pretty_output: bool,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		RuntimeConfig {
			networks: Network::all(),
			rpc: Default::default(),
			log_level: Level::INFO,
			log_format_json: false,
			pretty_output: false,
		}
	}
}
