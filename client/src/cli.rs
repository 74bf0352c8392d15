use clap::Parser;
use feature_lens_core::network::Network;
use tracing::Level;

#[derive(Parser)]
#[command(version)]
pub struct CliOpts {
	/// Path to the toml configuration file
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<String>,
	/// Network to query; may be given multiple times (default: all networks)
	#[arg(short, long, value_name = "network")]
	pub network: Vec<Network>,
	/// Time limit for a single feature resource request, in seconds
	#[arg(long)]
	pub request_timeout: Option<u64>,
	/// Log level
	#[arg(long)]
	pub verbosity: Option<Level>,
	/// Set logs format to JSON
	#[arg(long)]
	pub logs_json: bool,
	/// Pretty-print the catalog JSON written to stdout
	#[arg(long)]
	pub pretty: bool,
}
