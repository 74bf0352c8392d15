//! REST fetch client for node feature resources.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::{eyre::WrapErr, Result};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tokio_retry::{
	strategy::{jitter, ExponentialBackoff, FibonacciBackoff},
	Retry,
};
use tracing::debug;

use super::{Network, FEATURES_RESOURCE_PATH};
use crate::{
	bitmap::Bitmap,
	types::{duration_millis_format, duration_seconds_format},
};

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct RPCConfig {
	/// Time limit for a single feature resource request, in seconds (default: 30).
	#[serde(with = "duration_seconds_format")]
	pub request_timeout: Duration,
	/// Set the configuration based on which the retries will be orchestrated, max duration [in seconds] between retries and number of tries.
	/// (default:
	/// fibonacci:
	///     base: 1,
	///     max_delay: 10,
	///     retries: 3,
	/// )
	pub retry: RetryConfig,
	/// Per-network REST endpoint overrides; networks not listed here use their default endpoint.
	pub endpoint_overrides: Vec<(Network, String)>,
}

impl Default for RPCConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(30),
			retry: RetryConfig::Fibonacci(FibonacciConfig {
				base: 1,
				max_delay: Duration::from_millis(10000),
				retries: 3,
			}),
			endpoint_overrides: Vec::new(),
		}
	}
}

impl RPCConfig {
	pub fn endpoint(&self, network: Network) -> &str {
		self.endpoint_overrides
			.iter()
			.find(|(overridden, _)| *overridden == network)
			.map(|(_, endpoint)| endpoint.as_str())
			.unwrap_or_else(|| network.endpoint())
	}
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum RetryConfig {
	#[serde(rename = "exponential")]
	Exponential(ExponentialConfig),

	#[serde(rename = "fibonacci")]
	Fibonacci(FibonacciConfig),
}

impl IntoIterator for RetryConfig {
	type Item = Duration;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		match self {
			RetryConfig::Exponential(config) => ExponentialBackoff::from_millis(config.base)
				.factor(1000)
				.max_delay(config.max_delay)
				.map(jitter)
				.take(config.retries)
				.collect::<Vec<Duration>>()
				.into_iter(),
			RetryConfig::Fibonacci(config) => FibonacciBackoff::from_millis(config.base)
				.factor(1000)
				.max_delay(config.max_delay)
				.map(jitter)
				.take(config.retries)
				.collect::<Vec<Duration>>()
				.into_iter(),
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExponentialConfig {
	pub base: u64,
	#[serde(with = "duration_millis_format")]
	pub max_delay: Duration,
	pub retries: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FibonacciConfig {
	pub base: u64,
	#[serde(with = "duration_millis_format")]
	pub max_delay: Duration,
	pub retries: usize,
}

/// On-chain feature resource as served by the node REST API. The bitmap
/// arrives as a hex string and is decoded on deserialization.
#[derive(Deserialize, Debug)]
struct FeaturesResource {
	data: FeaturesData,
}

#[derive(Deserialize, Debug)]
struct FeaturesData {
	features: Bitmap,
}

#[derive(Clone)]
pub struct Client {
	http_client: reqwest::Client,
	config: RPCConfig,
}

impl Client {
	pub fn new(config: RPCConfig) -> Self {
		Self {
			http_client: reqwest::Client::new(),
			config,
		}
	}

	async fn get_features_resource(&self, network: Network) -> Result<Bitmap> {
		let url = format!("{}{FEATURES_RESOURCE_PATH}", self.config.endpoint(network));
		debug!(%network, url, "Requesting feature resource");

		let resource = self
			.http_client
			.get(&url)
			.header("Accept", "application/json")
			.send()
			.await
			.wrap_err("Failed to get feature resource")?
			.error_for_status()
			.wrap_err("Feature resource request rejected")?
			.json::<FeaturesResource>()
			.await
			.wrap_err("Failed to parse feature resource")?;

		Ok(resource.data.features)
	}
}

#[async_trait]
impl super::Client for Client {
	async fn fetch_features(&self, network: Network) -> Result<Bitmap> {
		Retry::spawn(self.config.retry.clone(), || async {
			timeout(
				self.config.request_timeout,
				self.get_features_resource(network),
			)
			.await
			.wrap_err("Feature resource request timed out")?
		})
		.await
	}
}
