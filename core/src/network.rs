use async_trait::async_trait;
use clap::ValueEnum;
use color_eyre::Result;
use futures::future::join_all;
use mockall::automock;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::bitmap::Bitmap;

pub mod rpc;

/// Resource path of the on-chain feature set, relative to a node REST endpoint.
pub const FEATURES_RESOURCE_PATH: &str = "/accounts/0x1/resource/0x1::features::Features";

/// One independent data source. The set of networks is fixed configuration,
/// never derived from fetched data.
#[derive(
	Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Network {
	Mainnet,
	Testnet,
	Devnet,
}

impl Network {
	pub fn endpoint(&self) -> &'static str {
		match self {
			Network::Mainnet => "https://api.mainnet.aptoslabs.com/v1",
			Network::Testnet => "https://api.testnet.aptoslabs.com/v1",
			Network::Devnet => "https://api.devnet.aptoslabs.com/v1",
		}
	}

	pub fn all() -> Vec<Network> {
		vec![Network::Mainnet, Network::Testnet, Network::Devnet]
	}
}

/// Outcome of a single network's bitmap fetch.
///
/// `Unavailable` is distinct from a bitmap that decodes to all zeros: a
/// missing bitmap can neither confirm nor deny any feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
	Available(Bitmap),
	Unavailable,
}

impl FetchOutcome {
	pub fn bitmap(&self) -> Option<&Bitmap> {
		match self {
			FetchOutcome::Available(bitmap) => Some(bitmap),
			FetchOutcome::Unavailable => None,
		}
	}
}

#[async_trait]
#[automock]
pub trait Client {
	async fn fetch_features(&self, network: Network) -> Result<Bitmap>;
}

/// Fetches the feature bitmap of every configured network concurrently.
///
/// Fetches are independent: a failure or timeout on one network degrades that
/// network to [`FetchOutcome::Unavailable`] and never cancels the others.
/// Outcomes are returned in the order networks were given.
pub async fn fetch_all(
	client: &(impl Client + Sync),
	networks: &[Network],
) -> Vec<(Network, FetchOutcome)> {
	let fetches = networks.iter().map(|&network| async move {
		match client.fetch_features(network).await {
			Ok(bitmap) => {
				debug!(%network, bytes = bitmap.len(), "Fetched feature bitmap");
				(network, FetchOutcome::Available(bitmap))
			},
			Err(error) => {
				warn!(%network, "Feature bitmap unavailable: {error:#}");
				(network, FetchOutcome::Unavailable)
			},
		}
	});
	join_all(fetches).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use color_eyre::eyre::eyre;

	fn mock_client() -> MockClient {
		let mut client = MockClient::new();
		client.expect_fetch_features().returning(|network| {
			Box::pin(async move {
				match network {
					Network::Mainnet => Ok(Bitmap::from_hex("0x05")?),
					Network::Testnet => Err(eyre!("connection refused")),
					Network::Devnet => Ok(Bitmap::new()),
				}
			})
		});
		client
	}

	#[tokio::test]
	async fn failed_fetch_degrades_to_unavailable() {
		let outcomes = fetch_all(&mock_client(), &Network::all()).await;
		assert_eq!(outcomes.len(), 3);
		assert_eq!(
			outcomes[0],
			(
				Network::Mainnet,
				FetchOutcome::Available(Bitmap::from_hex("0x05").unwrap())
			)
		);
		assert_eq!(outcomes[1], (Network::Testnet, FetchOutcome::Unavailable));
		assert_eq!(
			outcomes[2],
			(Network::Devnet, FetchOutcome::Available(Bitmap::new()))
		);
	}

	#[tokio::test]
	async fn outcomes_follow_configured_network_order() {
		let networks = [Network::Devnet, Network::Mainnet];
		let outcomes = fetch_all(&mock_client(), &networks).await;
		let fetched: Vec<_> = outcomes.iter().map(|(network, _)| *network).collect();
		assert_eq!(fetched, networks);
	}

	#[test]
	fn unavailable_has_no_bitmap() {
		assert_eq!(FetchOutcome::Unavailable.bitmap(), None);
		let outcome = FetchOutcome::Available(Bitmap::new());
		assert_eq!(outcome.bitmap(), Some(&Bitmap::new()));
	}
}
