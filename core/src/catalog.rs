//! Unified feature catalog assembly.
//!
//! The catalog merges the compiled-in registry with the feature ids
//! discovered in every fetched bitmap. One record per distinct id, each
//! carrying a status for every configured network. The catalog is rebuilt
//! wholesale on every aggregation; nothing is persisted.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
	network::{FetchOutcome, Network},
	registry::{Category, Registry},
	types::{FeatureId, FeatureStatus},
};

/// One feature with its per-network status.
#[derive(Clone, Debug, Serialize)]
pub struct FeatureRecord {
	pub id: FeatureId,
	pub name: String,
	pub description: String,
	pub category: Category,
	pub status: BTreeMap<Network, FeatureStatus>,
}

impl FeatureRecord {
	pub fn status_on(&self, network: Network) -> FeatureStatus {
		self.status
			.get(&network)
			.copied()
			.unwrap_or(FeatureStatus::Unknown)
	}
}

/// Feature records in ascending id order.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog(Vec<FeatureRecord>);

impl Catalog {
	/// Builds the catalog from the registry and the per-network fetch
	/// outcomes.
	///
	/// Candidate ids are the union of registry ids and ids enabled on any
	/// available bitmap; unavailable networks contribute nothing to
	/// discovery. Ids unknown to the registry get a placeholder record so
	/// discovered features are never silently dropped. Each network is
	/// evaluated independently: unavailable reads as `Unknown`, otherwise
	/// the bit decides between `Enabled` and `Disabled`.
	pub fn build(registry: &Registry, outcomes: &[(Network, FetchOutcome)]) -> Catalog {
		let mut candidates: BTreeSet<FeatureId> = registry.ids().collect();
		for (_, outcome) in outcomes {
			if let Some(bitmap) = outcome.bitmap() {
				candidates.extend(bitmap.enabled_ids());
			}
		}

		let records = candidates
			.into_iter()
			.map(|feature| {
				let (name, description, category) = match registry.get(feature) {
					Some(meta) => (
						meta.name.to_string(),
						meta.description.to_string(),
						meta.category,
					),
					None => (
						format!("Feature #{feature}"),
						format!("Feature #{feature} is not in the registry yet"),
						Category::Other,
					),
				};

				let status = outcomes
					.iter()
					.map(|(network, outcome)| {
						let status = match outcome.bitmap() {
							None => FeatureStatus::Unknown,
							Some(bitmap) if bitmap.contains(feature) => FeatureStatus::Enabled,
							Some(_) => FeatureStatus::Disabled,
						};
						(*network, status)
					})
					.collect();

				FeatureRecord {
					id: feature,
					name,
					description,
					category,
					status,
				}
			})
			.collect();

		Catalog(records)
	}

	pub fn records(&self) -> &[FeatureRecord] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, feature: FeatureId) -> Option<&FeatureRecord> {
		self.0
			.binary_search_by_key(&feature, |record| record.id)
			.ok()
			.map(|index| &self.0[index])
	}

	pub fn by_category(&self, category: Category) -> impl Iterator<Item = &FeatureRecord> {
		self.0
			.iter()
			.filter(move |record| record.category == category)
	}

	pub fn enabled_on(&self, network: Network) -> impl Iterator<Item = &FeatureRecord> {
		self.0
			.iter()
			.filter(move |record| record.status_on(network) == FeatureStatus::Enabled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{bitmap::Bitmap, registry::FeatureMeta};

	fn test_registry() -> Registry {
		Registry::from_entries([1, 2, 3].map(|id| {
			(
				id,
				FeatureMeta {
					name: "Known Feature",
					description: "A feature the registry knows about",
					category: Category::Vm,
				},
			)
		}))
	}

	fn test_outcomes() -> Vec<(Network, FetchOutcome)> {
		let mut bitmap = Bitmap::new();
		bitmap.set(2, true);
		bitmap.set(4, true);
		vec![
			(Network::Mainnet, FetchOutcome::Available(bitmap)),
			(Network::Testnet, FetchOutcome::Unavailable),
			(Network::Devnet, FetchOutcome::Available(Bitmap::new())),
		]
	}

	#[test]
	fn union_of_registry_and_discovered_ids() {
		let catalog = Catalog::build(&test_registry(), &test_outcomes());
		let ids: Vec<_> = catalog.records().iter().map(|record| record.id).collect();
		assert_eq!(ids, vec![1, 2, 3, 4]);
	}

	#[test]
	fn unregistered_id_gets_placeholder() {
		let catalog = Catalog::build(&test_registry(), &test_outcomes());
		let record = catalog.get(4).unwrap();
		assert_eq!(record.name, "Feature #4");
		assert_eq!(record.category, Category::Other);
		let record = catalog.get(2).unwrap();
		assert_eq!(record.name, "Known Feature");
		assert_eq!(record.category, Category::Vm);
	}

	#[test]
	fn per_network_status_is_independent() {
		let catalog = Catalog::build(&test_registry(), &test_outcomes());

		let record = catalog.get(2).unwrap();
		assert_eq!(record.status_on(Network::Mainnet), FeatureStatus::Enabled);
		assert_eq!(record.status_on(Network::Testnet), FeatureStatus::Unknown);
		assert_eq!(record.status_on(Network::Devnet), FeatureStatus::Disabled);

		let record = catalog.get(4).unwrap();
		assert_eq!(record.status_on(Network::Mainnet), FeatureStatus::Enabled);
		assert_eq!(record.status_on(Network::Testnet), FeatureStatus::Unknown);
		assert_eq!(record.status_on(Network::Devnet), FeatureStatus::Disabled);

		// a registry-only id is disabled, not unknown, on an available network
		let record = catalog.get(1).unwrap();
		assert_eq!(record.status_on(Network::Mainnet), FeatureStatus::Disabled);
		assert_eq!(record.status_on(Network::Testnet), FeatureStatus::Unknown);
	}

	#[test]
	fn every_record_covers_every_configured_network() {
		let outcomes = test_outcomes();
		let catalog = Catalog::build(&test_registry(), &outcomes);
		for record in catalog.records() {
			assert_eq!(record.status.len(), outcomes.len());
		}
	}

	#[test]
	fn output_order_ignores_outcome_order() {
		let mut reversed = test_outcomes();
		reversed.reverse();
		let forward = Catalog::build(&test_registry(), &test_outcomes());
		let backward = Catalog::build(&test_registry(), &reversed);
		let ids = |catalog: &Catalog| {
			catalog
				.records()
				.iter()
				.map(|record| record.id)
				.collect::<Vec<_>>()
		};
		assert_eq!(ids(&forward), ids(&backward));
		assert_eq!(
			forward.get(2).unwrap().status_on(Network::Devnet),
			backward.get(2).unwrap().status_on(Network::Devnet),
		);
	}

	#[test]
	fn empty_registry_all_networks_unavailable() {
		let outcomes = vec![
			(Network::Mainnet, FetchOutcome::Unavailable),
			(Network::Testnet, FetchOutcome::Unavailable),
			(Network::Devnet, FetchOutcome::Unavailable),
		];
		let catalog = Catalog::build(&Registry::default(), &outcomes);
		assert!(catalog.is_empty());
	}

	#[test]
	fn query_helpers() {
		let catalog = Catalog::build(&test_registry(), &test_outcomes());
		assert!(catalog.get(7).is_none());
		assert_eq!(catalog.by_category(Category::Vm).count(), 3);
		assert_eq!(catalog.by_category(Category::Other).count(), 1);
		let enabled: Vec<_> = catalog
			.enabled_on(Network::Mainnet)
			.map(|record| record.id)
			.collect();
		assert_eq!(enabled, vec![2, 4]);
		assert_eq!(catalog.enabled_on(Network::Testnet).count(), 0);
	}

	#[test]
	fn records_serialize_with_lowercase_status() {
		let catalog = Catalog::build(&test_registry(), &test_outcomes());
		let json = serde_json::to_value(catalog.records().first().unwrap()).unwrap();
		assert_eq!(json["status"]["testnet"], "unknown");
		assert_eq!(json["category"], "vm");
	}
}
